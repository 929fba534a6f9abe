pub mod advanced;
pub mod listings;
pub mod search;
pub mod spl;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use dailymed_client::{ClientConfig, DailyMedClient, RetryConfig};
use serde::Serialize;

/// Connection settings shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ClientOptions {
    /// DailyMed services base URL
    #[arg(long, env = "DAILYMED_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "DAILYMED_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Maximum requests per second
    #[arg(long, env = "DAILYMED_RATE_LIMIT", global = true)]
    pub rate_limit: Option<f64>,

    /// Retries for transient failures (0 disables retrying)
    #[arg(long, env = "DAILYMED_RETRIES", default_value = "0", global = true)]
    pub retries: usize,
}

pub fn create_client(options: &ClientOptions) -> Result<DailyMedClient> {
    let mut config = ClientConfig::new();

    if let Some(base_url) = &options.base_url {
        config = config.with_base_url(base_url);
    }

    if let Some(timeout) = options.timeout {
        config = config.with_timeout(Duration::from_secs(timeout));
    }

    if let Some(rate) = options.rate_limit {
        anyhow::ensure!(rate > 0.0, "--rate-limit must be positive, got {rate}");
        config = config.with_rate_limit(rate);
    }

    if options.retries > 0 {
        config = config.with_retry_config(RetryConfig::new().with_max_retries(options.retries));
    }

    Ok(DailyMedClient::with_config(config))
}

/// Pretty-print `value` as JSON to `output`, or stdout when no file is given
pub async fn output_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    output_results(&content, output).await
}

pub async fn output_results(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Results saved to file");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

/// `--output` flag shared by commands that print JSON
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Save results to file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    pub fn path(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
