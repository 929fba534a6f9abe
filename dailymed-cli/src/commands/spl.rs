use anyhow::{Context, Result};
use clap::Args;
use dailymed_client::SetId;

use super::{ClientOptions, OutputArgs, create_client, output_json, output_results};

fn parse_set_id(raw: &str) -> Result<SetId> {
    SetId::parse(raw).with_context(|| format!("'{raw}' is not a SET ID"))
}

#[derive(Args, Debug)]
pub struct GetSpl {
    /// SET ID of the label
    pub set_id: String,

    /// Print the extracted ingredients, routes and forms as JSON instead of raw XML
    #[arg(long)]
    pub parsed: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetSpl {
    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let set_id = parse_set_id(&self.set_id)?;

        if self.parsed {
            let document = client.fetch_spl_document(&set_id).await?;
            tracing::info!(
                set_id = %set_id,
                products = document.products.len(),
                "Parsed SPL document"
            );
            output_json(&document, self.output.path()).await
        } else {
            let xml = client.get_spl_xml(&set_id).await?;
            output_results(&xml, self.output.path()).await
        }
    }
}

#[derive(Args, Debug)]
pub struct GetSplHistory {
    /// SET ID of the label
    pub set_id: String,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page (1-100)
    #[arg(long, default_value = "10")]
    pub pagesize: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetSplHistory {
    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let set_id = parse_set_id(&self.set_id)?;

        let history = client
            .get_spl_history(&set_id, self.page, self.pagesize)
            .await?;
        output_json(&history, self.output.path()).await
    }
}

#[derive(Args, Debug)]
pub struct GetSplNdcs {
    /// SET ID of the label
    pub set_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetSplNdcs {
    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let set_id = parse_set_id(&self.set_id)?;

        let ndcs = client.get_spl_ndcs(&set_id).await?;
        output_json(&ndcs, self.output.path()).await
    }
}

#[derive(Args, Debug)]
pub struct GetSplPackaging {
    /// SET ID of the label
    pub set_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetSplPackaging {
    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let set_id = parse_set_id(&self.set_id)?;

        let packaging = client.get_spl_packaging(&set_id).await?;
        output_json(&packaging, self.output.path()).await
    }
}
