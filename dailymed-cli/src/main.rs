use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::ClientOptions;

#[derive(Parser)]
#[command(
    name = "dailymed-cli",
    about = "Command-line interface for the DailyMed SPL registry",
    long_about = "Query DailyMed drug labels (SPLs), NDCs, drug classes, UNIIs and RxCUIs, \
                  and filter labels by route, dosage form and ingredients"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    client: ClientOptions,
}

#[derive(Subcommand)]
enum Commands {
    /// Search SPLs with the remote DailyMed filters
    #[command(name = "search-spls")]
    SearchSpls(Box<commands::search::SearchSpls>),
    /// Download an SPL document (raw XML, or parsed with --parsed)
    #[command(name = "get-spl")]
    GetSpl(commands::spl::GetSpl),
    /// Version history of an SPL
    #[command(name = "get-spl-history")]
    GetSplHistory(commands::spl::GetSplHistory),
    /// NDCs attached to an SPL
    #[command(name = "get-spl-ndcs")]
    GetSplNdcs(commands::spl::GetSplNdcs),
    /// Packaging of the products in an SPL
    #[command(name = "get-spl-packaging")]
    GetSplPackaging(commands::spl::GetSplPackaging),
    /// List drug names
    #[command(name = "get-drugnames")]
    GetDrugNames(commands::listings::GetDrugNames),
    /// List NDCs
    #[command(name = "get-ndcs")]
    GetNdcs(commands::listings::GetNdcs),
    /// List pharmacologic drug classes
    #[command(name = "get-drugclasses")]
    GetDrugClasses(commands::listings::GetDrugClasses),
    /// List UNIIs
    #[command(name = "get-uniis")]
    GetUniis(commands::listings::GetUniis),
    /// Look up RxCUI concepts
    #[command(name = "get-rxcuis")]
    GetRxcuis(commands::listings::GetRxcuis),
    /// Search SPLs, then filter by route, form and ingredients
    #[command(name = "advanced-search")]
    AdvancedSearch(Box<commands::advanced::AdvancedSearchCmd>),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with indicatif layer for progress spinners
    let filter = if cli.verbose { "debug" } else { "info" };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let options = &cli.client;
    match &cli.command {
        Commands::SearchSpls(cmd) => cmd.execute(options).await,
        Commands::GetSpl(cmd) => cmd.execute(options).await,
        Commands::GetSplHistory(cmd) => cmd.execute(options).await,
        Commands::GetSplNdcs(cmd) => cmd.execute(options).await,
        Commands::GetSplPackaging(cmd) => cmd.execute(options).await,
        Commands::GetDrugNames(cmd) => cmd.execute(options).await,
        Commands::GetNdcs(cmd) => cmd.execute(options).await,
        Commands::GetDrugClasses(cmd) => cmd.execute(options).await,
        Commands::GetUniis(cmd) => cmd.execute(options).await,
        Commands::GetRxcuis(cmd) => cmd.execute(options).await,
        Commands::AdvancedSearch(cmd) => cmd.execute(options).await,
    }
}
