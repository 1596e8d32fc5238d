use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use cenacolo_fetcher::config::FetcherConfig;
use cenacolo_fetcher::fetcher::DateFetcher;
use cenacolo_fetcher::output::{render, OutputFormat};
use cenacolo_fetcher::scrapers::VivaTicket;

/// Fetch available dates for Last Supper (Cenacolo Vinciano) bookings.
#[derive(Debug, Parser)]
#[command(name = "cenacolo-fetcher", version)]
struct Args {
    /// Run the browser in visible mode (for debugging)
    #[arg(long)]
    no_headless: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cenacolo_fetcher=info".parse().expect("valid directive")),
        )
        .init();

    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = FetcherConfig::load()?;
    if args.no_headless {
        config.headless = false;
    }

    let fetcher = DateFetcher::new(config, VivaTicket);
    let result = fetcher.fetch().await?;

    let rendered = render(&result, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!("Results written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
