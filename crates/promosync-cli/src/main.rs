mod sync;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "promosync-cli")]
#[command(about = "Sync the PromoOpción catalog into a Shopify store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the supplier catalog and reconcile it into the store
    Sync {
        /// Process only the first N supplier products
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,

        /// Plan every change without writing to the store
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the loaded configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = promosync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Sync {
            limit,
            dry_run,
            json,
        } => {
            let limit = limit.map(usize::try_from).transpose()?;
            sync::run_sync(&config, limit, dry_run, json).await?;
        }
        Commands::Config => println!("{config:#?}"),
    }

    Ok(())
}
