mod db;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "pharmaloc")]
#[command(about = "Find nearby pharmacies and the medicines they stock")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Load the fallback dataset into the catalog store
    Seed,
    /// Search pharmacies and medicines, nearest first
    Search(SearchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = pharmaloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Migrate) => db::run_migrate(&config).await,
        Some(Commands::Seed) => db::run_seed(&config).await,
        Some(Commands::Search(args)) => search::run_search(&config, args).await,
        None => {
            println!("pharmaloc: try `pharmaloc search --help`");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
