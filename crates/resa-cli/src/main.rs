mod args;
mod interactive;
mod reports;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::args::RunArgs;

#[derive(Debug, Parser)]
#[command(name = "resa", version)]
#[command(about = "Research automation: collect, analyze and report on a topic")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect data on a topic, analyze it and write a Markdown report
    Run(Box<RunArgs>),
    /// Parse a generated report and print what can be recovered from it as JSON
    Parse {
        /// Path to the Markdown report
        report: PathBuf,
    },
    /// Compare two generated reports
    Compare {
        /// The newer report
        current: PathBuf,
        /// The report to compare against
        previous: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = resa_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run::run_research(&config, *args).await,
        Commands::Parse { report } => reports::run_parse(&report),
        Commands::Compare { current, previous } => reports::run_compare(&current, &previous),
    }
}

#[cfg(test)]
mod tests;
