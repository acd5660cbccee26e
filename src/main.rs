use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use divest::core::YieldMethod;
use divest::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Estimate dividend income for an investment
    Estimate {
        /// Amount to invest, defaults to the configured investment
        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// Use this share price instead of fetching one
        #[arg(short, long)]
        price: Option<f64>,

        /// Yield method: forward or ttm
        #[arg(short, long)]
        method: Option<YieldMethod>,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display dividend payout history and growth
    History,
    /// Display the current share price and cache status
    Price,
}

impl From<Commands> for divest::AppCommand {
    fn from(cmd: Commands) -> divest::AppCommand {
        match cmd {
            Commands::Estimate {
                amount,
                price,
                method,
                json,
            } => divest::AppCommand::Estimate(divest::EstimateOptions {
                amount,
                price,
                method,
                json,
            }),
            Commands::History => divest::AppCommand::History,
            Commands::Price => divest::AppCommand::Price,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => divest::cli::setup::setup_at_path(path),
            None => divest::cli::setup::setup(),
        },
        Some(cmd) => divest::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
