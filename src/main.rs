use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinfx::core::log::init_logging;

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

impl From<Commands> for coinfx::AppCommand {
    fn from(cmd: Commands) -> coinfx::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                coinfx::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { currencies } => coinfx::AppCommand::Rates { currencies },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between currencies through usd-coin
    Convert {
        /// Amount to convert, e.g. 10 or 12.5
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency (defaults to USD)
        #[arg(short, long)]
        from: Option<String>,
        /// Destination currency (defaults to the configured currency)
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Display usd-coin rates for the given currencies, or all quoted ones
    Rates { currencies: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinfx::cli::setup::setup(),
        Some(cmd) => coinfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
