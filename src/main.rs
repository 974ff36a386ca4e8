use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use stockgift::cli::track::TrackArgs;
use stockgift::core::TimeRange;
use stockgift::core::log::init_logging;

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
    /// List supported currencies
    Currencies,
    /// Show exchange rates for a base currency
    Rates {
        /// Base currency (defaults to the display currency)
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
        /// Base currency of the rate table to use
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Search stock symbols
    Search { query: String },
    /// Show the latest quote for a symbol
    Quote { symbol: String },
    /// Track the simulated value of a stock gift
    Track {
        symbol: String,
        /// Number of shares gifted
        #[arg(short, long)]
        shares: f64,
        /// Purchase price per share in USD
        #[arg(short, long)]
        price: f64,
        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        purchased: NaiveDate,
        /// Chart range: 1D, 5D, 1M, 6M, YTD, 1Y, 5Y or ALL
        #[arg(short, long, default_value = "6M")]
        range: TimeRange,
        /// Seed for a reproducible price simulation
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl From<Commands> for stockgift::AppCommand {
    fn from(cmd: Commands) -> stockgift::AppCommand {
        match cmd {
            Commands::Currencies => stockgift::AppCommand::Currencies,
            Commands::Rates { base } => stockgift::AppCommand::Rates { base },
            Commands::Convert {
                amount,
                from,
                to,
                base,
            } => stockgift::AppCommand::Convert {
                amount,
                from,
                to,
                base,
            },
            Commands::Search { query } => stockgift::AppCommand::Search { query },
            Commands::Quote { symbol } => stockgift::AppCommand::Quote { symbol },
            Commands::Track {
                symbol,
                shares,
                price,
                purchased,
                range,
                seed,
            } => stockgift::AppCommand::Track(TrackArgs {
                symbol,
                shares,
                purchase_price: price,
                purchase_date: purchased,
                range,
                seed,
            }),
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
            Some(path) => stockgift::cli::setup::setup_at_path(path),
            None => stockgift::cli::setup::setup(),
        },
        Some(cmd) => stockgift::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
