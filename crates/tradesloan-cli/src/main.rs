mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::affordability::AffordabilityArgs;
use commands::asset_finance::{EquipmentArgs, VehicleArgs};
use commands::fields::FieldsArgs;
use commands::loan::{EligibilityArgs, LoanArgs, RateArgs, ScheduleArgs};
use output::OutputFormat;

/// Loan, affordability and asset-finance calculations for tradespeople
#[derive(Parser)]
#[command(
    name = "tlc",
    version,
    about = "Loan, affordability and asset-finance calculations for tradespeople",
    long_about = "A CLI for estimating business loan repayments, eligibility, borrowing \
                  capacity and equipment or vehicle finance options with decimal precision. \
                  Results are indicative and are not an offer of credit."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Policy override file (YAML or JSON); unspecified fields keep their defaults
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log decisions to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Business loan: adjusted rate, repayments, eligibility and schedule
    Loan(LoanArgs),
    /// Month-by-month amortisation schedule at a fixed rate
    Schedule(ScheduleArgs),
    /// Profile-adjusted rate for a product, with each adjustment itemised
    Rate(RateArgs),
    /// Eligibility score for a requested amount
    Eligibility(EligibilityArgs),
    /// Borrowing capacity from monthly cash flow
    Affordability(AffordabilityArgs),
    /// Equipment finance: hire purchase against finance lease, with tax relief
    Equipment(EquipmentArgs),
    /// Vehicle finance: hire purchase, finance lease and contract hire
    Vehicle(VehicleArgs),
    /// Input ranges and options for a calculator
    Fields(FieldsArgs),
    /// Print version information
    Version,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "tlc=warn,tradesloan_core=warn",
        1 => "tlc=info,tradesloan_core=info",
        _ => "tlc=debug,tradesloan_core=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match input::file::read_policy(cli.policy.as_deref()) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args, &policy),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Rate(args) => commands::loan::run_rate(args, &policy),
        Commands::Eligibility(args) => commands::loan::run_eligibility(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args, &policy),
        Commands::Equipment(args) => commands::asset_finance::run_equipment(args, &policy),
        Commands::Vehicle(args) => commands::asset_finance::run_vehicle(args, &policy),
        Commands::Fields(args) => commands::fields::run_fields(args),
        Commands::Version => {
            println!("tlc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
