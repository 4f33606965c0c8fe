mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::PaymentArgs;
use commands::deal::{AnalyzeArgs, SummaryArgs};
use commands::grading::GradeArgs;

/// Real-estate deal and loan economics
#[derive(Parser)]
#[command(
    name = "sandbox",
    version,
    about = "Real-estate deal and loan economics",
    long_about = "A CLI for evaluating leveraged rental deals with decimal precision. \
                  Computes the amortized payment, cash flow, cash-on-cash return, \
                  cap rate, ROI and a deal grade."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log pipeline stages to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full deal analysis
    Analyze(AnalyzeArgs),
    /// Show the results panel with formatted currency and percentages
    Summary(SummaryArgs),
    /// Calculate the monthly loan payment only
    Payment(PaymentArgs),
    /// Grade a cash-on-cash return
    Grade(GradeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::deal::run_analyze(args),
        Commands::Summary(args) => commands::deal::run_summary(args),
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Grade(args) => commands::grading::run_grade(args),
        Commands::Version => {
            println!("sandbox {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
