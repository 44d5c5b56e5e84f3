//! coopsched - CLI

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use coopsched::util::config::load_config;
use coopsched::util::logger::{self, LogLevel};
use coopsched::{run_demo, run_primes, run_search, RunReport, NAME, VERSION};

/// Drive cooperative coroutines round-robin and report their outcomes
#[derive(Parser, Debug)]
#[command(name = "coopsched")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the Lucas sequence for the first term of each digit length
    Search {
        /// Minimum number of decimal digits (repeatable)
        #[arg(short = 'd', long = "min-digits", value_name = "N")]
        min_digits: Vec<u32>,
    },

    /// Collect the primes among the first N Lucas numbers
    Primes {
        /// How many Lucas numbers to examine
        #[arg(short = 'n', long, value_name = "N")]
        count: Option<usize>,
    },

    /// Run a mixed workload exercising every kind of outcome
    Demo,

    /// Print version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load config")?;
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log.level
    };
    logger::init_with_level(level);

    let report = match args.command {
        Commands::Search { min_digits } => {
            let thresholds = if min_digits.is_empty() {
                config.search.min_digits.clone()
            } else {
                min_digits
            };
            run_search(&config.scheduler, &thresholds)?
        }
        Commands::Primes { count } => {
            run_primes(&config.scheduler, count.unwrap_or(config.search.prime_count))
        }
        Commands::Demo => run_demo(&config.scheduler),
        Commands::Version => {
            println!("{} {}", NAME, VERSION);
            return Ok(());
        }
    };

    print_report(&report, args.format)
}

fn print_report(
    report: &RunReport,
    format: Format,
) -> Result<()> {
    match format {
        Format::Text => print!("{}", report.to_text(std::io::stdout().is_terminal())),
        Format::Json => {
            let json = report.to_json().context("Failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}
