// partcheck CLI - inventory-vs-catalog reconciliation

mod config;
mod exit_codes;
mod fetch_cmd;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "partcheck")]
#[command(about = "Gleicht Inventarlisten gegen den Herstellerkatalog ab")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an inventory workbook and write the comparison report
    #[command(after_help = "\
Examples:
  partcheck run inventar.xlsx --out bericht.xlsx
  partcheck run inventar.xlsx --out bericht.xlsx --config partcheck.toml
  partcheck run inventar.xlsx --out bericht.xlsx --concurrency 8 --quiet
  partcheck run inventar.xlsx --out bericht.xlsx --tolerance 2.5")]
    Run {
        /// Inventory workbook (xlsx, xls, xlsb, ods)
        input: PathBuf,

        /// Report workbook to write
        #[arg(long, short = 'o')]
        out: PathBuf,

        /// TOML config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Worker pool size (overrides config)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Weight tolerance in percent (overrides the config file)
        #[arg(long, env = "PARTCHECK_WEIGHT_TOL_PCT")]
        tolerance: Option<f64>,

        /// Suppress per-identifier progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Fetch one or more catalog pages and print the extracted fields
    #[command(after_help = "\
Examples:
  partcheck fetch A2V00001234567
  partcheck fetch A2V00001234567 A2V00007654321 --json")]
    Fetch {
        /// Catalog identifiers
        #[arg(required = true)]
        ids: Vec<String>,

        /// TOML config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output extracted fields as JSON instead of a human summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Route clap's own exit through the registry; --help and --version
    // are successes, everything else is a usage error.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let is_usage = e.use_stderr();
            let _ = e.print();
            return ExitCode::from(if is_usage { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };

    let result = match cli.command {
        Commands::Run { input, out, config, concurrency, tolerance, quiet } => {
            run::cmd_run(input, out, config.as_deref(), concurrency, tolerance, quiet)
        }
        Commands::Fetch { ids, config, json } => {
            fetch_cmd::cmd_fetch(&ids, config.as_deref(), json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}
