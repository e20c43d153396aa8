//! pixmask CLI - change photo content hashes without visible edits.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod exit_codes;

use config::Config;
use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Invalid parameters
  65  Verification failed (--verify)
  66  Input directory not found
  74  I/O error";

#[derive(Parser)]
#[command(name = "pixmask")]
#[command(author, version, about = "Photo hash masking", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Debug logging and per-file listings
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Modify every photo in a directory so its content hash changes
    Modify(ModifyArgs),

    /// Delete all files in a directory, keeping the directory
    Delete {
        /// Directory to clear
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Print the metadata of every PNG in a directory
    Inspect {
        /// Directory to inspect (defaults to the configured output directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct ModifyArgs {
    /// Directory of photos (default: $PIXMASK_INPUT_PATH or ./photos)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Directory for modified photos (default: $PIXMASK_OUTPUT_PATH or ./modified_photos)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Perturb one pixel per this many pixels
    #[arg(long, default_value_t = 1000)]
    pub pixel_frequency: u32,

    /// Maximum per-channel change for perturbed pixels
    #[arg(long, default_value_t = 10)]
    pub pixel_intensity: u8,

    /// Fraction trimmed from each edge, in [0, 0.5)
    #[arg(long, default_value_t = 0.01)]
    pub crop_percentage: f64,

    /// Saturation factor (1.0 leaves colours unchanged)
    #[arg(long, default_value_t = 1.01)]
    pub color_enhancement: f64,

    /// Paint dots bright red (also implied by strong parameters)
    #[arg(long)]
    pub aggressive: bool,

    /// Seed for a reproducible run (default: $PIXMASK_SEED or OS entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run hash and metadata verification after the batch
    #[arg(long)]
    pub verify: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pixmask_core={level},pixmask={level},warn")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();

    match cli.command {
        Commands::Modify(args) => commands::modify::execute(args, &config, cli.quiet),
        Commands::Delete { path } => commands::delete::execute(path, cli.verbose, cli.quiet),
        Commands::Inspect { path } => {
            let path = path.unwrap_or_else(|| config.output_path.clone());
            commands::inspect::execute(path)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let exit = match run(cli) {
        Ok(()) => ExitCode::success(),
        Err(e) => ExitCode::from_anyhow(&e),
    };

    if let Some(message) = &exit.message {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
    std::process::exit(exit.code);
}
