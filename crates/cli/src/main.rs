mod common;
mod plan;
mod report;
mod residuals;
mod validate;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Public-works budget and work-order toolchain.
#[derive(Parser)]
#[command(
    name = "appia",
    version,
    about = "Residual-budget reporting over funding sources and work orders"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every funding source's remaining balance
    Residuals {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
        /// Order id to leave out of the replay (an order being edited)
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Preview how a proposed cost draws down a pledge list
    Plan {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
        /// Proposed cost, as a decimal amount
        #[arg(long)]
        cost: String,
        /// Pledged funding source ids, in draw-down priority order
        #[arg(long, value_delimiter = ',')]
        sources: Vec<String>,
        /// Order id to leave out of the replay (the order being planned)
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Per-chapter budget rollup with residuals
    Report {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },

    /// Parse a snapshot, print integrity warnings and its digest
    Validate {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Residuals { snapshot, exclude } => {
            residuals::cmd_residuals(&snapshot, exclude.as_deref(), cli.output, cli.quiet)
        }
        Commands::Plan {
            snapshot,
            cost,
            sources,
            exclude,
        } => plan::cmd_plan(
            &snapshot,
            &cost,
            &sources,
            exclude.as_deref(),
            cli.output,
            cli.quiet,
        ),
        Commands::Report { snapshot } => report::cmd_report(&snapshot, cli.output, cli.quiet),
        Commands::Validate { snapshot } => validate::cmd_validate(&snapshot, cli.output, cli.quiet),
    };

    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}
