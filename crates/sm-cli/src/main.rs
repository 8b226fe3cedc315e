//! statemap CLI
//!
//! Command-line interface for the statemap current-state inventory:
//! renders BRD/DevSpec reports from a snapshot file, validates snapshot
//! consistency, and seeds a demo snapshot.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sm_observability::{init_logging_with_config, LoggingConfig};
use sm_reports::ReportKind;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "statemap")]
#[command(version)]
#[command(about = "Evidence-linked current-state inventory and report generator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report from a snapshot
    Report {
        /// Which report to render (brd, devspec)
        #[arg(short, long)]
        kind: ReportKind,

        /// Path to the snapshot JSON file
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Show only the top N backlog items in the BRD
        #[arg(long, value_name = "N")]
        top_n: Option<usize>,
    },

    /// Check a snapshot for invariant violations and dangling references
    Validate {
        /// Path to the snapshot JSON file
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,
    },

    /// Write a seeded demo snapshot
    Demo {
        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging_with_config(LoggingConfig::verbose());
    } else {
        init_logging_with_config(LoggingConfig::default());
    }

    match cli.command {
        Commands::Report {
            kind,
            snapshot,
            out,
            top_n,
        } => commands::run_report(&snapshot, kind, top_n, out.as_deref()),
        Commands::Validate { snapshot } => {
            let clean = commands::run_validate(&snapshot)?;
            if !clean {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Demo { out } => commands::run_demo(out.as_deref()),
    }
}
