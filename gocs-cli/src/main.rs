use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gocs_core::ResultCode;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{diff, init, log, status, track, untrack, Target};

#[derive(Parser)]
#[command(name = "gocs")]
#[command(version, about = "Minimal local change tracking", long_about = None)]
struct Cli {
    /// Repository root (defaults to current directory)
    #[arg(short, long, global = true, env = "GOCS_ROOT")]
    root: Option<PathBuf>,

    /// Context lines shown around each diff hunk
    #[arg(short, long, global = true, default_value = "3")]
    context: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the .gocs tracking root
    Init,

    /// Record the current content of files
    Track {
        /// Files to track, relative to the repository root
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the diff against the previous snapshot
        #[arg(short, long)]
        diff: bool,
    },

    /// Stop tracking files and drop their snapshots
    Untrack {
        /// Files to untrack, relative to the repository root
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Show tracked files that differ from their snapshot
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the diff between snapshots and the working tree
    Diff {
        /// Files to diff (defaults to every tracked file)
        paths: Vec<PathBuf>,
    },

    /// Show the manifest records in order
    Log {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code.exit_code()),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            let code = e
                .downcast_ref::<gocs_core::Error>()
                .map(ResultCode::from)
                .unwrap_or(ResultCode::FatalError);
            ExitCode::from(code.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<ResultCode> {
    let target = Target::new(cli.root, cli.context)?;
    debug!("Repository root {:?}", target.root);

    match cli.command {
        Commands::Init => init::run(&target),
        Commands::Track { paths, diff } => track::run(&target, paths, diff),
        Commands::Untrack { paths } => untrack::run(&target, paths),
        Commands::Status { json } => status::run(&target, json),
        Commands::Diff { paths } => diff::run(&target, paths),
        Commands::Log { json } => log::run(&target, json),
    }
}
