use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;
mod display;

use commands::{check, commit, init, revert, status, track};

#[derive(Parser)]
#[command(name = "snapvcs")]
#[command(version, about = "Minimal local version control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    root: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the backup directory and commit log
    Init {
        /// Directory to initialize (defaults to --root or the current directory)
        path: Option<PathBuf>,
    },

    /// Start tracking files, creating any that don't exist
    Track {
        /// File names relative to the repository root
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List tracked files and their status
    Status {
        /// Print the tracked files as JSON
        #[arg(long)]
        json: bool,
    },

    /// Snapshot every tracked file into the backup
    Commit,

    /// Restore every tracked file from the backup
    Revert {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Compare tracked files against their recorded hashes
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path } => {
            init::run(path.or(cli.root))?;
        }
        Commands::Track { names } => {
            track::run(names, cli.root)?;
        }
        Commands::Status { json } => {
            status::run(json, cli.root)?;
        }
        Commands::Commit => {
            commit::run(cli.root)?;
        }
        Commands::Revert { yes } => {
            revert::run(yes, cli.root)?;
        }
        Commands::Check => {
            check::run(cli.root)?;
        }
    }

    Ok(())
}
