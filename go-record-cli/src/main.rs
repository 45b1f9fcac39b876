//! go-record: inspect, normalise and extend SGF game records.
//!
//! ## Usage
//!
//! - `go-record check FILE...` - Verify that records load
//! - `go-record show FILE --at N` - Print the board N nodes down the main line
//! - `go-record info FILE [--json]` - Print game information
//! - `go-record fmt FILE [-o OUT]` - Rewrite a record in canonical form
//! - `go-record gtp FILE --at N` - Print GTP commands recreating a position
//! - `go-record play [--from FILE] D4 Q16 pass ...` - Append moves

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use go_record_cli::{Config, DEFAULT_LOG_FILTER};

/// Inspect and edit SGF game records
#[derive(Parser)]
#[command(name = "go-record")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that each file loads as a game record
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the board at a main-line node
    Show {
        file: PathBuf,
        /// Nodes to step down the main line (default: its end)
        #[arg(long)]
        at: Option<usize>,
    },
    /// Print the game information from the root node
    Info {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Re-serialize a record in canonical form
    Fmt {
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the GTP commands that recreate a main-line node
    Gtp {
        file: PathBuf,
        #[arg(long)]
        at: Option<usize>,
    },
    /// Play moves (`D4`, `pass`) after the main line and print the record
    Play {
        /// Board size for a new record (default: $GO_RECORD_SIZE or 19)
        #[arg(long)]
        size: Option<u8>,
        /// Continue this record instead of starting a new one
        #[arg(long)]
        from: Option<PathBuf>,
        moves: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Check { files } => check_all(&files),
        Commands::Show { file, at } => print(go_record_cli::show(&read(&file)?, at)?),
        Commands::Info { file, json } => print(go_record_cli::info(&read(&file)?, json)?),
        Commands::Fmt { file, output } => {
            let sgf = go_record_cli::fmt(&read(&file)?)?;
            match output {
                Some(path) => {
                    fs::write(&path, sgf + "\n")
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    info!("wrote {}", path.display());
                    Ok(())
                }
                None => print(sgf),
            }
        }
        Commands::Gtp { file, at } => print(go_record_cli::gtp(&read(&file)?, at)?),
        Commands::Play { size, from, moves } => {
            let base = from.as_deref().map(read).transpose()?;
            let size = size.unwrap_or(config.size);
            print(go_record_cli::play(size, base.as_deref(), &moves)?)
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn print(text: String) -> Result<()> {
    println!("{text}");
    Ok(())
}

fn check_all(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for path in files {
        match read(path).and_then(|text| go_record_cli::check(&text)) {
            Ok(summary) => println!("{}: {summary}", path.display()),
            Err(e) => {
                error!("{}: {e:#}", path.display());
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} files failed to load", files.len());
    }
    Ok(())
}
