//! Audio Anchor command line: check a source document, merge a saved set
//! of anchors into it, or print the structured snapshot.
//!
//! Verbosity follows `RUST_LOG` (default `info`).

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "audio-anchor", version, about = "Align document words with audio time anchors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a source document and lint its word identifiers.
    Validate {
        /// Source document (XML).
        document: PathBuf,
        /// Also check these anchors for chronological order.
        #[arg(long)]
        anchors: Option<PathBuf>,
    },
    /// Insert a time marker for every anchor into the source document.
    Merge {
        /// Path or http(s) URL of the source document.
        source: String,
        /// JSON array of `{targetId, timeMs, label}`.
        #[arg(long)]
        anchors: PathBuf,
        /// JSON export settings (element and attribute names, time format).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the merged document here instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Print the nested page/paragraph/sentence/word JSON.
    Snapshot {
        document: PathBuf,
        #[arg(long)]
        anchors: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Validate { document, anchors } => commands::validate(&document, anchors.as_deref()),
        Command::Merge {
            source,
            anchors,
            config,
            out,
        } => commands::merge(&source, &anchors, config.as_deref(), out.as_deref()).await,
        Command::Snapshot {
            document,
            anchors,
            pretty,
        } => commands::snapshot(&document, anchors.as_deref(), pretty),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
