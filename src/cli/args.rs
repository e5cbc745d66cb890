//! Command line argument parsing for the Sieve CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::classifier::SnapshotFormat;

/// Sieve - train and run a Naive Bayes text classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "sieve")]
#[command(about = "Train and run a persistent Naive Bayes text classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SieveArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Classifier configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "SIEVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SieveArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from corpus files and write its snapshot
    Train(TrainArgs),

    /// Classify texts with a trained snapshot
    Classify(ClassifyArgs),

    /// Show statistics of a trained snapshot
    Stats(StatsArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Corpus files or directories; each `<label>.txt` holds one document per line
    #[arg(value_name = "CORPUS", required_unless_present = "samples")]
    pub corpus: Vec<PathBuf>,

    /// JSON file with an array of {"text", "label"} samples
    #[arg(long, value_name = "SAMPLES_FILE")]
    pub samples: Option<PathBuf>,

    /// Snapshot file to write
    #[arg(short, long, value_name = "SNAPSHOT_FILE")]
    pub snapshot: PathBuf,

    /// Snapshot encoding (defaults to the configured format)
    #[arg(long, value_enum)]
    pub snapshot_format: Option<SnapshotFormat>,

    /// Continue training from the existing snapshot instead of starting empty
    #[arg(long)]
    pub append: bool,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Snapshot file to load
    #[arg(short, long, value_name = "SNAPSHOT_FILE")]
    pub snapshot: PathBuf,

    /// Texts to classify; reads one text per stdin line when omitted
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Include per-label log scores
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Snapshot file to load
    #[arg(short, long, value_name = "SNAPSHOT_FILE")]
    pub snapshot: PathBuf,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
