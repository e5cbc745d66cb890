//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::classifier::{LabelScore, SnapshotFormat};
use crate::cli::args::{OutputFormat, SieveArgs};
use crate::error::Result;

/// Shown in place of a label when the model cannot decide.
pub const NO_DECISION: &str = "(no decision)";

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub snapshot: String,
    pub snapshot_format: SnapshotFormat,
    pub documents_added: u64,
    pub tokens_added: u64,
    pub labels_trained: Vec<String>,
    pub total_documents: u64,
    pub vocabulary_size: usize,
    pub duration_ms: u64,
}

/// One classified text.
#[derive(Debug, Serialize, Deserialize)]
pub struct Classification {
    pub text: String,
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<LabelScore>>,
}

/// Result structure for classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationResults {
    pub classifications: Vec<Classification>,
}

/// Per-label statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct LabelStats {
    pub label: String,
    pub documents: u64,
    pub prior: f64,
    pub total_tokens: u64,
    pub distinct_tokens: usize,
}

/// Model statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelStats {
    pub snapshot: String,
    pub snapshot_format: SnapshotFormat,
    pub total_documents: u64,
    pub vocabulary_size: usize,
    pub labels: Vec<LabelStats>,
}

/// Rendering of a result for humans.
pub trait HumanOutput {
    /// Write this result in human-readable form.
    fn write_human(&self, out: &mut dyn Write, args: &SieveArgs) -> io::Result<()>;
}

impl HumanOutput for TrainingResult {
    fn write_human(&self, out: &mut dyn Write, args: &SieveArgs) -> io::Result<()> {
        writeln!(
            out,
            "Trained {} documents ({} tokens) in {}ms",
            self.documents_added, self.tokens_added, self.duration_ms
        )?;
        if args.verbosity() > 1 {
            writeln!(out, "Labels trained: {}", self.labels_trained.join(", "))?;
        }
        writeln!(
            out,
            "Model: {} documents, vocabulary of {}",
            self.total_documents, self.vocabulary_size
        )?;
        writeln!(out, "Snapshot: {} ({})", self.snapshot, self.snapshot_format)
    }
}

impl HumanOutput for ClassificationResults {
    fn write_human(&self, out: &mut dyn Write, args: &SieveArgs) -> io::Result<()> {
        for classification in &self.classifications {
            let label = classification.label.as_deref().unwrap_or(NO_DECISION);
            if args.verbosity() > 0 && self.classifications.len() > 1 {
                writeln!(out, "{label}\t{}", classification.text)?;
            } else {
                writeln!(out, "{label}")?;
            }

            if let Some(scores) = &classification.scores {
                for score in scores {
                    writeln!(out, "  {:<20} {:>12.4}", score.label, score.score)?;
                }
            }
        }
        Ok(())
    }
}

impl HumanOutput for ModelStats {
    fn write_human(&self, out: &mut dyn Write, _args: &SieveArgs) -> io::Result<()> {
        writeln!(out, "Model Statistics:")?;
        writeln!(out, "═════════════════")?;
        writeln!(out, "Snapshot: {} ({})", self.snapshot, self.snapshot_format)?;
        writeln!(out, "Total documents: {}", self.total_documents)?;
        writeln!(out, "Vocabulary size: {}", self.vocabulary_size)?;

        if !self.labels.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "{:<20} {:>10} {:>8} {:>12} {:>10}",
                "Label", "Documents", "Prior", "Tokens", "Distinct"
            )?;
            writeln!(out, "{}", "─".repeat(64))?;
            for label in &self.labels {
                writeln!(
                    out,
                    "{:<20} {:>10} {:>8.3} {:>12} {:>10}",
                    label.label,
                    label.documents,
                    label.prior,
                    label.total_tokens,
                    label.distinct_tokens
                )?;
            }
        }
        Ok(())
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &SieveArgs,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(&mut out, args)?;
            Ok(())
        }
        OutputFormat::Json => output_json(&mut out, result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(out: &mut dyn Write, result: &T, args: &SieveArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}
