//! Training corpus sources.
//!
//! A [`TrainingCorpus`] is an ordered list of `(label, lines)` groups where
//! every line is one training document. Corpora usually come from plain text
//! files named after their label (`theist.txt`, `neutral.txt`), or from a
//! JSON array of [`TrainingSample`]s.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::classifier::types::TrainingSample;

/// File extension picked up when loading a corpus directory.
pub const CORPUS_EXTENSION: &str = "txt";

/// Training lines for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusGroup {
    /// Label every line is trained under.
    pub label: String,
    /// One training document per entry.
    pub lines: Vec<String>,
}

impl CorpusGroup {
    /// Create a group from already-split lines.
    pub fn new<S: Into<String>>(label: S, lines: Vec<String>) -> Self {
        Self {
            label: label.into(),
            lines,
        }
    }

    /// Split raw text into one document per line.
    ///
    /// Trailing `\r` is stripped so CRLF files behave like LF files.
    pub fn from_text<S: Into<String>>(label: S, text: &str, skip_blank_lines: bool) -> Self {
        let lines = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !skip_blank_lines || !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        Self::new(label, lines)
    }

    /// Read one group from a text file.
    pub fn from_file<P: AsRef<Path>, S: Into<String>>(
        path: P,
        label: S,
        skip_blank_lines: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus file {}", path.display()))?;
        let group = Self::from_text(label, &text, skip_blank_lines);
        debug!(
            "loaded {} lines for {:?} from {}",
            group.lines.len(),
            group.label,
            path.display()
        );
        Ok(group)
    }
}

/// An ordered collection of corpus groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingCorpus {
    groups: Vec<CorpusGroup>,
}

impl TrainingCorpus {
    /// Create a corpus from groups, keeping their order.
    pub fn new(groups: Vec<CorpusGroup>) -> Self {
        Self { groups }
    }

    /// Append a group.
    pub fn push(&mut self, group: CorpusGroup) {
        self.groups.push(group);
    }

    /// Move every group of `other` to the end of this corpus.
    pub fn append(&mut self, other: TrainingCorpus) {
        self.groups.extend(other.groups);
    }

    /// Groups in training order.
    pub fn groups(&self) -> &[CorpusGroup] {
        &self.groups
    }

    /// Total number of documents across all groups.
    pub fn document_count(&self) -> usize {
        self.groups.iter().map(|group| group.lines.len()).sum()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.document_count() == 0
    }

    /// Load a corpus from a file or a directory.
    ///
    /// A file becomes one group labelled by its file stem. A directory
    /// contributes every `*.txt` file inside it (not recursively), sorted by
    /// file name.
    pub fn from_path<P: AsRef<Path>>(path: P, skip_blank_lines: bool) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            let mut corpus = Self::default();
            for file in corpus_files(path)? {
                corpus.push(CorpusGroup::from_file(&file, label_for(&file)?, skip_blank_lines)?);
            }
            Ok(corpus)
        } else {
            let group = CorpusGroup::from_file(path, label_for(path)?, skip_blank_lines)?;
            Ok(Self::new(vec![group]))
        }
    }

    /// Load a JSON array of `{ "text": ..., "label": ... }` samples.
    ///
    /// Samples are grouped by label; groups appear in first-seen label order
    /// and keep their samples' relative order.
    pub fn from_samples_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read samples file {}", path.display()))?;
        let samples: Vec<TrainingSample> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse samples file {}", path.display()))?;
        Ok(Self::from_samples(samples))
    }

    /// Group samples by label in first-seen order.
    pub fn from_samples<I: IntoIterator<Item = TrainingSample>>(samples: I) -> Self {
        let mut corpus = Self::default();
        for sample in samples {
            match corpus.groups.iter_mut().find(|g| g.label == sample.label) {
                Some(group) => group.lines.push(sample.text),
                None => corpus.push(CorpusGroup::new(sample.label, vec![sample.text])),
            }
        }
        corpus
    }
}

fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to list corpus directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CORPUS_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn label_for(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .with_context(|| format!("cannot derive a label from {}", path.display()))
}
