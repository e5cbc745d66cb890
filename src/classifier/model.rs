//! Training statistics: per-label document and token counts plus the
//! global vocabulary.
//!
//! A [`Model`] starts empty and only grows. Counts are never decremented and
//! labels are never removed; the only way to "shrink" a model is to replace
//! it wholesale with one decoded from a snapshot.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, SieveError};

/// Counts collected for one label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStats {
    document_count: u64,
    token_counts: HashMap<String, u64>,
    /// Sum of `token_counts` values, kept in step with every increment.
    total_tokens: u64,
}

impl ClassStats {
    /// Create empty statistics for a freshly seen label.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild statistics from persisted counts.
    ///
    /// The running token total is recomputed from `token_counts`.
    pub(crate) fn from_parts(document_count: u64, token_counts: HashMap<String, u64>) -> Self {
        let total_tokens = token_counts.values().sum();
        Self {
            document_count,
            token_counts,
            total_tokens,
        }
    }

    /// Number of training documents assigned to this label.
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// Occurrences of `token` across this label's documents; 0 when absent.
    pub fn token_count(&self, token: &str) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// Total token occurrences across this label's documents.
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Number of distinct tokens seen under this label.
    pub fn distinct_tokens(&self) -> usize {
        self.token_counts.len()
    }

    /// All token counts for this label.
    pub fn token_counts(&self) -> &HashMap<String, u64> {
        &self.token_counts
    }

    fn record_token(&mut self, token: &str) {
        match self.token_counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.token_counts.insert(token.to_string(), 1);
            }
        }
        self.total_tokens += 1;
    }
}

/// The trained state of a classifier.
///
/// Labels are kept in the order they were first trained. That order is the
/// iteration order of [`Model::classes`] and decides ties during
/// classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    classes: Vec<(String, ClassStats)>,
    label_index: HashMap<String, usize>,
    vocabulary: HashSet<String>,
    total_documents: u64,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one training document made of `tokens` under `label`.
    ///
    /// The label's document count and the model's document total grow by
    /// exactly one, even when `tokens` is empty. Every token occurrence is
    /// counted, so repeats within one document add up.
    pub fn add_tokens<I, S>(&mut self, label: &str, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if label.is_empty() {
            return Err(SieveError::invalid_argument(
                "training document label must not be empty",
            ));
        }

        let index = self.ensure_label(label);
        let vocabulary = &mut self.vocabulary;
        let stats = &mut self.classes[index].1;

        stats.document_count += 1;
        for token in tokens {
            let token = token.as_ref();
            if !vocabulary.contains(token) {
                vocabulary.insert(token.to_string());
            }
            stats.record_token(token);
        }
        self.total_documents += 1;

        Ok(())
    }

    /// Statistics for `label`, if it has been trained.
    pub fn class(&self, label: &str) -> Option<&ClassStats> {
        self.label_index
            .get(label)
            .map(|&index| &self.classes[index].1)
    }

    /// Labels with their statistics, in first-trained order.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassStats)> {
        self.classes
            .iter()
            .map(|(label, stats)| (label.as_str(), stats))
    }

    /// Labels in first-trained order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|(label, _)| label.as_str())
    }

    /// Number of distinct labels.
    pub fn label_count(&self) -> usize {
        self.classes.len()
    }

    /// The set of distinct tokens seen across all labels.
    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    /// Number of distinct tokens seen across all labels.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `token` has been seen under any label.
    pub fn contains_token(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }

    /// Number of training documents across all labels.
    pub fn total_documents(&self) -> u64 {
        self.total_documents
    }

    /// Whether at least one document has been trained.
    pub fn is_trained(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Assemble a model from already-decoded parts, checking every
    /// structural invariant. Used by the snapshot codec.
    pub(crate) fn from_parts(
        classes: Vec<(String, ClassStats)>,
        vocabulary: HashSet<String>,
        total_documents: u64,
    ) -> Result<Self> {
        let mut label_index = HashMap::with_capacity(classes.len());
        let mut document_sum: u64 = 0;
        let mut seen_tokens: HashSet<&str> = HashSet::new();

        for (index, (label, stats)) in classes.iter().enumerate() {
            if label.is_empty() {
                return Err(SieveError::decode("class label must not be empty"));
            }
            if label_index.insert(label.clone(), index).is_some() {
                return Err(SieveError::decode(format!("duplicate class label {label:?}")));
            }
            if stats.document_count == 0 {
                return Err(SieveError::decode(format!(
                    "class {label:?} has a document count of 0"
                )));
            }
            document_sum = document_sum.checked_add(stats.document_count).ok_or_else(|| {
                SieveError::decode("document counts overflow a 64-bit total")
            })?;

            for (token, &count) in &stats.token_counts {
                if count == 0 {
                    return Err(SieveError::decode(format!(
                        "class {label:?} has a zero count for token {token:?}"
                    )));
                }
                if !vocabulary.contains(token) {
                    return Err(SieveError::decode(format!(
                        "token {token:?} of class {label:?} is missing from the vocabulary"
                    )));
                }
                seen_tokens.insert(token.as_str());
            }
        }

        if document_sum != total_documents {
            return Err(SieveError::decode(format!(
                "total_documents is {total_documents} but classes sum to {document_sum}"
            )));
        }
        if let Some(orphan) = vocabulary
            .iter()
            .find(|token| !seen_tokens.contains(token.as_str()))
        {
            return Err(SieveError::decode(format!(
                "vocabulary token {orphan:?} does not occur in any class"
            )));
        }

        Ok(Self {
            classes,
            label_index,
            vocabulary,
            total_documents,
        })
    }

    fn ensure_label(&mut self, label: &str) -> usize {
        if let Some(&index) = self.label_index.get(label) {
            return index;
        }
        let index = self.classes.len();
        self.classes.push((label.to_string(), ClassStats::new()));
        self.label_index.insert(label.to_string(), index);
        index
    }
}
