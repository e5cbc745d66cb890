//! Smoothed probability estimates over a trained [`Model`].

use crate::classifier::model::{ClassStats, Model};
use crate::error::{Result, SieveError};

/// Estimates label priors and token likelihoods from model counts.
pub trait Estimator: Send + Sync + std::fmt::Debug {
    /// `P(token | label)`, strictly positive for every token.
    fn word_probability(&self, model: &Model, token: &str, label: &str) -> Result<f64>;

    /// `ln P(label)`, the label's share of all training documents.
    fn log_prior(&self, model: &Model, label: &str) -> Result<f64>;

    /// `ln P(token | label)` computed from already-resolved class stats.
    ///
    /// Scoring loops call this instead of [`Estimator::word_probability`] so
    /// the label lookup happens once per label, not once per token.
    fn log_likelihood(&self, stats: &ClassStats, vocabulary_size: usize, token: &str) -> f64;

    /// Get the name of this estimator for debugging and logging.
    fn name(&self) -> &str;
}

/// Additive (Lidstone) smoothing; `alpha = 1` is Laplace add-one smoothing.
///
/// ```text
/// P(t | l) = (count(t, l) + alpha) / (total_tokens(l) + alpha * |V|)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplaceEstimator {
    alpha: f64,
}

impl LaplaceEstimator {
    /// Add-one smoothing.
    pub fn new() -> Self {
        Self { alpha: 1.0 }
    }

    /// Smoothing with a custom additive constant.
    pub fn with_alpha(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(SieveError::invalid_argument(format!(
                "smoothing constant must be positive and finite, got {alpha}"
            )));
        }
        Ok(Self { alpha })
    }

    /// The additive smoothing constant.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn probability(&self, stats: &ClassStats, vocabulary_size: usize, token: &str) -> f64 {
        let word_count = stats.token_count(token) as f64;
        let total_words = stats.total_tokens() as f64;
        (word_count + self.alpha) / (total_words + self.alpha * vocabulary_size as f64)
    }
}

impl Default for LaplaceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn class_stats<'a>(model: &'a Model, label: &str) -> Result<&'a ClassStats> {
    model
        .class(label)
        .ok_or_else(|| SieveError::invalid_argument(format!("unknown label {label:?}")))
}

impl Estimator for LaplaceEstimator {
    fn word_probability(&self, model: &Model, token: &str, label: &str) -> Result<f64> {
        if model.vocabulary_size() == 0 {
            return Err(SieveError::untrained(
                "word probability requested from a model with an empty vocabulary",
            ));
        }
        let stats = class_stats(model, label)?;
        Ok(self.probability(stats, model.vocabulary_size(), token))
    }

    fn log_prior(&self, model: &Model, label: &str) -> Result<f64> {
        if model.total_documents() == 0 {
            return Err(SieveError::untrained(
                "label prior requested from a model with no documents",
            ));
        }
        let stats = class_stats(model, label)?;
        Ok((stats.document_count() as f64 / model.total_documents() as f64).ln())
    }

    fn log_likelihood(&self, stats: &ClassStats, vocabulary_size: usize, token: &str) -> f64 {
        self.probability(stats, vocabulary_size, token).ln()
    }

    fn name(&self) -> &str {
        "laplace"
    }
}
