//! Multinomial Naive Bayes classifier over bag-of-words token counts.

use std::sync::Arc;

use log::{debug, info};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::classifier::classifier::TextClassifier;
use crate::classifier::config::ClassifierConfig;
use crate::classifier::corpus::TrainingCorpus;
use crate::classifier::estimator::{Estimator, LaplaceEstimator};
use crate::classifier::model::Model;
use crate::classifier::snapshot::ModelSnapshot;
use crate::classifier::types::{LabelScore, TrainingReport, TrainingSample};
use crate::error::{Result, SieveError};

/// Naive Bayes text classifier.
///
/// Owns its [`Model`]. Training mutates the model; classification only reads
/// it. The classifier does no locking of its own: share it between threads
/// only behind a lock that serializes training against classification.
pub struct NaiveBayesClassifier {
    model: Model,
    analyzer: Arc<dyn Analyzer>,
    estimator: Arc<dyn Estimator>,
}

impl std::fmt::Debug for NaiveBayesClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaiveBayesClassifier")
            .field("labels", &self.model.label_count())
            .field("vocabulary_size", &self.model.vocabulary_size())
            .field("total_documents", &self.model.total_documents())
            .field("analyzer", &self.analyzer.name())
            .field("estimator", &self.estimator.name())
            .finish()
    }
}

impl NaiveBayesClassifier {
    /// Create an untrained classifier with the standard analyzer and add-one
    /// smoothing.
    pub fn new() -> Result<Self> {
        Ok(Self::with_components(
            Arc::new(StandardAnalyzer::new()?),
            Arc::new(LaplaceEstimator::new()),
        ))
    }

    /// Create an untrained classifier from a configuration.
    pub fn with_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_components(
            Arc::new(config.build_analyzer()?),
            Arc::new(LaplaceEstimator::with_alpha(config.smoothing)?),
        ))
    }

    /// Create an untrained classifier from explicit components.
    pub fn with_components(analyzer: Arc<dyn Analyzer>, estimator: Arc<dyn Estimator>) -> Self {
        Self {
            model: Model::new(),
            analyzer,
            estimator,
        }
    }

    /// Start from an existing model instead of an empty one.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Swap in a whole new model, returning the previous one.
    ///
    /// The new model replaces the old one outright; nothing is merged.
    pub fn replace_model(&mut self, model: Model) -> Model {
        std::mem::replace(&mut self.model, model)
    }

    /// The trained state.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Consume the classifier, keeping its trained state.
    pub fn into_model(self) -> Model {
        self.model
    }

    /// Capture the trained state as a plain snapshot.
    pub fn to_snapshot(&self) -> ModelSnapshot {
        self.model.to_snapshot()
    }

    /// Tokenize text the same way training and classification do.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        self.analyzer.analyze_terms(text)
    }

    /// Add one labelled training document.
    pub fn add_document(&mut self, text: &str, label: &str) -> Result<()> {
        self.add_document_counted(text, label).map(|_| ())
    }

    fn add_document_counted(&mut self, text: &str, label: &str) -> Result<usize> {
        if label.is_empty() {
            return Err(SieveError::invalid_argument(
                "training document label must not be empty",
            ));
        }
        let tokens = self.tokenize(text)?;
        let token_count = tokens.len();
        self.model.add_tokens(label, &tokens)?;
        debug!("trained {token_count} tokens under {label:?}");
        Ok(token_count)
    }

    /// Train on a batch of labelled samples, in order.
    pub fn train<'a, I>(&mut self, samples: I) -> Result<TrainingReport>
    where
        I: IntoIterator<Item = &'a TrainingSample>,
    {
        let mut report = TrainingReport::default();
        for sample in samples {
            let tokens = self.add_document_counted(&sample.text, &sample.label)?;
            report.record(&sample.label, tokens);
        }
        Ok(report)
    }

    /// Train on every line of every group of a corpus, group by group.
    pub fn train_corpus(&mut self, corpus: &TrainingCorpus) -> Result<TrainingReport> {
        let mut report = TrainingReport::default();
        for group in corpus.groups() {
            for line in &group.lines {
                let tokens = self.add_document_counted(line, &group.label)?;
                report.record(&group.label, tokens);
            }
        }
        info!(
            "trained {} documents ({} tokens) across {} labels; vocabulary is now {}",
            report.documents,
            report.tokens,
            report.labels.len(),
            self.model.vocabulary_size()
        );
        Ok(report)
    }

    /// Smoothed `P(token | label)` under the current model.
    pub fn word_probability(&self, token: &str, label: &str) -> Result<f64> {
        self.estimator.word_probability(&self.model, token, label)
    }

    /// Log-space score of every label for `text`, in label order.
    ///
    /// Empty when the model cannot make a decision (no labels or an empty
    /// vocabulary).
    pub fn scores(&self, text: &str) -> Result<Vec<LabelScore>> {
        if !self.model.is_trained() || self.model.vocabulary_size() == 0 {
            return Ok(Vec::new());
        }

        let tokens = self.tokenize(text)?;
        let vocabulary_size = self.model.vocabulary_size();
        let mut scores = Vec::with_capacity(self.model.label_count());

        for (label, stats) in self.model.classes() {
            let mut score = self.estimator.log_prior(&self.model, label)?;
            for token in &tokens {
                score += self.estimator.log_likelihood(stats, vocabulary_size, token);
            }
            scores.push(LabelScore {
                label: label.to_string(),
                score,
            });
        }

        Ok(scores)
    }

    /// Most probable label for `text`, or `None` when there is nothing to
    /// decide between.
    ///
    /// Ties keep the label that was trained first.
    pub fn classify(&self, text: &str) -> Result<Option<String>> {
        let mut best: Option<LabelScore> = None;
        for candidate in self.scores(text)? {
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        let decision = best.map(|b| b.label);
        debug!("classified text as {decision:?}");
        Ok(decision)
    }
}

impl TextClassifier for NaiveBayesClassifier {
    fn classify(&self, text: &str) -> Result<Option<String>> {
        NaiveBayesClassifier::classify(self, text)
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}
