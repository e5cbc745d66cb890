//! Naive Bayes text classification with persistent trained state.
//!
//! # Architecture
//!
//! - [`Model`]: per-label document and token counts plus the vocabulary
//! - [`Estimator`] / [`LaplaceEstimator`]: smoothed token likelihoods and priors
//! - [`NaiveBayesClassifier`]: training and log-space MAP classification
//! - [`ModelSnapshot`]: plain snapshot of a model, JSON or binary encoded
//! - [`SnapshotStore`]: key → blob persistence for encoded snapshots
//! - [`TrainingCorpus`]: `(label, lines)` groups loaded from files
//!
//! # Example
//!
//! ```
//! use sieve::classifier::NaiveBayesClassifier;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut classifier = NaiveBayesClassifier::new()?;
//! classifier.add_document("god is real", "theist")?;
//! classifier.add_document("nature is beautiful", "neutral")?;
//! classifier.add_document("prayer works", "theist")?;
//!
//! let label = classifier.classify("god answers prayer")?;
//! assert_eq!(label.as_deref(), Some("theist"));
//! # Ok(())
//! # }
//! ```

#[allow(clippy::module_inception)]
mod classifier;
mod config;
mod corpus;
mod estimator;
mod model;
mod naive_bayes;
mod snapshot;
mod store;
mod types;

// Public exports
pub use classifier::TextClassifier;
pub use config::ClassifierConfig;
pub use corpus::{CORPUS_EXTENSION, CorpusGroup, TrainingCorpus};
pub use estimator::{Estimator, LaplaceEstimator};
pub use model::{ClassStats, Model};
pub use naive_bayes::NaiveBayesClassifier;
pub use snapshot::{
    ClassSnapshot, ModelSnapshot, SNAPSHOT_MAGIC, SNAPSHOT_VERSION, SnapshotFormat,
};
pub use store::{
    FileSnapshotStore, MemorySnapshotStore, SnapshotStore, load_model, load_model_or_empty,
    save_model,
};
pub use types::{LabelScore, TrainingReport, TrainingSample};
