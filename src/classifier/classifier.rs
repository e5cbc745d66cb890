//! Text classifier trait definition.

use crate::error::Result;

/// Text classifier trait.
///
/// This is the interface an embedding layer (a page scraper, a moderation
/// hook, the CLI) calls once per candidate text.
pub trait TextClassifier: Send + Sync {
    /// Predict the label for a given text.
    ///
    /// Returns `Ok(None)` ("no decision") when the classifier has nothing to
    /// choose from, such as before any training.
    fn classify(&self, text: &str) -> Result<Option<String>>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
