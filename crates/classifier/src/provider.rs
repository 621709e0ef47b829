//! The text-completion seam.

use crate::CompletionError;
use async_trait::async_trait;

/// A text-completion backend answering a single-turn prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// A non-success response is an error, never an empty answer.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Get provider name
    fn name(&self) -> &str;
}
