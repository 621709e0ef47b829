//! Relevance classifier for video titles.
//!
//! This crate asks a language model whether a title is about the tracked
//! person. It handles:
//! - Rendering the yes/no instruction prompt
//! - Calling the completion endpoint (one request per title, no retry)
//! - Normalizing the answer into a [`Verdict`]
//! - Turning call failures into rejections for that title only, or
//!   aborting the batch when the stage is configured to fail fast

use futures::stream::{self, StreamExt};
use std::pin::pin;
use thiserror::Error;
use tracing::{debug, error, warn};
use video_model::{FailurePolicy, RejectReason, Verdict};

pub mod azure;
pub mod prompt;
pub mod provider;

pub use azure::{AzureChatClient, CompletionSettings};
pub use prompt::PromptTemplate;
pub use provider::CompletionProvider;

/// Errors that can occur when calling the completion service
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Failed to reach completion service: {0}")]
    Transport(String),

    #[error("Completion service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from completion service: {0}")]
    Decode(String),

    #[error("Completion service returned no answer")]
    EmptyResponse,

    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl CompletionError {
    /// Whether the same request might succeed later (rate limit, outage).
    pub fn is_transient(&self) -> bool {
        match self {
            CompletionError::Transport(_) => true,
            CompletionError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Interpret a raw model answer: only a literal "yes" (any case, surrounding
/// whitespace ignored) is an acceptance.
pub fn interpret_answer(raw: &str) -> Verdict {
    let normalized = raw.trim().to_lowercase();
    if normalized == "yes" {
        Verdict::Accepted
    } else {
        Verdict::Rejected(RejectReason::Answer(normalized))
    }
}

/// Classifies titles against the tracked topic.
pub struct RelevanceClassifier<P> {
    provider: P,
    template: PromptTemplate,
    concurrency: usize,
    failure_policy: FailurePolicy,
}

impl<P: CompletionProvider> RelevanceClassifier<P> {
    /// Classifier issuing one request at a time, rejecting titles whose call fails.
    pub fn new(provider: P, template: PromptTemplate) -> Self {
        Self {
            provider,
            template,
            concurrency: 1,
            failure_policy: FailurePolicy::SkipItem,
        }
    }

    /// Allow up to `concurrency` requests in flight in [`classify_all`](Self::classify_all).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// How [`classify_all`](Self::classify_all) treats a failed call.
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// One completion request for `title`; the answer is interpreted, a failed call is returned.
    pub async fn try_classify(&self, title: &str) -> Result<Verdict, CompletionError> {
        let prompt = self.template.render(title);
        let answer = self.provider.complete(&prompt).await?;
        let verdict = interpret_answer(&answer);
        debug!(title, answer = %answer.trim(), accepted = verdict.is_accepted(), "Classified title");
        Ok(verdict)
    }

    /// Classify one title with exactly one completion request.
    ///
    /// A failed call rejects the title; it never fails the caller.
    pub async fn classify(&self, title: &str) -> Verdict {
        match self.try_classify(title).await {
            Ok(verdict) => verdict,
            Err(e) => reject_failed_call(title, e),
        }
    }

    /// Classify titles, returning verdicts in input order.
    ///
    /// With the default concurrency of 1 requests are strictly sequential.
    /// Under [`FailurePolicy::SkipItem`] a failed call rejects that title only
    /// and this never errors. Under [`FailurePolicy::AbortRun`] the first
    /// failure is returned and no further requests are started.
    pub async fn classify_all(&self, titles: &[&str]) -> Result<Vec<Verdict>, CompletionError> {
        let results = stream::iter(
            titles
                .iter()
                .map(|title| async move { (*title, self.try_classify(title).await) }),
        )
        .buffered(self.concurrency);
        let mut results = pin!(results);

        let mut verdicts = Vec::with_capacity(titles.len());
        while let Some((title, result)) = results.next().await {
            match (result, self.failure_policy) {
                (Ok(verdict), _) => verdicts.push(verdict),
                (Err(e), FailurePolicy::SkipItem) => verdicts.push(reject_failed_call(title, e)),
                (Err(e), FailurePolicy::AbortRun) => {
                    error!(title, "Classification failed, aborting remaining titles: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(verdicts)
    }
}

fn reject_failed_call(title: &str, e: CompletionError) -> Verdict {
    if e.is_transient() {
        warn!(title, "Classification failed (transient), rejecting: {}", e);
    } else {
        error!(title, "Classification failed, rejecting: {}", e);
    }
    Verdict::Rejected(RejectReason::CallFailed(e.to_string()))
}
