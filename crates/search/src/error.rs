//! Error types for the search crate.

use thiserror::Error;

/// Failure of a call to the video search provider.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Request never produced a response (DNS, connect, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success HTTP status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client could not be constructed
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl SearchError {
    /// Whether the same request might succeed if tried again later.
    ///
    /// Nothing retries today; the flag is carried into logs.
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::Transport(_) => true,
            SearchError::Status { status, .. } => *status == 429 || *status >= 500,
            SearchError::Decode(_) | SearchError::Setup(_) => false,
        }
    }
}

/// The request URL carries the API key, so it is stripped from the message.
impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.without_url().to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SearchError::Transport("reset".into()).is_transient());
        assert!(SearchError::Status { status: 503, body: String::new() }.is_transient());
        assert!(SearchError::Status { status: 429, body: String::new() }.is_transient());
        assert!(!SearchError::Status { status: 403, body: "quotaExceeded".into() }.is_transient());
        assert!(!SearchError::Decode("eof".into()).is_transient());
    }
}
