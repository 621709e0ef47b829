//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible exclusion rules to be applied to candidate videos.

use video_model::{FilterConfig, VideoCandidate};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
/// Filters are pure: the same candidate and config always give the same answer.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `candidate` survives this filter under `config`.
    fn admits(&self, candidate: &VideoCandidate, config: &FilterConfig) -> bool;

    /// Apply this filter to a set of candidates, preserving their order.
    fn apply(&self, candidates: Vec<VideoCandidate>, config: &FilterConfig) -> Vec<VideoCandidate> {
        candidates
            .into_iter()
            .filter(|candidate| self.admits(candidate, config))
            .collect()
    }
}
