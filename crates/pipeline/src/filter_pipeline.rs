//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{ChannelDenyFilter, MinimumViewsFilter, TitlePhraseFilter};
use crate::traits::Filter;
use tracing::debug;
use video_model::{ChannelGroups, FilterConfig, VideoCandidate};

/// Keep/drop outcome for a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Keep,
    /// Dropped by the named filter (the first one that rejected it)
    Drop { filter: String },
}

impl Decision {
    pub fn is_keep(&self) -> bool {
        matches!(self, Decision::Keep)
    }
}

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ChannelDenyFilter)
///     .add_filter(TitlePhraseFilter)
///     .add_filter(MinimumViewsFilter);
///
/// let kept = pipeline.apply(candidates, &config);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The rule filter used for every run.
    ///
    /// Order matters only for the reported drop reason: channel deny lists,
    /// then title phrases, then the view-count threshold.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(ChannelDenyFilter)
            .add_filter(TitlePhraseFilter)
            .add_filter(MinimumViewsFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Evaluate one candidate; the first rejecting filter wins.
    pub fn decide(&self, candidate: &VideoCandidate, config: &FilterConfig) -> Decision {
        self.filters
            .iter()
            .find(|filter| !filter.admits(candidate, config))
            .map(|filter| Decision::Drop {
                filter: filter.name().to_string(),
            })
            .unwrap_or(Decision::Keep)
    }

    /// Apply all filters to the candidates, preserving order.
    pub fn apply(&self, candidates: Vec<VideoCandidate>, config: &FilterConfig) -> Vec<VideoCandidate> {
        let input = candidates.len();
        let kept: Vec<VideoCandidate> = candidates
            .into_iter()
            .filter(|candidate| self.keep_logged(candidate, config))
            .collect();
        debug!("Filter pipeline kept {} of {} candidates", kept.len(), input);
        kept
    }

    /// Filter channel groups in place, removing channels left without videos.
    pub fn apply_to_groups(&self, groups: &mut ChannelGroups, config: &FilterConfig) {
        let input = groups.video_count();
        groups.retain_videos(|candidate| self.keep_logged(candidate, config));
        debug!(
            "Filter pipeline kept {} of {} candidates across {} channels",
            groups.video_count(),
            input,
            groups.len()
        );
    }

    fn keep_logged(&self, candidate: &VideoCandidate, config: &FilterConfig) -> bool {
        match self.decide(candidate, config) {
            Decision::Keep => true,
            Decision::Drop { filter } => {
                debug!(
                    video_id = %candidate.video_id,
                    channel = %candidate.channel_title,
                    "Dropped by {}",
                    filter
                );
                false
            }
        }
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
