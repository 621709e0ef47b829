//! Filter to enforce the minimum view count.
//!
//! This one applies to every candidate, allow-listed or not.

use crate::traits::Filter;
use video_model::{FilterConfig, VideoCandidate};

/// Removes candidates with fewer views than `min_view_count`.
///
/// An unknown view count counts as zero.
pub struct MinimumViewsFilter;

impl Filter for MinimumViewsFilter {
    fn name(&self) -> &str {
        "MinimumViewsFilter"
    }

    fn admits(&self, candidate: &VideoCandidate, config: &FilterConfig) -> bool {
        candidate.view_count.or_zero() >= config.min_view_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use video_model::ViewCount;

    fn with_views(id: &str, views: ViewCount) -> VideoCandidate {
        VideoCandidate::new(id, "Title", "UC1", "Channel", views)
    }

    #[test]
    fn test_minimum_views_filter() {
        let config = FilterConfig::new(500, 24);

        let candidates = vec![
            with_views("v1", ViewCount::known(499)),
            with_views("v2", ViewCount::known(500)),
            with_views("v3", ViewCount::known(10_000)),
            with_views("v4", ViewCount::unknown()),
        ];

        let filtered = MinimumViewsFilter.apply(candidates, &config);

        let ids: Vec<_> = filtered.iter().map(|c| c.video_id.as_str()).collect();
        assert_eq!(ids, vec!["v2", "v3"]);
    }

    #[test]
    fn test_zero_threshold_keeps_unknown() {
        let config = FilterConfig::new(0, 24);
        assert!(MinimumViewsFilter.admits(&with_views("v1", ViewCount::unknown()), &config));
    }

    #[test]
    fn test_allow_list_does_not_bypass_threshold() {
        let config = FilterConfig::new(500, 24).with_allow_channel_ids(["UC1"]);
        assert!(!MinimumViewsFilter.admits(&with_views("v1", ViewCount::known(10)), &config));
    }
}
