//! # Video Model Crate
//!
//! Shared data model for a watch run.
//!
//! ## Main Components
//!
//! - **types**: VideoCandidate, ChannelGroups, FilterConfig, Verdict
//! - **parser**: raw field parsing and filter list file loading
//! - **error**: Error types for configuration loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use video_model::{ChannelGroups, VideoCandidate, ViewCount};
//!
//! let mut groups = ChannelGroups::new();
//! groups.push(VideoCandidate::new("vid1", "Title", "UC1", "Channel", ViewCount::known(900)));
//!
//! println!("{} channels, {} videos", groups.len(), groups.video_count());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;

// Re-export commonly used types for convenience
pub use error::{ModelError, Result};
pub use parser::{load_filter_lists, parse_view_count, validate_filter_config};
pub use types::{
    // Type aliases
    ChannelId,
    VideoId,
    // Core types
    ChannelGroup,
    ChannelGroups,
    FailurePolicy,
    FilterConfig,
    FilterLists,
    RejectReason,
    Verdict,
    VideoCandidate,
    ViewCount,
    // Defaults
    DEFAULT_MIN_VIEW_COUNT,
    DEFAULT_TIME_WINDOW_HOURS,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(video: &str, channel_id: &str, channel_title: &str) -> VideoCandidate {
        VideoCandidate::new(video, format!("Title {video}"), channel_id, channel_title, ViewCount::known(1000))
    }

    #[test]
    fn test_candidate_builds_watch_url() {
        let c = candidate("abc123", "UC1", "Channel");
        assert_eq!(c.url, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_groups_preserve_insertion_order() {
        let groups: ChannelGroups = vec![
            candidate("v1", "UC_B", "B"),
            candidate("v2", "UC_A", "A"),
            candidate("v3", "UC_B", "B"),
        ]
        .into_iter()
        .collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.video_count(), 3);

        let order: Vec<_> = groups.iter().map(|g| g.channel_id.as_str()).collect();
        assert_eq!(order, vec!["UC_B", "UC_A"]);

        let videos: Vec<_> = groups
            .into_candidates()
            .into_iter()
            .map(|c| c.video_id)
            .collect();
        assert_eq!(videos, vec!["v1", "v3", "v2"]);
    }

    #[test]
    fn test_groups_keyed_by_channel_id_not_title() {
        let groups: ChannelGroups = vec![
            candidate("v1", "UC_ONE", "Same Name"),
            candidate("v2", "UC_TWO", "Same Name"),
        ]
        .into_iter()
        .collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("UC_ONE").unwrap().videos.len(), 1);
        assert_eq!(groups.get("UC_TWO").unwrap().videos.len(), 1);
    }

    #[test]
    fn test_retain_videos_drops_empty_groups() {
        let mut groups: ChannelGroups = vec![
            candidate("v1", "UC_A", "A"),
            candidate("v2", "UC_B", "B"),
            candidate("v3", "UC_B", "B"),
        ]
        .into_iter()
        .collect();

        groups.retain_videos(|c| c.video_id != "v1" && c.video_id != "v2");

        assert_eq!(groups.len(), 1);
        assert!(groups.get("UC_A").is_none());
        assert_eq!(groups.get("UC_B").unwrap().videos[0].video_id, "v3");

        // Positions are rebuilt, so pushing to a surviving channel appends to it
        groups.push(candidate("v4", "UC_B", "B"));
        assert_eq!(groups.get("UC_B").unwrap().videos.len(), 2);
    }

    #[test]
    fn test_filter_config_lowercases_names_and_phrases() {
        let config = FilterConfig::new(500, 24)
            .with_deny_channel_names(["CNBC Television"])
            .with_deny_title_phrases(["Sai Baba"]);

        assert!(config.deny_channel_names.contains("cnbc television"));
        assert!(config.deny_title_phrases.contains("sai baba"));
    }

    #[test]
    fn test_default_filter_config_uses_builtin_lists() {
        let config = FilterConfig::default();
        assert_eq!(config.min_view_count, 500);
        assert_eq!(config.time_window_hours, 24);
        assert_eq!(config.allow_channel_ids.len(), 10);
        assert!(config.deny_channel_ids.is_empty());
        assert!(config.deny_title_phrases.contains("samarth"));
    }

    #[test]
    fn test_view_count_unknown_renders_as_zero() {
        assert_eq!(ViewCount::unknown().to_string(), "0");
        assert_eq!(ViewCount::known(42).to_string(), "42");
        assert!(!ViewCount::unknown().is_known());
    }
}
