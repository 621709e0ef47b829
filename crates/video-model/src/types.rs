//! Core domain types for a watch run.
//!
//! Everything here lives for the duration of a single run: candidates are
//! created from search results, grouped by channel, filtered, classified and
//! finally rendered into a digest. Nothing is persisted between runs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Platform identifier of a video (e.g. `dQw4w9WgXcQ`)
pub type VideoId = String;

/// Stable platform identifier of a channel (e.g. `UC...`)
pub type ChannelId = String;

/// Base URL used to build watch links for candidates
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

// =============================================================================
// View Count
// =============================================================================

/// View count reported by the statistics lookup.
///
/// `Unknown` covers a failed lookup, an ID missing from the response and an
/// unparseable `viewCount`. It compares and renders as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewCount(Option<u64>);

impl ViewCount {
    pub fn known(count: u64) -> Self {
        Self(Some(count))
    }

    pub fn unknown() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<u64> {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }

    /// Value used for threshold checks and display.
    pub fn or_zero(&self) -> u64 {
        self.0.unwrap_or(0)
    }
}

impl fmt::Display for ViewCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.or_zero())
    }
}

// =============================================================================
// Video Candidate
// =============================================================================

/// A single video extracted from a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub video_id: VideoId,
    pub title: String,
    pub url: String,
    pub channel_id: ChannelId,
    pub channel_title: String,
    pub view_count: ViewCount,
}

impl VideoCandidate {
    pub fn new(
        video_id: impl Into<VideoId>,
        title: impl Into<String>,
        channel_id: impl Into<ChannelId>,
        channel_title: impl Into<String>,
        view_count: ViewCount,
    ) -> Self {
        let video_id = video_id.into();
        let url = format!("{WATCH_URL_BASE}{video_id}");
        Self {
            video_id,
            title: title.into(),
            url,
            channel_id: channel_id.into(),
            channel_title: channel_title.into(),
            view_count,
        }
    }
}

// =============================================================================
// Channel Grouping
// =============================================================================

/// Videos found for one channel, in search result order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelGroup {
    pub channel_id: ChannelId,
    /// Display title as first seen for this channel
    pub channel_title: String,
    pub videos: Vec<VideoCandidate>,
}

/// Insertion-ordered grouping of candidates keyed by stable channel ID.
///
/// Two channels sharing a display title stay in separate groups.
#[derive(Debug, Clone, Default)]
pub struct ChannelGroups {
    groups: Vec<ChannelGroup>,
    positions: HashMap<ChannelId, usize>,
}

impl ChannelGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate to its channel's group, creating the group on first sight.
    pub fn push(&mut self, candidate: VideoCandidate) {
        match self.positions.get(&candidate.channel_id) {
            Some(&idx) => self.groups[idx].videos.push(candidate),
            None => {
                self.positions
                    .insert(candidate.channel_id.clone(), self.groups.len());
                self.groups.push(ChannelGroup {
                    channel_id: candidate.channel_id.clone(),
                    channel_title: candidate.channel_title.clone(),
                    videos: vec![candidate],
                });
            }
        }
    }

    pub fn get(&self, channel_id: &str) -> Option<&ChannelGroup> {
        self.positions.get(channel_id).map(|&idx| &self.groups[idx])
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of videos across all channels
    pub fn video_count(&self) -> usize {
        self.groups.iter().map(|g| g.videos.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelGroup> {
        self.groups.iter()
    }

    /// Keep only the videos matching `keep`; channels left empty are removed.
    pub fn retain_videos<F>(&mut self, mut keep: F)
    where
        F: FnMut(&VideoCandidate) -> bool,
    {
        for group in &mut self.groups {
            group.videos.retain(|v| keep(v));
        }
        self.groups.retain(|g| !g.videos.is_empty());
        self.positions = self
            .groups
            .iter()
            .enumerate()
            .map(|(idx, g)| (g.channel_id.clone(), idx))
            .collect();
    }

    /// Flatten into channel-then-video insertion order.
    pub fn into_candidates(self) -> Vec<VideoCandidate> {
        self.groups.into_iter().flat_map(|g| g.videos).collect()
    }
}

impl FromIterator<VideoCandidate> for ChannelGroups {
    fn from_iter<I: IntoIterator<Item = VideoCandidate>>(iter: I) -> Self {
        let mut groups = ChannelGroups::new();
        for candidate in iter {
            groups.push(candidate);
        }
        groups
    }
}

// =============================================================================
// Filter Configuration
// =============================================================================

/// Channels that are never subject to the deny checks.
pub const DEFAULT_ALLOW_CHANNEL_IDS: [&str; 10] = [
    "UC-DElHAqhzeTexoF7LrRcyw",
    "UC3P015WGupr3J1EDYQoaWqw",
    "UCsLDFHx31gPSuAe6ViDjGdg",
    "UCwOr3bfCUy4hqX78ZwMlSAQ",
    "UCn4DDzHQA9CqhL--ArCa1PA",
    "UC_7cwhoVl0ZDpplpgk16w4A",
    "UCVeALQJtRCs2GsnGQFv_Efg",
    "UCLNsA4v3PHjH0C7u35mQTRw",
    "UCu1lt1j_y5iy8LsA_MH-xVQ",
    "UCnwW7lNw-VQNwPXwVXUJ1dA",
];

pub const DEFAULT_DENY_CHANNEL_NAMES: [&str; 1] = ["CNBC Television"];

pub const DEFAULT_DENY_TITLE_PHRASES: [&str; 6] = [
    "swamisamarth",
    "samarth",
    "saibaba",
    "sai baba",
    "aniruddhacharya",
    "aniruddhacharyaji",
];

pub const DEFAULT_MIN_VIEW_COUNT: u64 = 500;
pub const DEFAULT_TIME_WINDOW_HOURS: u32 = 24;

/// Raw allow/deny lists as they appear in a filter file.
///
/// Every list is optional in the file; a missing list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterLists {
    pub allow_channel_ids: Vec<String>,
    pub deny_channel_ids: Vec<String>,
    pub deny_channel_names: Vec<String>,
    pub deny_title_phrases: Vec<String>,
}

impl FilterLists {
    /// The lists shipped with the tool.
    pub fn builtin() -> Self {
        Self {
            allow_channel_ids: DEFAULT_ALLOW_CHANNEL_IDS.iter().map(|s| s.to_string()).collect(),
            deny_channel_ids: Vec::new(),
            deny_channel_names: DEFAULT_DENY_CHANNEL_NAMES.iter().map(|s| s.to_string()).collect(),
            deny_title_phrases: DEFAULT_DENY_TITLE_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Rule filter settings for one run.
///
/// Channel names and title phrases are stored lowercased so matching is
/// case-insensitive. Channel IDs are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    pub min_view_count: u64,
    pub time_window_hours: u32,
    pub deny_channel_ids: BTreeSet<ChannelId>,
    pub deny_channel_names: BTreeSet<String>,
    pub deny_title_phrases: BTreeSet<String>,
    pub allow_channel_ids: BTreeSet<ChannelId>,
}

impl FilterConfig {
    /// Config with thresholds set and every list empty.
    pub fn new(min_view_count: u64, time_window_hours: u32) -> Self {
        Self {
            min_view_count,
            time_window_hours,
            deny_channel_ids: BTreeSet::new(),
            deny_channel_names: BTreeSet::new(),
            deny_title_phrases: BTreeSet::new(),
            allow_channel_ids: BTreeSet::new(),
        }
    }

    pub fn from_lists(lists: FilterLists, min_view_count: u64, time_window_hours: u32) -> Self {
        Self::new(min_view_count, time_window_hours)
            .with_allow_channel_ids(lists.allow_channel_ids)
            .with_deny_channel_ids(lists.deny_channel_ids)
            .with_deny_channel_names(lists.deny_channel_names)
            .with_deny_title_phrases(lists.deny_title_phrases)
    }

    pub fn with_allow_channel_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_channel_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_deny_channel_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_channel_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_deny_channel_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_channel_names
            .extend(names.into_iter().map(|n| n.into().to_lowercase()));
        self
    }

    pub fn with_deny_title_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_title_phrases
            .extend(phrases.into_iter().map(|p| p.into().to_lowercase()));
        self
    }

    pub fn is_allow_listed(&self, channel_id: &str) -> bool {
        self.allow_channel_ids.contains(channel_id)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::from_lists(
            FilterLists::builtin(),
            DEFAULT_MIN_VIEW_COUNT,
            DEFAULT_TIME_WINDOW_HOURS,
        )
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Why a candidate was not accepted by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// The model answered something other than "yes" (normalized answer)
    Answer(String),
    /// The classification call itself failed
    CallFailed(String),
}

/// Outcome of relevance classification for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// How a pipeline stage aggregates failures of its external calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// One failure invalidates the whole run
    AbortRun,
    /// A failure only affects the item being processed
    SkipItem,
}
