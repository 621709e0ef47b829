//! The search provider seam.
//!
//! The aggregator talks to the video platform only through
//! [`SearchProvider`], so tests can drive it with canned pages.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use video_model::{VideoId, ViewCount};

/// Result kind the search endpoint reports for videos.
pub const VIDEO_KIND: &str = "youtube#video";

/// One paginated search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// RFC 3339 UTC timestamp; only content published after it is returned
    pub published_after: String,
    pub page_size: u32,
    /// Continuation token from the previous page, `None` for the first page
    pub page_token: Option<String>,
}

/// A single search hit as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub kind: String,
    /// Present only for video results
    pub video_id: Option<VideoId>,
    pub channel_id: String,
    pub channel_title: String,
    pub title: String,
}

impl SearchItem {
    pub fn video(
        video_id: impl Into<String>,
        title: impl Into<String>,
        channel_id: impl Into<String>,
        channel_title: impl Into<String>,
    ) -> Self {
        Self {
            kind: VIDEO_KIND.to_string(),
            video_id: Some(video_id.into()),
            channel_id: channel_id.into(),
            channel_title: channel_title.into(),
            title: title.into(),
        }
    }

    /// The video ID, if this hit is a video.
    pub fn as_video_id(&self) -> Option<&str> {
        if self.kind == VIDEO_KIND {
            self.video_id.as_deref()
        } else {
            None
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

/// Access to the video platform's search and statistics endpoints.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch one page of search results.
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage>;

    /// Fetch view counts for a batch of videos in a single call.
    ///
    /// IDs the platform does not report are simply absent from the map.
    async fn video_statistics(&self, video_ids: &[VideoId]) -> Result<HashMap<VideoId, ViewCount>>;

    /// Get provider name
    fn name(&self) -> &str;
}
