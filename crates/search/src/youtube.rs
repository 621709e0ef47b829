//! YouTube Data API v3 client.
//!
//! Implements [`SearchProvider`] over `search.list` and `videos.list` using
//! an API key. Only the fields the watch pipeline needs are decoded.

use crate::error::{Result, SearchError};
use crate::provider::{SearchItem, SearchPage, SearchProvider, SearchRequest};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};
use video_model::{VideoId, ViewCount, parse_view_count};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct YouTubeClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API root (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("YouTube API error on {}: {} {}", endpoint, status, body);
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| SearchError::Decode(format!("{endpoint}: {e}")))
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<ApiSearchResult>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchResult {
    id: ApiResourceId,
    snippet: ApiSearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResourceId {
    kind: String,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSearchSnippet {
    #[serde(default)]
    channel_id: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<ApiVideo>,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    id: String,
    statistics: Option<ApiVideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiVideoStatistics {
    view_count: Option<String>,
}

impl From<ApiSearchResult> for SearchItem {
    fn from(result: ApiSearchResult) -> Self {
        SearchItem {
            kind: result.id.kind,
            video_id: result.id.video_id,
            channel_id: result.snippet.channel_id,
            channel_title: result.snippet.channel_title,
            title: result.snippet.title,
        }
    }
}

#[async_trait]
impl SearchProvider for YouTubeClient {
    async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", request.query.clone()),
            ("type", "video".to_string()),
            ("publishedAfter", request.published_after.clone()),
            ("maxResults", request.page_size.to_string()),
        ];
        if let Some(token) = &request.page_token {
            params.push(("pageToken", token.clone()));
        }

        let response: SearchListResponse = self.get_json("search", &params).await?;
        debug!(
            "search.list returned {} items (next page: {})",
            response.items.len(),
            response.next_page_token.is_some()
        );

        Ok(SearchPage {
            items: response.items.into_iter().map(SearchItem::from).collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video_statistics(&self, video_ids: &[VideoId]) -> Result<HashMap<VideoId, ViewCount>> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let params = [
            ("part", "snippet,statistics".to_string()),
            ("id", video_ids.join(",")),
        ];

        let response: VideoListResponse = self.get_json("videos", &params).await?;
        Ok(response
            .items
            .into_iter()
            .map(|video| {
                let raw = video.statistics.as_ref().and_then(|s| s.view_count.as_deref());
                let count = parse_view_count(raw);
                (video.id, count)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "youtube"
    }
}
