//! Search Aggregator - paginated collection of recent videos
//!
//! Drives the search provider page by page and groups every video hit by
//! channel.
//!
//! ## Algorithm
//! 1. Compute the publish cutoff once (`now - window`)
//! 2. Request a page of search results
//! 3. Look up view counts for all videos on that page in one batched call
//! 4. Turn each video hit into a candidate and add it to its channel group
//! 5. Repeat with the continuation token until none is returned or the page
//!    cap is reached
//!
//! A failed search call fails the whole aggregation under
//! [`FailurePolicy::AbortRun`] (the default). Under [`FailurePolicy::SkipItem`]
//! the failing page is dropped, pagination stops there and the videos already
//! collected are kept. A failed statistics call only leaves that page's view
//! counts unknown.

use crate::error::Result;
use crate::provider::{SearchProvider, SearchRequest};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};
use video_model::{ChannelGroups, FailurePolicy, VideoCandidate, VideoId, ViewCount};

/// Maximum page size the search endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 50;

/// Page cap applied when none is configured
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// Settings for one aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub query: String,
    pub window_hours: u32,
    pub page_size: u32,
    pub max_pages: u32,
    /// What a failed search call does to the aggregation
    pub failure_policy: FailurePolicy,
}

impl SearchConfig {
    pub fn new(query: impl Into<String>, window_hours: u32) -> Self {
        Self {
            query: query.into(),
            window_hours,
            page_size: MAX_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            failure_policy: FailurePolicy::AbortRun,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}

/// Format the publish cutoff the way the search endpoint expects it.
pub fn published_after(now: DateTime<Utc>, window_hours: u32) -> String {
    let cutoff = now - Duration::hours(i64::from(window_hours));
    cutoff.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Collects recent videos for a query into channel groups.
pub struct SearchAggregator<P> {
    provider: P,
    config: SearchConfig,
}

impl<P: SearchProvider> SearchAggregator<P> {
    pub fn new(provider: P, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Aggregate every matching video published within the window ending now.
    pub async fn aggregate(&self) -> Result<ChannelGroups> {
        self.aggregate_at(Utc::now()).await
    }

    /// Aggregate with an explicit "now", so the cutoff is reproducible.
    #[instrument(skip(self), fields(query = %self.config.query, provider = self.provider.name()))]
    pub async fn aggregate_at(&self, now: DateTime<Utc>) -> Result<ChannelGroups> {
        let cutoff = published_after(now, self.config.window_hours);
        info!("Searching for videos published after {}", cutoff);

        let mut groups = ChannelGroups::new();
        let mut seen: HashSet<VideoId> = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let request = SearchRequest {
                query: self.config.query.clone(),
                published_after: cutoff.clone(),
                page_size: self.config.page_size,
                page_token: page_token.take(),
            };
            let page = match self.provider.search_page(&request).await {
                Ok(page) => page,
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::AbortRun => return Err(e),
                    FailurePolicy::SkipItem => {
                        warn!(
                            "Search page {} failed, keeping {} videos collected so far: {}",
                            pages + 1,
                            groups.video_count(),
                            e
                        );
                        break;
                    }
                },
            };
            pages += 1;

            let video_ids: Vec<VideoId> = page
                .items
                .iter()
                .filter_map(|item| item.as_video_id().map(str::to_string))
                .collect();
            let view_counts = self.lookup_view_counts(&video_ids).await;

            for item in page.items {
                let Some(video_id) = item.as_video_id().map(str::to_string) else {
                    debug!("Skipping non-video result of kind {}", item.kind);
                    continue;
                };
                if !seen.insert(video_id.clone()) {
                    debug!("Skipping repeated video {}", video_id);
                    continue;
                }
                let view_count = view_counts
                    .get(&video_id)
                    .copied()
                    .unwrap_or_else(ViewCount::unknown);
                groups.push(VideoCandidate::new(
                    video_id,
                    item.title,
                    item.channel_id,
                    item.channel_title,
                    view_count,
                ));
            }

            match page.next_page_token {
                Some(token) if pages >= self.config.max_pages => {
                    warn!(
                        "Stopping after {} pages (page cap reached, next token {})",
                        pages, token
                    );
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(
            "Collected {} videos from {} channels over {} pages",
            groups.video_count(),
            groups.len(),
            pages
        );
        Ok(groups)
    }

    /// Batched statistics lookup for one page.
    ///
    /// Failures degrade to an empty map so every count on the page is unknown.
    async fn lookup_view_counts(&self, video_ids: &[VideoId]) -> HashMap<VideoId, ViewCount> {
        if video_ids.is_empty() {
            return HashMap::new();
        }
        match self.provider.video_statistics(video_ids).await {
            Ok(counts) => {
                if counts.len() < video_ids.len() {
                    debug!(
                        "Statistics missing for {} of {} videos",
                        video_ids.len() - counts.len(),
                        video_ids.len()
                    );
                }
                counts
            }
            Err(e) => {
                warn!(
                    transient = e.is_transient(),
                    "Statistics lookup failed for {} videos, view counts unknown: {}",
                    video_ids.len(),
                    e
                );
                HashMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::provider::{SearchItem, SearchPage};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ============================================================================
    // Fake provider
    // ============================================================================

    /// Serves canned pages keyed by page token ("" for the first page).
    #[derive(Default)]
    struct FakeProvider {
        pages: HashMap<String, std::result::Result<SearchPage, u16>>,
        stats: HashMap<VideoId, ViewCount>,
        fail_stats: bool,
        search_calls: AtomicUsize,
        stats_calls: AtomicUsize,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl FakeProvider {
        fn with_page(mut self, token: &str, page: SearchPage) -> Self {
            self.pages.insert(token.to_string(), Ok(page));
            self
        }

        fn with_failing_page(mut self, token: &str, status: u16) -> Self {
            self.pages.insert(token.to_string(), Err(status));
            self
        }

        fn with_views(mut self, video_id: &str, views: u64) -> Self {
            self.stats.insert(video_id.to_string(), ViewCount::known(views));
            self
        }
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let key = request.page_token.clone().unwrap_or_default();
            match self.pages.get(&key) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(status)) => Err(SearchError::Status {
                    status: *status,
                    body: "boom".to_string(),
                }),
                None => Err(SearchError::Transport(format!("no page for token {key:?}"))),
            }
        }

        async fn video_statistics(&self, video_ids: &[VideoId]) -> Result<HashMap<VideoId, ViewCount>> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_stats {
                return Err(SearchError::Transport("stats down".to_string()));
            }
            Ok(video_ids
                .iter()
                .filter_map(|id| self.stats.get(id).map(|v| (id.clone(), *v)))
                .collect())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn page(prefix: &str, count: usize, channel: &str, next: Option<&str>) -> SearchPage {
        SearchPage {
            items: (0..count)
                .map(|i| {
                    SearchItem::video(
                        format!("{prefix}{i}"),
                        format!("Title {prefix}{i}"),
                        channel,
                        format!("Channel {channel}"),
                    )
                })
                .collect(),
            next_page_token: next.map(str::to_string),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    // ============================================================================
    // Tests
    // ============================================================================

    #[test]
    fn test_published_after_format() {
        assert_eq!(published_after(fixed_now(), 24), "2024-03-09T12:00:00Z");
        assert_eq!(published_after(fixed_now(), 1), "2024-03-10T11:00:00Z");
    }

    #[tokio::test]
    async fn test_two_pages_issue_two_search_and_two_stats_calls() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 50, "UC1", Some("p2")))
            .with_page("p2", page("b", 10, "UC1", None));
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        assert_eq!(aggregator.provider().search_calls.load(Ordering::SeqCst), 2);
        assert_eq!(aggregator.provider().stats_calls.load(Ordering::SeqCst), 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.video_count(), 60);
    }

    #[tokio::test]
    async fn test_cutoff_is_computed_once_for_all_pages() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 2, "UC1", Some("p2")))
            .with_page("p2", page("b", 2, "UC1", None));
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        aggregator.aggregate_at(fixed_now()).await.unwrap();

        let requests = aggregator.provider().requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].published_after, requests[1].published_after);
        assert_eq!(requests[0].page_token, None);
        assert_eq!(requests[1].page_token.as_deref(), Some("p2"));
        assert_eq!(requests[0].page_size, 50);
    }

    #[tokio::test]
    async fn test_search_error_aborts_without_partial_data() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 50, "UC1", Some("p2")))
            .with_failing_page("p2", 500);
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        let result = aggregator.aggregate_at(fixed_now()).await;

        assert!(matches!(result, Err(SearchError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_skip_policy_keeps_pages_before_failure() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 5, "UC1", Some("p2")))
            .with_failing_page("p2", 503);
        let config = SearchConfig::new("founder", 24).with_failure_policy(FailurePolicy::SkipItem);
        let aggregator = SearchAggregator::new(provider, config);

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        assert_eq!(groups.video_count(), 5);
        assert_eq!(aggregator.provider().search_calls.load(Ordering::SeqCst), 2);
        assert_eq!(aggregator.provider().stats_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_skip_policy_first_page_failure_yields_nothing() {
        let provider = FakeProvider::default().with_failing_page("", 500);
        let config = SearchConfig::new("founder", 24).with_failure_policy(FailurePolicy::SkipItem);
        let aggregator = SearchAggregator::new(provider, config);

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_page_cap_stops_pagination() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 3, "UC1", Some("p2")))
            .with_page("p2", page("b", 3, "UC1", Some("p3")))
            .with_page("p3", page("c", 3, "UC1", None));
        let config = SearchConfig::new("founder", 24).with_max_pages(2);
        let aggregator = SearchAggregator::new(provider, config);

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        assert_eq!(aggregator.provider().search_calls.load(Ordering::SeqCst), 2);
        assert_eq!(groups.video_count(), 6);
    }

    #[tokio::test]
    async fn test_view_counts_attached_and_missing_are_unknown() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 3, "UC1", None))
            .with_views("a0", 1200)
            .with_views("a2", 0);
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();
        let videos = &groups.get("UC1").unwrap().videos;

        assert_eq!(videos[0].view_count, ViewCount::known(1200));
        assert_eq!(videos[1].view_count, ViewCount::unknown());
        assert_eq!(videos[2].view_count, ViewCount::known(0));
    }

    #[tokio::test]
    async fn test_stats_failure_degrades_to_unknown_counts() {
        let mut provider = FakeProvider::default()
            .with_page("", page("a", 2, "UC1", None))
            .with_views("a0", 5000);
        provider.fail_stats = true;
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        assert_eq!(groups.video_count(), 2);
        assert!(groups.iter().flat_map(|g| &g.videos).all(|v| !v.view_count.is_known()));
    }

    #[tokio::test]
    async fn test_non_video_results_skipped_and_no_stats_call_for_empty_page() {
        let mut channel_hit = SearchItem::video("x", "A channel", "UC9", "Nine");
        channel_hit.kind = "youtube#channel".to_string();
        let provider = FakeProvider::default().with_page(
            "",
            SearchPage {
                items: vec![channel_hit],
                next_page_token: None,
            },
        );
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        assert!(groups.is_empty());
        assert_eq!(aggregator.provider().stats_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_video_across_pages_kept_once() {
        let provider = FakeProvider::default()
            .with_page("", page("a", 2, "UC1", Some("p2")))
            .with_page("p2", page("a", 3, "UC1", None));
        let aggregator = SearchAggregator::new(provider, SearchConfig::new("founder", 24));

        let groups = aggregator.aggregate_at(fixed_now()).await.unwrap();

        let ids: Vec<_> = groups.into_candidates().into_iter().map(|c| c.video_id).collect();
        assert_eq!(ids, vec!["a0", "a1", "a2"]);
    }

    #[test]
    fn test_search_config_clamps() {
        let config = SearchConfig::new("q", 24).with_page_size(500).with_max_pages(0);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_pages, 1);
        assert_eq!(config.failure_policy, FailurePolicy::AbortRun);
    }
}
