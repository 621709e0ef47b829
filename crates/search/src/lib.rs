//! # Search Crate
//!
//! Collects recently published videos matching a query from the video
//! platform and groups them by channel.
//!
//! ## Components
//!
//! ### SearchProvider
//! The seam to the platform: one paginated search call and one batched
//! statistics call. [`YouTubeClient`] implements it over the YouTube Data API.
//!
//! ### SearchAggregator
//! Pages through results until the continuation token runs out (or the page
//! cap is hit), attaches view counts and builds [`video_model::ChannelGroups`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use search::{SearchAggregator, SearchConfig, YouTubeClient};
//!
//! let client = YouTubeClient::new(api_key)?;
//! let aggregator = SearchAggregator::new(client, SearchConfig::new("query", 24));
//! let groups = aggregator.aggregate().await?;
//! ```

// Public modules
pub mod aggregator;
pub mod error;
pub mod provider;
pub mod youtube;

// Re-export commonly used types
pub use aggregator::{published_after, SearchAggregator, SearchConfig, DEFAULT_MAX_PAGES, MAX_PAGE_SIZE};
pub use error::{Result, SearchError};
pub use provider::{SearchItem, SearchPage, SearchProvider, SearchRequest, VIDEO_KIND};
pub use youtube::YouTubeClient;
