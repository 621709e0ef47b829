//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod channel_deny;
pub mod minimum_views;
pub mod title_phrase;

// Re-export for convenience
pub use channel_deny::ChannelDenyFilter;
pub use minimum_views::MinimumViewsFilter;
pub use title_phrase::TitlePhraseFilter;
