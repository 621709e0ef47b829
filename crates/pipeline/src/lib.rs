//! Rule-based filtering of candidate videos.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Rules
//! A candidate is kept when its channel is allow-listed or not denied (by ID
//! or by display title), its title contains no deny phrase (unless
//! allow-listed), and its view count meets the minimum. The view-count check
//! applies to allow-listed channels too.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//!
//! let pipeline = FilterPipeline::standard();
//! pipeline.apply_to_groups(&mut groups, &filter_config);
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::{Decision, FilterPipeline};
