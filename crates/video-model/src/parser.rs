//! Parsing helpers for raw API fields and filter list files.
//!
//! Filter files are JSON objects with four optional string arrays:
//!
//! ```json
//! {
//!   "allow_channel_ids": ["UC..."],
//!   "deny_channel_ids": ["UC..."],
//!   "deny_channel_names": ["CNBC Television"],
//!   "deny_title_phrases": ["sai baba"]
//! }
//! ```

use crate::error::{ModelError, Result};
use crate::types::{FilterConfig, FilterLists, ViewCount};
use std::fs;
use std::path::Path;

/// Parse the string `viewCount` the statistics endpoint returns.
///
/// A missing or malformed value becomes `ViewCount::unknown()` so one bad
/// field never aborts a run.
pub fn parse_view_count(raw: Option<&str>) -> ViewCount {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .map(ViewCount::known)
        .unwrap_or_else(ViewCount::unknown)
}

/// Load allow/deny lists from a JSON filter file.
pub fn load_filter_lists(path: &Path) -> Result<FilterLists> {
    if !path.exists() {
        return Err(ModelError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ModelError::ParseError {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Reject settings that would make the filter meaningless.
///
/// An empty deny phrase is a substring of every title and would drop
/// everything not allow-listed.
pub fn validate_filter_config(config: &FilterConfig) -> Result<()> {
    if config.time_window_hours == 0 {
        return Err(ModelError::InvalidValue {
            field: "time_window_hours".to_string(),
            value: "0".to_string(),
        });
    }
    if config.deny_title_phrases.iter().any(|p| p.trim().is_empty()) {
        return Err(ModelError::ValidationError(
            "deny_title_phrases must not contain blank entries".to_string(),
        ));
    }
    if config.deny_channel_names.iter().any(|n| n.trim().is_empty()) {
        return Err(ModelError::ValidationError(
            "deny_channel_names must not contain blank entries".to_string(),
        ));
    }
    Ok(())
}
