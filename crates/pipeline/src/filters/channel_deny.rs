//! Filter to drop videos from denied channels.
//!
//! Channels can be denied by stable ID or by display title. Allow-listed
//! channels are never dropped here.

use crate::traits::Filter;
use video_model::{FilterConfig, VideoCandidate};

/// Removes candidates whose channel is on a deny list.
///
/// ## Algorithm
/// 1. Allow-listed channel IDs pass unconditionally
/// 2. Drop if the channel ID is in `deny_channel_ids`
/// 3. Drop if the lowercased channel title is in `deny_channel_names`
pub struct ChannelDenyFilter;

impl Filter for ChannelDenyFilter {
    fn name(&self) -> &str {
        "ChannelDenyFilter"
    }

    fn admits(&self, candidate: &VideoCandidate, config: &FilterConfig) -> bool {
        if config.is_allow_listed(&candidate.channel_id) {
            return true;
        }
        !(config.deny_channel_ids.contains(&candidate.channel_id)
            || config
                .deny_channel_names
                .contains(&candidate.channel_title.to_lowercase()))
    }
}
