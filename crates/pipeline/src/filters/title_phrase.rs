//! Filter to drop videos whose titles contain blocked phrases.

use crate::traits::Filter;
use video_model::{FilterConfig, VideoCandidate};

/// Removes candidates whose title contains any deny phrase.
///
/// Matching is a case-insensitive substring check, not whole-word:
/// "samarth" also blocks "swamisamarth". Allow-listed channels pass.
pub struct TitlePhraseFilter;

impl Filter for TitlePhraseFilter {
    fn name(&self) -> &str {
        "TitlePhraseFilter"
    }

    fn admits(&self, candidate: &VideoCandidate, config: &FilterConfig) -> bool {
        if config.is_allow_listed(&candidate.channel_id) {
            return true;
        }
        let title = candidate.title.to_lowercase();
        !config
            .deny_title_phrases
            .iter()
            .any(|phrase| title.contains(phrase.as_str()))
    }
}
