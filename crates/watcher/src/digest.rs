//! # Digest
//!
//! Classifies every surviving candidate and renders the accepted ones into
//! the plain-text report that gets mailed.

use classifier::{CompletionError, CompletionProvider, RelevanceClassifier};
use tracing::{debug, info};
use video_model::{ChannelGroup, ChannelGroups, ChannelId, RejectReason, VideoCandidate, Verdict};

/// Subject line of the digest mail
pub const DIGEST_SUBJECT: &str = "AI Fake Video Check: Check if any of these videos are AI fakes";

const ENTRY_SEPARATOR: &str = "-----------";

/// A classified video together with the channel it was grouped under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub channel_title: String,
    pub channel_id: ChannelId,
    pub candidate: VideoCandidate,
    pub verdict: Verdict,
}

impl DigestEntry {
    fn new(group: &ChannelGroup, video: &VideoCandidate, verdict: Verdict) -> Self {
        Self {
            channel_title: group.channel_title.clone(),
            channel_id: group.channel_id.clone(),
            candidate: video.clone(),
            verdict,
        }
    }

    /// The rejection reason, `None` for accepted entries
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match &self.verdict {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => Some(reason),
        }
    }

    fn render(&self) -> String {
        format!(
            "Channel name: {}\nChannel ID: {}\nVideo title: {}\nVideo URL: {}\nView Count: {}\n{}\n",
            self.channel_title,
            self.channel_id,
            self.candidate.title,
            self.candidate.url,
            self.candidate.view_count,
            ENTRY_SEPARATOR
        )
    }
}

/// Classified candidates, split by verdict, in classification order.
///
/// Rejected entries are kept for auditing; only accepted ones are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    pub accepted: Vec<DigestEntry>,
    pub rejected: Vec<DigestEntry>,
}

impl Digest {
    pub fn from_entries(entries: impl IntoIterator<Item = DigestEntry>) -> Self {
        let (accepted, rejected) = entries
            .into_iter()
            .partition(|entry| entry.verdict.is_accepted());
        Self { accepted, rejected }
    }

    /// True when nothing was accepted, i.e. there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Render the accepted entries as the mail body.
    ///
    /// Empty when nothing was accepted.
    pub fn render_report(&self) -> String {
        self.accepted.iter().map(DigestEntry::render).collect()
    }
}

/// Builds a [`Digest`] by classifying grouped candidates.
pub struct DigestBuilder<P> {
    classifier: RelevanceClassifier<P>,
}

impl<P: CompletionProvider> DigestBuilder<P> {
    pub fn new(classifier: RelevanceClassifier<P>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &RelevanceClassifier<P> {
        &self.classifier
    }

    /// Classify every video, channel by channel in grouping order.
    ///
    /// Fails only when the classifier aborts on a failed call.
    pub async fn build(&self, groups: &ChannelGroups) -> Result<Digest, CompletionError> {
        let pending: Vec<(&ChannelGroup, &VideoCandidate)> = groups
            .iter()
            .flat_map(|group| group.videos.iter().map(move |video| (group, video)))
            .collect();
        let titles: Vec<&str> = pending.iter().map(|(_, video)| video.title.as_str()).collect();

        let verdicts = self.classifier.classify_all(&titles).await?;

        let digest = Digest::from_entries(
            pending
                .into_iter()
                .zip(verdicts)
                .map(|((group, video), verdict)| DigestEntry::new(group, video, verdict)),
        );

        for entry in &digest.rejected {
            debug!(
                channel = %entry.channel_title,
                video = %entry.candidate.video_id,
                reason = ?entry.reject_reason(),
                "Rejected: {}",
                entry.candidate.title
            );
        }
        info!(
            "Classified {} videos: {} accepted, {} rejected",
            titles.len(),
            digest.accepted.len(),
            digest.rejected.len()
        );
        Ok(digest)
    }
}
