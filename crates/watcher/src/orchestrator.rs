//! # Watch Orchestrator
//!
//! Runs one watch pass:
//! 1. Aggregate recent videos for the query, grouped by channel
//! 2. Apply the rule filter
//! 3. Classify survivors and build the digest
//! 4. Mail the report, unless it is empty or this is a dry run
//!
//! Each stage carries its own failure policy. A search failure under the
//! default policy aborts the run (nothing is classified or sent). A failed
//! classification call rejects only that video, unless the classifier is set
//! to abort, in which case the run ends with nothing sent.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info};

use classifier::CompletionProvider;
use pipeline::FilterPipeline;
use search::{SearchAggregator, SearchProvider};
use video_model::{ChannelGroups, FilterConfig};

use crate::digest::{DIGEST_SUBJECT, Digest, DigestBuilder};
use crate::mailer::MailSender;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build the digest but never send it
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyDigest,
    DryRun,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Sent,
    Skipped(SkipReason),
    /// The search stage failed; the run produced nothing
    SearchFailed(String),
    /// A classification call failed under an aborting policy; nothing was sent
    ClassificationFailed(String),
}

/// Search results after the rule filter.
#[derive(Debug, Clone, Default)]
pub struct FilteredSearch {
    pub channels_found: usize,
    pub candidates_found: usize,
    pub kept: ChannelGroups,
}

/// Summary of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub channels_found: usize,
    pub candidates_found: usize,
    pub candidates_kept: usize,
    pub digest: Digest,
    pub outcome: RunOutcome,
}

impl RunReport {
    fn search_failed(reason: String) -> Self {
        Self {
            channels_found: 0,
            candidates_found: 0,
            candidates_kept: 0,
            digest: Digest::default(),
            outcome: RunOutcome::SearchFailed(reason),
        }
    }

    fn classification_failed(filtered: &FilteredSearch, reason: String) -> Self {
        Self {
            channels_found: filtered.channels_found,
            candidates_found: filtered.candidates_found,
            candidates_kept: filtered.kept.video_count(),
            digest: Digest::default(),
            outcome: RunOutcome::ClassificationFailed(reason),
        }
    }
}

/// Aggregate search results and apply the rule filter, without classifying.
pub async fn search_and_filter<S: SearchProvider>(
    aggregator: &SearchAggregator<S>,
    filter_pipeline: &FilterPipeline,
    filter_config: &FilterConfig,
) -> search::Result<FilteredSearch> {
    let mut groups = aggregator.aggregate().await?;
    let channels_found = groups.len();
    let candidates_found = groups.video_count();
    info!(
        "Found {} videos across {} channels",
        candidates_found, channels_found
    );

    filter_pipeline.apply_to_groups(&mut groups, filter_config);
    info!(
        "Applied filters, {} videos from {} channels remaining",
        groups.video_count(),
        groups.len()
    );

    Ok(FilteredSearch {
        channels_found,
        candidates_found,
        kept: groups,
    })
}

/// Coordinates search, filtering, classification and delivery.
pub struct WatchOrchestrator<S, C, M> {
    aggregator: SearchAggregator<S>,
    filter_pipeline: FilterPipeline,
    filter_config: FilterConfig,
    digest_builder: DigestBuilder<C>,
    mailer: Option<M>,
}

impl<S, C, M> WatchOrchestrator<S, C, M>
where
    S: SearchProvider,
    C: CompletionProvider,
    M: MailSender,
{
    /// Orchestrator using the standard rule filter and no mailer.
    ///
    /// Without a mailer only dry runs (or runs with nothing to send) succeed.
    pub fn new(
        aggregator: SearchAggregator<S>,
        filter_config: FilterConfig,
        digest_builder: DigestBuilder<C>,
    ) -> Self {
        Self {
            aggregator,
            filter_pipeline: FilterPipeline::standard(),
            filter_config,
            digest_builder,
            mailer: None,
        }
    }

    pub fn with_mailer(mut self, mailer: M) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_filter_pipeline(mut self, filter_pipeline: FilterPipeline) -> Self {
        self.filter_pipeline = filter_pipeline;
        self
    }

    pub fn aggregator(&self) -> &SearchAggregator<S> {
        &self.aggregator
    }

    pub fn digest_builder(&self) -> &DigestBuilder<C> {
        &self.digest_builder
    }

    pub fn mailer(&self) -> Option<&M> {
        self.mailer.as_ref()
    }

    pub fn filter_config(&self) -> &FilterConfig {
        &self.filter_config
    }

    /// Aggregate and filter, without classifying.
    pub async fn search_and_filter(&self) -> search::Result<FilteredSearch> {
        search_and_filter(&self.aggregator, &self.filter_pipeline, &self.filter_config).await
    }

    /// Run the full pass.
    ///
    /// Returns `Err` only when a non-empty digest could not be delivered.
    pub async fn run(&self, options: &RunOptions) -> Result<RunReport> {
        let start_time = Instant::now();

        let filtered = match self.search_and_filter().await {
            Ok(filtered) => filtered,
            Err(e) => {
                error!("Search failed, aborting run: {}", e);
                return Ok(RunReport::search_failed(e.to_string()));
            }
        };

        let digest = match self.digest_builder.build(&filtered.kept).await {
            Ok(digest) => digest,
            Err(e) => {
                error!("Classification failed, aborting run: {}", e);
                return Ok(RunReport::classification_failed(&filtered, e.to_string()));
            }
        };

        let outcome = if digest.is_empty() {
            info!("No accepted videos, nothing to send");
            RunOutcome::Skipped(SkipReason::EmptyDigest)
        } else if options.dry_run {
            info!("Dry run, not sending {} accepted videos", digest.accepted.len());
            RunOutcome::Skipped(SkipReason::DryRun)
        } else {
            let mailer = self
                .mailer
                .as_ref()
                .context("No mailer configured for a live run")?;
            mailer
                .send(DIGEST_SUBJECT, &digest.render_report())
                .await
                .context("Failed to deliver digest")?;
            info!("Sent digest with {} accepted videos", digest.accepted.len());
            RunOutcome::Sent
        };

        info!("Watch run finished in {:.2?}", start_time.elapsed());

        Ok(RunReport {
            channels_found: filtered.channels_found,
            candidates_found: filtered.candidates_found,
            candidates_kept: filtered.kept.video_count(),
            digest,
            outcome,
        })
    }
}
