use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::time::Instant;

use classifier::{AzureChatClient, PromptTemplate, RelevanceClassifier};
use pipeline::FilterPipeline;
use search::{SearchAggregator, SearchConfig, YouTubeClient};
use video_model::Verdict;
use watcher::{
    Digest, DigestBuilder, RunOptions, RunOutcome, RunReport, SkipReason, SmtpMailer, WatchOrchestrator,
    search_and_filter,
};

mod config;

use config::{AppConfig, ConfigArgs};

/// video-watch - find recent videos that may impersonate a public figure
#[derive(Parser)]
#[command(name = "video-watch")]
#[command(about = "Watch for recent videos about a person and mail a digest for review", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter, classify and mail the digest
    Run {
        /// Build the digest and print it instead of sending mail
        #[arg(long)]
        dry_run: bool,

        /// Also print rejected videos (dry run only)
        #[arg(long, requires = "dry_run")]
        show_rejected: bool,
    },

    /// Search and filter only, printing the surviving candidates
    Search,

    /// Classify a single title
    Classify {
        #[arg(long)]
        title: String,
    },

    /// Print the effective filter configuration as JSON
    Filters,
}

type Orchestrator = WatchOrchestrator<YouTubeClient, AzureChatClient, SmtpMailer>;

#[tokio::main]
async fn main() -> Result<()> {
    // Values in .env become env fallbacks for the flags below
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config).context("Invalid configuration")?;

    match cli.command {
        Commands::Run {
            dry_run,
            show_rejected,
        } => handle_run(&config, dry_run, show_rejected).await?,
        Commands::Search => handle_search(&config).await?,
        Commands::Classify { title } => handle_classify(&config, &title).await?,
        Commands::Filters => handle_filters(&config)?,
    }

    Ok(())
}

fn build_aggregator(config: &AppConfig) -> Result<SearchAggregator<YouTubeClient>> {
    let settings = config.search()?;
    let client = YouTubeClient::new(settings.api_key).context("Failed to create search client")?;
    let search_config = SearchConfig::new(settings.query, settings.window_hours).with_max_pages(settings.max_pages);
    Ok(SearchAggregator::new(client, search_config))
}

fn build_classifier(config: &AppConfig) -> Result<RelevanceClassifier<AzureChatClient>> {
    let settings = config.classifier()?;
    let client = AzureChatClient::new(settings.endpoint, settings.api_key)
        .context("Failed to create completion client")?;
    Ok(RelevanceClassifier::new(client, PromptTemplate::new(settings.topic, settings.organization))
        .with_concurrency(settings.concurrency))
}

/// Assemble the orchestrator. Every setting is checked before any request is made.
fn build_orchestrator(config: &AppConfig, dry_run: bool) -> Result<Orchestrator> {
    let aggregator = build_aggregator(config)?;
    let classifier = build_classifier(config)?;
    let orchestrator = WatchOrchestrator::new(aggregator, config.filter().clone(), DigestBuilder::new(classifier));

    if dry_run {
        return Ok(orchestrator);
    }
    let mailer = SmtpMailer::new(&config.smtp()?).context("Invalid mail settings")?;
    Ok(orchestrator.with_mailer(mailer))
}

/// Handle the 'run' command
async fn handle_run(config: &AppConfig, dry_run: bool, show_rejected: bool) -> Result<()> {
    let orchestrator = build_orchestrator(config, dry_run)?;

    let start = Instant::now();
    let report = orchestrator.run(&RunOptions { dry_run }).await?;

    print_summary(&report);
    match &report.outcome {
        RunOutcome::Sent => println!(
            "{} Sent digest with {} videos in {:.2?}",
            "✓".green(),
            report.digest.accepted.len(),
            start.elapsed()
        ),
        RunOutcome::Skipped(SkipReason::EmptyDigest) => {
            println!("{} No videos accepted, nothing sent", "•".cyan())
        }
        RunOutcome::Skipped(SkipReason::DryRun) => {
            println!("{}", "Dry run, digest not sent:\n".bold().blue());
            print!("{}", report.digest.render_report());
            if show_rejected {
                print_rejected(&report.digest);
            }
        }
        RunOutcome::SearchFailed(reason) => {
            println!("{} Search failed, run aborted: {}", "✗".red(), reason)
        }
        RunOutcome::ClassificationFailed(reason) => {
            println!("{} Classification failed, run aborted: {}", "✗".red(), reason)
        }
    }
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(config: &AppConfig) -> Result<()> {
    let aggregator = build_aggregator(config)?;

    let filtered = search_and_filter(&aggregator, &FilterPipeline::standard(), config.filter())
        .await
        .context("Search failed")?;

    println!(
        "{}",
        format!(
            "{} of {} videos from {} channels passed the filters:",
            filtered.kept.video_count(),
            filtered.candidates_found,
            filtered.channels_found
        )
        .bold()
        .blue()
    );
    for group in filtered.kept.iter() {
        println!("{} ({})", group.channel_title.bold(), group.channel_id);
        for video in &group.videos {
            println!("  - {} [{} views] {}", video.title, video.view_count, video.url);
        }
    }
    Ok(())
}

/// Handle the 'classify' command
async fn handle_classify(config: &AppConfig, title: &str) -> Result<()> {
    let classifier = build_classifier(config)?;

    match classifier.classify(title).await {
        Verdict::Accepted => println!("{} accepted: {}", "✓".green(), title),
        Verdict::Rejected(reason) => println!("{} rejected: {} ({:?})", "✗".red(), title, reason),
    }
    Ok(())
}

/// Handle the 'filters' command
fn handle_filters(config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config.filter()).context("Failed to serialize filter config")?;
    println!("{}", json);
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "{}Channels found: {}\n{}Videos found: {}\n{}Videos after filters: {}\n{}Accepted: {}, rejected: {}",
        "• ".cyan(),
        report.channels_found,
        "• ".cyan(),
        report.candidates_found,
        "• ".cyan(),
        report.candidates_kept,
        "• ".cyan(),
        report.digest.accepted.len(),
        report.digest.rejected.len()
    );
}

fn print_rejected(digest: &Digest) {
    println!("{}", "Rejected videos:".bold().yellow());
    for entry in &digest.rejected {
        println!(
            "  - {} ({}) {} [{:?}]",
            entry.candidate.title,
            entry.channel_title,
            entry.candidate.url,
            entry.reject_reason()
        );
    }
}
