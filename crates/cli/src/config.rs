//! Command-line and environment configuration.
//!
//! Every setting can come from a flag or its environment variable (a `.env`
//! file is loaded first). Settings are checked per subcommand, so `filters`
//! needs no credentials and a dry run needs no mail account.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use video_model::{
    load_filter_lists, validate_filter_config, FilterConfig, FilterLists, DEFAULT_MIN_VIEW_COUNT,
    DEFAULT_TIME_WINDOW_HOURS,
};
use watcher::{SmtpSettings, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Name of the person to watch for
    #[arg(long, env = "YT_QUERY", global = true)]
    pub query: Option<String>,

    /// Organization the person founded, used in the classification prompt
    #[arg(long, env = "ORG_QUERY", global = true)]
    pub organization: Option<String>,

    #[arg(long, env = "YOUTUBE_API_KEY", global = true, hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// Minimum view count for a video to be considered
    #[arg(long, env = "YT_MIN_VIEW_COUNT", default_value_t = DEFAULT_MIN_VIEW_COUNT, global = true)]
    pub min_view_count: u64,

    /// Only videos published within this many hours are searched
    #[arg(long, env = "YT_WINDOW_HOURS", default_value_t = DEFAULT_TIME_WINDOW_HOURS, global = true)]
    pub window_hours: u32,

    /// Stop paginating after this many result pages
    #[arg(long, env = "YT_MAX_PAGES", default_value_t = search::DEFAULT_MAX_PAGES, global = true)]
    pub max_pages: u32,

    /// Full chat-completions deployment URL
    #[arg(long, env = "AZURE_URL", global = true)]
    pub azure_url: Option<String>,

    #[arg(long, env = "AZURE_KEY", global = true, hide_env_values = true)]
    pub azure_key: Option<String>,

    /// Comma-separated recipient addresses
    #[arg(long, env = "EMAIL_RECEIVER", global = true)]
    pub email_receiver: Option<String>,

    #[arg(long, env = "EMAIL_SENDER", global = true)]
    pub email_sender: Option<String>,

    #[arg(long, env = "EMAIL_PASSWORD", global = true, hide_env_values = true)]
    pub email_password: Option<String>,

    #[arg(long, env = "SMTP_HOST", default_value = DEFAULT_SMTP_HOST, global = true)]
    pub smtp_host: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT, global = true)]
    pub smtp_port: u16,

    /// JSON file with allow/deny lists (built-in lists when omitted)
    #[arg(long, env = "VIDEO_WATCH_FILTERS", global = true)]
    pub filters: Option<PathBuf>,

    /// Classification requests allowed in flight at once
    #[arg(long, env = "CLASSIFY_CONCURRENCY", default_value_t = 1, global = true)]
    pub concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub query: String,
    pub api_key: String,
    pub window_hours: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub topic: String,
    pub organization: String,
    pub endpoint: String,
    pub api_key: String,
    pub concurrency: usize,
}

/// Validated configuration for one invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    args: ConfigArgs,
    filter: FilterConfig,
}

fn required(value: &Option<String>, flag: &str, env: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => bail!("Missing required setting --{} (or {})", flag, env),
    }
}

impl AppConfig {
    /// Resolve the filter lists and validate thresholds.
    pub fn load(args: ConfigArgs) -> Result<Self> {
        let lists = match &args.filters {
            Some(path) => load_filter_lists(path)
                .with_context(|| format!("Failed to load filter file {}", path.display()))?,
            None => FilterLists::builtin(),
        };
        let filter = FilterConfig::from_lists(lists, args.min_view_count, args.window_hours);
        validate_filter_config(&filter).context("Invalid filter configuration")?;

        if args.concurrency == 0 {
            bail!("--concurrency must be at least 1");
        }

        Ok(Self { args, filter })
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn search(&self) -> Result<SearchSettings> {
        Ok(SearchSettings {
            query: required(&self.args.query, "query", "YT_QUERY")?,
            api_key: required(&self.args.youtube_api_key, "youtube-api-key", "YOUTUBE_API_KEY")?,
            window_hours: self.args.window_hours,
            max_pages: self.args.max_pages,
        })
    }

    pub fn classifier(&self) -> Result<ClassifierSettings> {
        Ok(ClassifierSettings {
            topic: required(&self.args.query, "query", "YT_QUERY")?,
            organization: required(&self.args.organization, "organization", "ORG_QUERY")?,
            endpoint: required(&self.args.azure_url, "azure-url", "AZURE_URL")?,
            api_key: required(&self.args.azure_key, "azure-key", "AZURE_KEY")?,
            concurrency: self.args.concurrency,
        })
    }

    pub fn smtp(&self) -> Result<SmtpSettings> {
        let settings = SmtpSettings::new(
            required(&self.args.email_sender, "email-sender", "EMAIL_SENDER")?,
            required(&self.args.email_password, "email-password", "EMAIL_PASSWORD")?,
            required(&self.args.email_receiver, "email-receiver", "EMAIL_RECEIVER")?,
        );
        Ok(settings.with_server(self.args.smtp_host.clone(), self.args.smtp_port))
    }
}
