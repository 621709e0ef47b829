//! Watcher crate for the impersonation video watch.
//!
//! This crate contains the orchestrator that runs one watch pass end to end,
//! plus the digest it produces and the mailer that delivers it.

pub mod digest;
pub mod mailer;
pub mod orchestrator;

pub use digest::{DIGEST_SUBJECT, Digest, DigestBuilder, DigestEntry};
pub use mailer::{
    DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, MailError, MailSender, SmtpMailer, SmtpSettings, parse_recipients,
};
pub use orchestrator::{
    FilteredSearch, RunOptions, RunOutcome, RunReport, SkipReason, WatchOrchestrator, search_and_filter,
};
