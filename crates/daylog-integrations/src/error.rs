//! Fetch error taxonomy.
//!
//! Only foundational calls (repository/project enumeration) produce these;
//! leaf calls degrade to skipped entries in the report instead. The
//! `Display` string is the single message surfaced to the consumer.

use daylog_core::SourceService;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// A required credential field is missing, or an input is malformed.
    #[error("{0}")]
    Configuration(String),

    /// The remote rejected the credential on a foundational call (401/403).
    #[error("{service}: invalid token or insufficient permissions")]
    Auth { service: SourceService },

    /// The configured organization or account does not exist (404).
    #[error("{service}: organization not found")]
    NotFound { service: SourceService },

    /// Any other non-2xx status from a foundational call.
    #[error("{service}: API error (HTTP {status})")]
    Service { service: SourceService, status: u16 },

    /// A commit query was issued with zero enabled services.
    #[error("no commit source configured; set GitHub or DevOps credentials first")]
    NoSourceConfigured,

    /// Transport or decoding failure on a foundational call.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
