//! Unified record shapes that every remote service is normalized into.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The service a record originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceService {
    Github,
    Devops,
}

impl fmt::Display for SourceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Github => write!(f, "github"),
            Self::Devops => write!(f, "devops"),
        }
    }
}

/// One commit, normalized across services.
///
/// `id` is unique within its originating service only; cross-service
/// collisions are possible and deliberately not collapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    /// First line of the full commit message.
    pub message: String,
    pub author_date: DateTime<Utc>,
    pub source: SourceService,
    pub url: String,
    /// Service-specific provenance, where the service has a project level.
    pub project: Option<String>,
    pub repo: Option<String>,
}

/// One work item from the work-tracking service.
///
/// Ids come from a single namespace, so `id` is globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub title: String,
    pub state: String,
    pub item_type: String,
    pub project: String,
    pub url: String,
}

/// Result of a commit query: the merged records plus the sub-resources that
/// were silently skipped along the way (one human-readable reason each).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitReport {
    pub commits: Vec<CommitRecord>,
    pub skipped: Vec<String>,
}

/// Result of a work-item query, with the same skipped-sub-resource channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkItemReport {
    pub items: Vec<WorkItem>,
    pub skipped: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_service_displays_lowercase() {
        assert_eq!(SourceService::Github.to_string(), "github");
        assert_eq!(SourceService::Devops.to_string(), "devops");
    }

    #[test]
    fn source_service_serializes_lowercase() {
        let json = serde_json::to_string(&SourceService::Devops).unwrap();
        assert_eq!(json, "\"devops\"");
    }
}
