//! Pure conversions from native API shapes into unified records.
//!
//! Total functions with no failure path: serde already enforced the wire
//! shape, so the calling fetcher has nothing malformed left to hand us.

use daylog_core::{CommitRecord, SourceService, WorkItem};

use crate::devops::{DevopsCommit, WorkItemDetail};
use crate::github::GithubCommit;

/// First line of a full commit message, trailing whitespace removed.
fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim_end().to_string()
}

pub(crate) fn github_commit(native: GithubCommit) -> CommitRecord {
    CommitRecord {
        id: native.sha,
        message: first_line(&native.commit.message),
        author_date: native.commit.author.date,
        source: SourceService::Github,
        url: native.html_url,
        project: None,
        repo: None,
    }
}

/// DevOps commits carry no hosted URL in the payload; it is synthesized
/// from the repository coordinates.
pub(crate) fn devops_commit(
    api_base: &str,
    organization: &str,
    project: &str,
    repo: &str,
    native: DevopsCommit,
) -> CommitRecord {
    let url = format!(
        "{api_base}/{organization}/{project}/_git/{repo}/commit/{}",
        native.commit_id
    );
    CommitRecord {
        id: native.commit_id,
        message: first_line(&native.comment),
        author_date: native.author.date,
        source: SourceService::Devops,
        url,
        project: Some(project.to_string()),
        repo: Some(repo.to_string()),
    }
}

/// `project` is the enumerated project the item was queried through; the
/// item's own `System.TeamProject` field wins for display when present.
pub(crate) fn devops_work_item(
    api_base: &str,
    organization: &str,
    project: &str,
    native: WorkItemDetail,
) -> WorkItem {
    let url = format!(
        "{api_base}/{organization}/{project}/_workitems/edit/{}",
        native.id
    );
    WorkItem {
        id: native.id,
        title: native.fields.title,
        state: native.fields.state,
        item_type: native.fields.work_item_type,
        project: native
            .fields
            .team_project
            .unwrap_or_else(|| project.to_string()),
        url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devops::{DevopsCommitAuthor, WorkItemFields};
    use crate::github::{GithubCommitAuthor, GithubCommitDetail};
    use chrono::{TimeZone, Utc};

    #[test]
    fn github_commit_keeps_first_message_line() {
        let native = GithubCommit {
            sha: "abc".to_string(),
            html_url: "https://github.com/acme/web/commit/abc".to_string(),
            commit: GithubCommitDetail {
                message: "Fix checkout  \n\nLong explanation".to_string(),
                author: GithubCommitAuthor {
                    date: Utc.with_ymd_and_hms(2026, 3, 5, 9, 30, 0).unwrap(),
                },
            },
        };
        let record = github_commit(native);
        assert_eq!(record.message, "Fix checkout");
        assert_eq!(record.source, SourceService::Github);
        assert!(record.project.is_none());
    }

    #[test]
    fn devops_commit_synthesizes_hosted_url() {
        let native = DevopsCommit {
            commit_id: "deadbeef".to_string(),
            comment: "Add cart".to_string(),
            author: DevopsCommitAuthor {
                date: Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap(),
            },
        };
        let record = devops_commit("https://dev.azure.com", "acme-org", "Web", "shop", native);
        assert_eq!(
            record.url,
            "https://dev.azure.com/acme-org/Web/_git/shop/commit/deadbeef"
        );
        assert_eq!(record.project.as_deref(), Some("Web"));
        assert_eq!(record.repo.as_deref(), Some("shop"));
    }

    #[test]
    fn work_item_falls_back_to_enumerated_project() {
        let native = WorkItemDetail {
            id: 42,
            fields: WorkItemFields {
                title: "Fix login".to_string(),
                state: "Active".to_string(),
                work_item_type: "Bug".to_string(),
                team_project: None,
            },
        };
        let item = devops_work_item("https://dev.azure.com", "acme-org", "Web", native);
        assert_eq!(item.project, "Web");
        assert_eq!(
            item.url,
            "https://dev.azure.com/acme-org/Web/_workitems/edit/42"
        );
    }

    #[test]
    fn empty_message_normalizes_to_empty_first_line() {
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("\nbody"), "");
    }
}
