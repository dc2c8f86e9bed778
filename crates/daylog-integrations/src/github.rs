//! GitHub commits API client.
//!
//! Reports the user's commits across every repository of one organization.
//! The repository listing is foundational (a failure aborts the fetch);
//! individual repository queries are leaf calls and degrade to skipped
//! entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daylog_core::{CommitReport, GithubSettings, SourceService};
use futures::future::join_all;
use reqwest::{header, Client};
use serde::Deserialize;

use crate::aggregate::{dedupe_commits, DateWindow};
use crate::error::FetchError;
use crate::http::foundational;
use crate::normalize;
use crate::traits::CommitSource;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;

/// GitHub API client.
pub struct GithubClient {
    client: Client,
    /// Author login used to filter commits server-side.
    username: String,
    organization: String,
    /// API base URL (overridable for GitHub Enterprise).
    api_base: String,
}

/// GitHub repository listing entry.
#[derive(Debug, Deserialize)]
pub(crate) struct GithubRepo {
    pub(crate) full_name: String,
}

/// GitHub commit response.
#[derive(Debug, Deserialize)]
pub(crate) struct GithubCommit {
    pub(crate) sha: String,
    pub(crate) html_url: String,
    pub(crate) commit: GithubCommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GithubCommitDetail {
    pub(crate) message: String,
    pub(crate) author: GithubCommitAuthor,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GithubCommitAuthor {
    pub(crate) date: DateTime<Utc>,
}

impl GithubClient {
    /// Create a client from settings.
    ///
    /// # Errors
    ///
    /// `Configuration` when token, username, or organization is missing,
    /// or the token cannot be used in a header; `Transport` if the HTTP
    /// client cannot be created.
    pub fn new(settings: &GithubSettings) -> Result<Self, FetchError> {
        if !settings.is_configured() {
            return Err(FetchError::Configuration(
                "GitHub requires token, username, and organization".to_string(),
            ));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", settings.token)).map_err(
                |_| FetchError::Configuration("GitHub token is not a valid header value".to_string()),
            )?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static("daylog"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let api_base = settings
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            client,
            username: settings.username.clone(),
            organization: settings.organization.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Enumerate every repository in the organization, following
    /// offset/limit pagination until a short page.
    ///
    /// Foundational: any page failing aborts the whole commit fetch.
    async fn list_repositories(&self) -> Result<Vec<GithubRepo>, FetchError> {
        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let url = format!(
                "{}/orgs/{}/repos?per_page={PAGE_SIZE}&page={page}&type=all",
                self.api_base, self.organization
            );
            log::debug!("GET {url}");
            let response = foundational(
                self.client.get(&url).send().await?,
                SourceService::Github,
            )?;
            let batch: Vec<GithubRepo> = response.json().await?;
            let last_page = batch.len() < PAGE_SIZE;
            repos.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }
        Ok(repos)
    }

    /// Commits authored by the configured user in one repository. Leaf
    /// call: failures come back as a skip reason, never an abort.
    async fn repo_commits(
        &self,
        repo: &str,
        window: &DateWindow,
    ) -> Result<Vec<GithubCommit>, String> {
        let url = format!(
            "{}/repos/{repo}/commits?author={}&since={}&until={}&per_page={PAGE_SIZE}",
            self.api_base,
            self.username,
            window.start_param(),
            window.end_param()
        );
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| format!("repository {repo}: {err}"))?;
        if !response.status().is_success() {
            return Err(format!(
                "repository {repo}: HTTP {}",
                response.status().as_u16()
            ));
        }
        response
            .json()
            .await
            .map_err(|err| format!("repository {repo}: {err}"))
    }
}

#[async_trait]
impl CommitSource for GithubClient {
    fn service(&self) -> SourceService {
        SourceService::Github
    }

    async fn fetch_commits(&self, window: &DateWindow) -> Result<CommitReport, FetchError> {
        let repos = self.list_repositories().await?;
        log::debug!("github: fanning out over {} repositories", repos.len());

        let fetches = join_all(
            repos
                .iter()
                .map(|repo| self.repo_commits(&repo.full_name, window)),
        )
        .await;
        Ok(merge_repo_results(fetches))
    }
}

/// Merge per-repository outcomes in listing order, not completion order,
/// so first-occurrence deduplication stays deterministic. A failed
/// repository contributes a skip entry only.
fn merge_repo_results(fetches: Vec<Result<Vec<GithubCommit>, String>>) -> CommitReport {
    let mut commits = Vec::new();
    let mut skipped = Vec::new();
    for result in fetches {
        match result {
            Ok(batch) => commits.extend(batch.into_iter().map(normalize::github_commit)),
            Err(reason) => {
                log::warn!("github: skipping {reason}");
                skipped.push(reason);
            }
        }
    }
    CommitReport {
        commits: dedupe_commits(commits),
        skipped,
    }
}
