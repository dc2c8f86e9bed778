//! Azure DevOps API client.
//!
//! Two query surfaces against one organization: commits across every
//! project and repository (a three-level fan-out), and the open work items
//! assigned to the token's identity. Enumeration of projects is
//! foundational; everything below it is a leaf call that degrades to a
//! skipped entry.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daylog_core::{CommitRecord, CommitReport, DevopsSettings, SourceService, WorkItem, WorkItemReport};
use futures::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::aggregate::{dedupe_commits, DateWindow};
use crate::error::FetchError;
use crate::http::foundational;
use crate::normalize;
use crate::traits::CommitSource;

const DEFAULT_API_BASE: &str = "https://dev.azure.com";
const API_VERSION: &str = "7.0";
/// The detail endpoint takes a bounded id list.
const DETAIL_BATCH_SIZE: usize = 200;

/// Open work items assigned to the token's identity, newest change first.
const WORK_ITEM_QUERY: &str = "SELECT [System.Id], [System.Title], [System.State], \
    [System.WorkItemType], [System.TeamProject] FROM WorkItems \
    WHERE [System.AssignedTo] = @Me \
    AND [System.State] <> 'Closed' AND [System.State] <> 'Done' \
    AND [System.State] <> 'Removed' ORDER BY [System.ChangedDate] DESC";

const WORK_ITEM_FIELDS: &str =
    "System.Id,System.Title,System.State,System.WorkItemType,System.TeamProject";

/// Azure DevOps API client.
pub struct DevopsClient {
    client: Client,
    token: String,
    organization: String,
    /// API base URL (overridable for Azure DevOps Server).
    api_base: String,
}

/// Azure-style `{ "value": [...] }` collection wrapper.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ValueList<T> {
    #[serde(default)]
    pub(crate) value: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevopsProject {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevopsRepo {
    pub(crate) id: String,
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevopsCommit {
    #[serde(rename = "commitId")]
    pub(crate) commit_id: String,
    pub(crate) comment: String,
    pub(crate) author: DevopsCommitAuthor,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevopsCommitAuthor {
    pub(crate) date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WiqlResponse {
    #[serde(rename = "workItems", default)]
    pub(crate) work_items: Vec<WiqlRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WiqlRef {
    pub(crate) id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemDetail {
    pub(crate) id: u64,
    pub(crate) fields: WorkItemFields,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemFields {
    #[serde(rename = "System.Title")]
    pub(crate) title: String,
    #[serde(rename = "System.State")]
    pub(crate) state: String,
    #[serde(rename = "System.WorkItemType")]
    pub(crate) work_item_type: String,
    #[serde(rename = "System.TeamProject", default)]
    pub(crate) team_project: Option<String>,
}

impl DevopsClient {
    /// Create a client from settings.
    ///
    /// # Errors
    ///
    /// `Configuration` when token or organization is missing; `Transport`
    /// if the HTTP client cannot be created.
    pub fn new(settings: &DevopsSettings) -> Result<Self, FetchError> {
        if !settings.is_configured() {
            return Err(FetchError::Configuration(
                "DevOps requires token and organization".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let api_base = settings
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            client,
            token: settings.token.clone(),
            organization: settings.organization.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Basic auth with an empty username and the token as password.
    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).basic_auth("", Some(&self.token))
    }

    /// Enumerate every project in the organization. Foundational.
    async fn list_projects(&self) -> Result<Vec<DevopsProject>, FetchError> {
        let url = format!(
            "{}/{}/_apis/projects?api-version={API_VERSION}",
            self.api_base, self.organization
        );
        log::debug!("GET {url}");
        let response = foundational(self.get(&url).send().await?, SourceService::Devops)?;
        let projects: ValueList<DevopsProject> = response.json().await?;
        Ok(projects.value)
    }

    /// GET a `{ "value": [...] }` collection; leaf-call errors come back
    /// as a plain reason string.
    async fn fetch_value_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, String> {
        log::debug!("GET {url}");
        let response = self.get(url).send().await.map_err(|err| err.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }
        let list: ValueList<T> = response.json().await.map_err(|err| err.to_string())?;
        Ok(list.value)
    }

    /// Commits from every repository of one project. A failing repository
    /// listing skips the whole project; a failing commit call skips that
    /// repository only.
    async fn project_commits(
        &self,
        project: &str,
        window: &DateWindow,
    ) -> (Vec<CommitRecord>, Vec<String>) {
        let url = format!(
            "{}/{}/{project}/_apis/git/repositories?api-version={API_VERSION}",
            self.api_base, self.organization
        );
        let repos = match self.fetch_value_list::<DevopsRepo>(&url).await {
            Ok(repos) => repos,
            Err(reason) => {
                return (Vec::new(), vec![format!("project {project}: {reason}")]);
            }
        };

        let mut commits = Vec::new();
        let mut skipped = Vec::new();
        for repo in repos {
            let url = format!(
                "{}/{}/{project}/_apis/git/repositories/{}/commits\
                 ?searchCriteria.fromDate={}&searchCriteria.toDate={}&api-version={API_VERSION}",
                self.api_base,
                self.organization,
                repo.id,
                window.start_param(),
                window.end_param()
            );
            match self.fetch_value_list::<DevopsCommit>(&url).await {
                Ok(batch) => commits.extend(batch.into_iter().map(|commit| {
                    normalize::devops_commit(
                        &self.api_base,
                        &self.organization,
                        project,
                        &repo.name,
                        commit,
                    )
                })),
                Err(reason) => skipped.push(format!("repository {project}/{}: {reason}", repo.name)),
            }
        }
        (commits, skipped)
    }

    /// Run the assigned-items query for one project and resolve details in
    /// fixed-size batches. Leaf calls throughout: a failing query skips the
    /// project, a failing detail batch loses those ids only.
    async fn project_work_items(&self, project: &str) -> (Vec<WorkItem>, Vec<String>) {
        let ids = match self.query_work_item_ids(project).await {
            Ok(ids) => ids,
            Err(reason) => {
                return (Vec::new(), vec![format!("project {project}: {reason}")]);
            }
        };
        if ids.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut items = Vec::new();
        let mut skipped = Vec::new();
        for batch in ids.chunks(DETAIL_BATCH_SIZE) {
            let joined = batch
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let url = format!(
                "{}/{}/_apis/wit/workitems?ids={joined}&fields={WORK_ITEM_FIELDS}\
                 &api-version={API_VERSION}",
                self.api_base, self.organization
            );
            match self.fetch_value_list::<WorkItemDetail>(&url).await {
                Ok(details) => items.extend(details.into_iter().map(|detail| {
                    normalize::devops_work_item(&self.api_base, &self.organization, project, detail)
                })),
                Err(reason) => {
                    skipped.push(format!("project {project}: detail batch: {reason}"));
                }
            }
        }
        (items, skipped)
    }

    async fn query_work_item_ids(&self, project: &str) -> Result<Vec<u64>, String> {
        let url = format!(
            "{}/{}/{project}/_apis/wit/wiql?api-version={API_VERSION}",
            self.api_base, self.organization
        );
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .basic_auth("", Some(&self.token))
            .json(&serde_json::json!({ "query": WORK_ITEM_QUERY }))
            .send()
            .await
            .map_err(|err| err.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }
        let wiql: WiqlResponse = response.json().await.map_err(|err| err.to_string())?;
        Ok(wiql.work_items.into_iter().map(|item| item.id).collect())
    }

    /// Open work items assigned to the token's identity across every
    /// project, deduplicated by id with the first occurrence winning.
    ///
    /// # Errors
    ///
    /// Fails only when the project listing fails.
    pub async fn fetch_work_items(&self) -> Result<WorkItemReport, FetchError> {
        let projects = self.list_projects().await?;
        log::debug!("devops: querying {} projects for work items", projects.len());

        let results = join_all(
            projects
                .iter()
                .map(|project| self.project_work_items(&project.name)),
        )
        .await;

        let mut report = WorkItemReport::default();
        let mut seen = HashSet::new();
        for (items, skipped) in results {
            report
                .items
                .extend(items.into_iter().filter(|item| seen.insert(item.id)));
            for reason in &skipped {
                log::warn!("devops: skipping {reason}");
            }
            report.skipped.extend(skipped);
        }
        Ok(report)
    }
}

#[async_trait]
impl CommitSource for DevopsClient {
    fn service(&self) -> SourceService {
        SourceService::Devops
    }

    async fn fetch_commits(&self, window: &DateWindow) -> Result<CommitReport, FetchError> {
        let projects = self.list_projects().await?;
        log::debug!("devops: fanning out over {} projects", projects.len());

        let fetches = join_all(
            projects
                .iter()
                .map(|project| self.project_commits(&project.name, window)),
        )
        .await;
        Ok(merge_project_results(fetches))
    }
}

/// Merge per-project outcomes in project order so deduplication is
/// deterministic. Skipped repositories and projects carry through as
/// skip entries.
fn merge_project_results(fetches: Vec<(Vec<CommitRecord>, Vec<String>)>) -> CommitReport {
    let mut commits = Vec::new();
    let mut skipped = Vec::new();
    for (batch, missed) in fetches {
        commits.extend(batch);
        for reason in &missed {
            log::warn!("devops: skipping {reason}");
        }
        skipped.extend(missed);
    }
    CommitReport {
        commits: dedupe_commits(commits),
        skipped,
    }
}
