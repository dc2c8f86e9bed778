//! Consumer-facing query surface.
//!
//! `ActivityService` is the one context object handed to every entry
//! point: resolved settings plus the process-wide cache, constructed once
//! per process and torn down with it. Callers never touch the clients or
//! the cache directly.

use chrono::Utc;
use daylog_core::{ActivityCache, CommitReport, Settings, SourceService, WorkItemReport};

use crate::aggregate::{aggregate_commits, DateWindow};
use crate::devops::DevopsClient;
use crate::error::FetchError;
use crate::github::GithubClient;
use crate::traits::CommitSource;

pub struct ActivityService {
    settings: Settings,
    cache: ActivityCache,
}

impl ActivityService {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: ActivityCache::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Commits for one display date (`dd.mm.yyyy`) from every enabled
    /// source. Repeated queries for the same date are answered from the
    /// cache without touching the network; `force_refresh` bypasses it.
    ///
    /// # Errors
    ///
    /// `Configuration` for a malformed date, `NoSourceConfigured` when no
    /// service is enabled, otherwise the aggregate's first foundational
    /// error when every enabled service failed.
    pub async fn fetch_commits_for_date(
        &self,
        date: &str,
        force_refresh: bool,
    ) -> Result<CommitReport, FetchError> {
        if !force_refresh {
            if let Some(report) = self.cache.get_commits(date) {
                log::debug!("commit cache hit for {date}");
                return Ok(report);
            }
        }

        let window = DateWindow::from_display_date(date)?;
        let sources = self.commit_sources()?;
        let report = aggregate_commits(&sources, &window).await?;

        // Best effort: a failed cache write must not fail the query.
        self.cache.put_commits(date, &report);
        Ok(report)
    }

    /// Open work items assigned to the configured identity. Served from
    /// the cache when stored less than five minutes ago.
    ///
    /// # Errors
    ///
    /// `Configuration` when DevOps credentials are missing, otherwise the
    /// client's foundational error.
    pub async fn fetch_work_items(&self, force_refresh: bool) -> Result<WorkItemReport, FetchError> {
        if !force_refresh {
            if let Some(report) = self.cache.get_work_items(Utc::now()) {
                log::debug!("work-item cache hit");
                return Ok(report);
            }
        }

        let client = DevopsClient::new(&self.settings.devops)?;
        let report = client.fetch_work_items().await?;

        self.cache.put_work_items(&report, Utc::now());
        Ok(report)
    }

    /// One client per enabled source, in a fixed service order.
    fn commit_sources(&self) -> Result<Vec<Box<dyn CommitSource>>, FetchError> {
        let mut sources: Vec<Box<dyn CommitSource>> = Vec::new();
        for service in self.settings.enabled_sources() {
            match service {
                SourceService::Github => {
                    sources.push(Box::new(GithubClient::new(&self.settings.github)?));
                }
                SourceService::Devops => {
                    sources.push(Box::new(DevopsClient::new(&self.settings.devops)?));
                }
            }
        }
        if sources.is_empty() {
            return Err(FetchError::NoSourceConfigured);
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_settings_yield_no_sources() {
        let service = ActivityService::new(Settings::default());
        assert!(matches!(
            service.commit_sources(),
            Err(FetchError::NoSourceConfigured)
        ));
    }

    #[tokio::test]
    async fn commit_query_with_no_sources_fails_before_any_network() {
        let service = ActivityService::new(Settings::default());
        let result = service.fetch_commits_for_date("05.03.2026", false).await;
        assert!(matches!(result, Err(FetchError::NoSourceConfigured)));
    }

    #[tokio::test]
    async fn work_item_query_requires_devops_credentials() {
        let service = ActivityService::new(Settings::default());
        let result = service.fetch_work_items(false).await;
        assert!(matches!(result, Err(FetchError::Configuration(_))));
    }

    #[tokio::test]
    async fn malformed_date_rejected_before_source_resolution() {
        let settings = Settings {
            github: daylog_core::GithubSettings {
                token: "ghp_x".to_string(),
                username: "dev".to_string(),
                organization: "acme".to_string(),
                api_base: None,
            },
            ..Settings::default()
        };
        let service = ActivityService::new(settings);

        let result = service.fetch_commits_for_date("not-a-date", false).await;
        assert!(matches!(result, Err(FetchError::Configuration(_))));
    }
}
