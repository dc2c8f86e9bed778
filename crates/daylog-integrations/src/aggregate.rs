//! Cross-service aggregation of unified commit records.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use daylog_core::{CommitRecord, CommitReport, SourceService};
use futures::future::join_all;

use crate::error::FetchError;
use crate::traits::CommitSource;

/// One calendar day: inclusive start, exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Resolve a `dd.mm.yyyy` display date to the window from local
    /// midnight of that day to local midnight of the next.
    ///
    /// # Errors
    ///
    /// `Configuration` when the input does not name a real calendar day.
    pub fn from_display_date(date: &str) -> Result<Self, FetchError> {
        let day = NaiveDate::parse_from_str(date, "%d.%m.%Y").map_err(|_| {
            FetchError::Configuration(format!("invalid date '{date}', expected dd.mm.yyyy"))
        })?;
        let next = day.succ_opt().ok_or_else(|| {
            FetchError::Configuration(format!("date '{date}' is out of range"))
        })?;
        Ok(Self {
            start: local_midnight(day)?,
            end: local_midnight(next)?,
        })
    }

    /// Window start as an ISO-8601 instant for query parameters.
    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Window end as an ISO-8601 instant for query parameters.
    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

fn local_midnight(day: NaiveDate) -> Result<DateTime<Utc>, FetchError> {
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| FetchError::Configuration(format!("invalid time on {day}")))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FetchError::Configuration(format!("no local midnight on {day}")))
}

/// Query every source concurrently and merge the results.
///
/// A failing source never cancels its siblings: as long as at least one
/// source succeeded, failures are demoted to skipped-source notes in the
/// report. Merged commits are ordered by author date descending; the sort
/// is stable, so same-instant commits keep their arrival order.
///
/// # Errors
///
/// `NoSourceConfigured` when `sources` is empty (no network call is made);
/// otherwise the first source error when every source failed.
pub async fn aggregate_commits(
    sources: &[Box<dyn CommitSource>],
    window: &DateWindow,
) -> Result<CommitReport, FetchError> {
    if sources.is_empty() {
        return Err(FetchError::NoSourceConfigured);
    }
    let fetches = join_all(sources.iter().map(|source| source.fetch_commits(window))).await;
    let labeled = sources
        .iter()
        .map(|source| source.service())
        .zip(fetches)
        .collect();
    merge_source_results(labeled)
}

/// Merge per-service outcomes in source order, then order by author date.
fn merge_source_results(
    results: Vec<(SourceService, Result<CommitReport, FetchError>)>,
) -> Result<CommitReport, FetchError> {
    let mut merged = CommitReport::default();
    let mut first_error = None;
    let mut any_succeeded = false;

    for (service, result) in results {
        match result {
            Ok(report) => {
                any_succeeded = true;
                merged.commits.extend(report.commits);
                merged.skipped.extend(report.skipped);
            }
            Err(err) => {
                log::warn!("{service} commit fetch failed: {err}");
                merged.skipped.push(format!("{service}: {err}"));
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    if !any_succeeded {
        return Err(first_error.unwrap_or(FetchError::NoSourceConfigured));
    }

    merged
        .commits
        .sort_by_key(|commit| std::cmp::Reverse(commit.author_date));
    Ok(merged)
}

/// Collapse same-service duplicates (the same commit visible through
/// several repository listings), keeping the first occurrence.
pub(crate) fn dedupe_commits(commits: Vec<CommitRecord>) -> Vec<CommitRecord> {
    let mut seen = HashSet::new();
    commits
        .into_iter()
        .filter(|commit| seen.insert(commit.id.clone()))
        .collect()
}
