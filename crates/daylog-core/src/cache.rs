//! Process-wide cache for query results.
//!
//! Two policies coexist on purpose. Commits are keyed by the exact display
//! date and never expire: commit history for a past day is immutable, so
//! the cache answers "I already asked this exact question" and only a
//! forced refresh or a different date goes back to the network. Work items
//! are live state and expire after five minutes.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::records::{CommitReport, WorkItemReport};

/// Work-item entries are considered fresh for this long after storage.
pub const WORK_ITEM_TTL_SECONDS: i64 = 300;

struct WorkItemEntry {
    report: WorkItemReport,
    stored_at: DateTime<Utc>,
}

/// Keyed result cache with interior mutability. Each entry is replaced
/// atomically under its mutex, so a reader never observes a half-written
/// payload. A poisoned lock degrades to a cache miss.
#[derive(Default)]
pub struct ActivityCache {
    commits: Mutex<HashMap<String, CommitReport>>,
    work_items: Mutex<Option<WorkItemEntry>>,
}

impl ActivityCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached commits for one display date, regardless of age.
    #[must_use]
    pub fn get_commits(&self, date: &str) -> Option<CommitReport> {
        self.commits.lock().ok()?.get(date).cloned()
    }

    /// Store the commit report for `date`, replacing any previous entry.
    /// Best effort: storage failures are invisible to the caller.
    pub fn put_commits(&self, date: &str, report: &CommitReport) {
        if let Ok(mut commits) = self.commits.lock() {
            commits.insert(date.to_string(), report.clone());
        }
    }

    /// Cached work items, if stored less than the TTL before `now`.
    #[must_use]
    pub fn get_work_items(&self, now: DateTime<Utc>) -> Option<WorkItemReport> {
        let guard = self.work_items.lock().ok()?;
        let entry = guard.as_ref()?;
        if now - entry.stored_at < Duration::seconds(WORK_ITEM_TTL_SECONDS) {
            Some(entry.report.clone())
        } else {
            None
        }
    }

    /// Store the work-item report, stamped with `stored_at`. Best effort.
    pub fn put_work_items(&self, report: &WorkItemReport, stored_at: DateTime<Utc>) {
        if let Ok(mut slot) = self.work_items.lock() {
            *slot = Some(WorkItemEntry {
                report: report.clone(),
                stored_at,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CommitRecord, SourceService, WorkItem};
    use chrono::TimeZone;

    fn commit_report(ids: &[&str]) -> CommitReport {
        CommitReport {
            commits: ids
                .iter()
                .map(|id| CommitRecord {
                    id: (*id).to_string(),
                    message: format!("commit {id}"),
                    author_date: Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap(),
                    source: SourceService::Github,
                    url: String::new(),
                    project: None,
                    repo: None,
                })
                .collect(),
            skipped: Vec::new(),
        }
    }

    fn item_report(title: &str) -> WorkItemReport {
        WorkItemReport {
            items: vec![WorkItem {
                id: 1,
                title: title.to_string(),
                state: "Active".to_string(),
                item_type: "Task".to_string(),
                project: "Web".to_string(),
                url: String::new(),
            }],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn commit_cache_hits_same_date_misses_other() {
        let cache = ActivityCache::new();
        cache.put_commits("05.03.2026", &commit_report(&["a"]));

        assert_eq!(cache.get_commits("05.03.2026").unwrap().commits.len(), 1);
        assert!(cache.get_commits("06.03.2026").is_none());
    }

    #[test]
    fn commit_cache_replaces_entry_for_same_date() {
        let cache = ActivityCache::new();
        cache.put_commits("05.03.2026", &commit_report(&["a"]));
        cache.put_commits("05.03.2026", &commit_report(&["b", "c"]));

        let cached = cache.get_commits("05.03.2026").unwrap();
        assert_eq!(cached.commits.len(), 2);
        assert_eq!(cached.commits[0].id, "b");
    }

    #[test]
    fn work_item_cache_fresh_within_ttl() {
        let cache = ActivityCache::new();
        let stored = Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap();
        cache.put_work_items(&item_report("Fix login"), stored);

        let hit = cache.get_work_items(stored + Duration::seconds(299));
        assert_eq!(hit.unwrap().items[0].title, "Fix login");
    }

    #[test]
    fn work_item_cache_expires_after_ttl() {
        let cache = ActivityCache::new();
        let stored = Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap();
        cache.put_work_items(&item_report("Fix login"), stored);

        assert!(cache.get_work_items(stored + Duration::seconds(301)).is_none());
        assert!(cache.get_work_items(stored + Duration::seconds(300)).is_none());
    }

    #[test]
    fn work_item_cache_empty_misses() {
        let cache = ActivityCache::new();
        assert!(cache.get_work_items(Utc::now()).is_none());
    }
}
