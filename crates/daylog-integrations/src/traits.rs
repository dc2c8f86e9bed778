use async_trait::async_trait;
use daylog_core::{CommitReport, SourceService};

use crate::aggregate::DateWindow;
use crate::error::FetchError;

/// A remote service that can report the user's commits for one day.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Which service this source reports for.
    fn service(&self) -> SourceService;

    /// Fetch the user's commits inside `window`.
    ///
    /// # Errors
    ///
    /// Fails only when a foundational enumeration call fails. Individual
    /// repositories or projects that cannot be read contribute nothing and
    /// are listed in the report's `skipped` entries.
    async fn fetch_commits(&self, window: &DateWindow) -> Result<CommitReport, FetchError>;
}
