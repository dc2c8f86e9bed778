//! Core types for daylog: user settings, unified activity records, the
//! in-process result cache, and the keyword-to-ticket mapper.
//!
//! Nothing in this crate touches the network; the service clients live in
//! `daylog-integrations`.

pub mod cache;
pub mod mapper;
pub mod records;
pub mod settings;

pub use cache::ActivityCache;
pub use mapper::{match_tickets, MappingTable};
pub use records::{CommitRecord, CommitReport, SourceService, WorkItem, WorkItemReport};
pub use settings::{CommitsSource, DevopsSettings, GithubSettings, Settings};
