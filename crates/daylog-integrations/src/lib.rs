//! Remote service clients and the aggregation engine.
//!
//! Each client knows one external API: pagination, auth header shape, and
//! response schema. The aggregator fans out over every enabled client,
//! tolerates per-sub-resource failures, and merges the normalized records
//! into one deterministic, date-ordered collection.

pub mod aggregate;
pub mod devops;
pub mod error;
pub mod github;
mod http;
mod normalize;
pub mod service;
pub mod traits;

pub use aggregate::{aggregate_commits, DateWindow};
pub use devops::DevopsClient;
pub use error::FetchError;
pub use github::GithubClient;
pub use service::ActivityService;
pub use traits::CommitSource;
