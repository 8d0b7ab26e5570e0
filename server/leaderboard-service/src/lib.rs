//! Contributor Leaderboard Service
//!
//! HTTP service over the scoring engine: cached full-history snapshot with a
//! TTL, recompute on miss from a concurrent per-repository fetch, and
//! windowed views recomputed from per-file commit detail.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod leaderboard;
pub mod source;
pub mod state;
pub mod types;

pub use cache::{AggregateCache, CacheStore, MemoryStore};
pub use config::ServiceConfig;
pub use error::{ConfigError, LeaderboardError, SourceError, StoreError};
pub use handlers::router;
pub use leaderboard::Leaderboard;
pub use source::{fetch_all, CommitSource, DirectorySource, FetchReport, RateLimit};
pub use state::AppState;
