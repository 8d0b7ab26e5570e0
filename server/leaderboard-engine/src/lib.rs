//! Contributor Leaderboard Engine — deterministic, rule-based scoring.
//!
//! Folds raw commit records into per-contributor aggregates, scores file
//! changes on a saturating curve, tags conventional-commit categories, and
//! projects full-history aggregates onto trailing calendar windows.
//!
//! No DB, no network; pure computation.

pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod noise;
pub mod score;
pub mod types;
pub mod window;

pub use config::Config;
pub use engine::{analyze, rank, Engine, FoldOutcome};
pub use error::EngineError;
pub use types::{Category, CommitDetail, ContributorAggregate, FileChange, RawCommit};
pub use window::{project, project_ranked, Window};
