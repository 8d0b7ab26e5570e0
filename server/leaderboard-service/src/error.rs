//! Structured error types for the leaderboard service.

use thiserror::Error;

/// Failure talking to the upstream commit source.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("io: {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("json: {path}: {source}")]
  Json {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("timed out after {secs}s fetching {repo}")]
  Timeout { repo: String, secs: u64 },

  #[error("all {count} repositories failed: {repos}")]
  AllFailed { count: usize, repos: String },
}

/// Failure in the key-value cache store.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(String),
}

/// Outcomes of the leaderboard read path the caller must branch on.
#[derive(Debug, Error)]
pub enum LeaderboardError {
  /// No cached snapshot and a recompute could not produce one.
  #[error("leaderboard unavailable: {reason}")]
  Unavailable { reason: String },

  #[error("contributor not found: {0}")]
  ContributorNotFound(String),

  #[error("source: {0}")]
  Source(#[from] SourceError),

  #[error("store: {0}")]
  Store(#[from] StoreError),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl LeaderboardError {
  pub fn unavailable(reason: impl Into<String>) -> Self {
    Self::Unavailable {
      reason: reason.into(),
    }
  }
}

/// Invalid service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config: {name} must be set")]
  Missing { name: &'static str },

  #[error("config: {name}: {reason}")]
  Invalid { name: &'static str, reason: String },
}
