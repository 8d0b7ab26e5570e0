//! Leaderboard read path: cached snapshot, recompute on miss, windowed views.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use leaderboard_engine::{project_ranked, rank, Config, ContributorAggregate, Engine, Window};
use tracing::{debug, info, warn};

use crate::cache::AggregateCache;
use crate::error::LeaderboardError;
use crate::source::{self, CommitSource};

/// Orchestrates source, engine and cache for one organization.
#[derive(Clone)]
pub struct Leaderboard {
  source: Arc<dyn CommitSource>,
  cache: AggregateCache,
  org: String,
  scoring: Config,
  fetch_timeout: Duration,
  utc_offset: FixedOffset,
}

impl Leaderboard {
  pub fn new(
    source: Arc<dyn CommitSource>,
    cache: AggregateCache,
    org: impl Into<String>,
    scoring: Config,
  ) -> Self {
    Self {
      source,
      cache,
      org: org.into(),
      scoring,
      fetch_timeout: Duration::from_secs(60),
      utc_offset: Utc.fix(),
    }
  }

  pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
    self.fetch_timeout = timeout;
    self
  }

  pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
    self.utc_offset = offset;
    self
  }

  pub fn scoring(&self) -> &Config {
    &self.scoring
  }

  /// Recompute the full-history snapshot and write it through to the cache.
  ///
  /// Partial repository failures are logged and excluded; the snapshot is
  /// built from whatever succeeded.
  pub async fn refresh(&self) -> Result<Vec<ContributorAggregate>, LeaderboardError> {
    let report = source::fetch_all(self.source.as_ref(), &self.org, self.fetch_timeout).await?;

    let mut engine = Engine::new(self.scoring.clone());
    engine.fold_all(report.commits());
    let skipped = engine.skipped();
    let mut leaders = engine.finish();
    rank(&mut leaders, &self.scoring);

    self.cache.set(&leaders).await?;
    self.cache.set_last_updated(Utc::now()).await?;
    info!(
      "Leaderboard refreshed: {} contributors, {} commits skipped, {} repositories failed",
      leaders.len(),
      skipped,
      report.failures.len()
    );

    match self.source.rate_limit().await {
      Ok(Some(rl)) => info!("Upstream rate limit: {}/{}", rl.used, rl.limit),
      Ok(None) => {}
      Err(e) => warn!("rate limit check failed: {}", e),
    }

    Ok(leaders)
  }

  /// Full-history leaderboard, ranked. Recomputes on a cache miss.
  pub async fn full(&self) -> Result<Vec<ContributorAggregate>, LeaderboardError> {
    if let Some(leaders) = self.cache.get().await? {
      return Ok(leaders);
    }

    info!("Leaderboard cache miss; recomputing");
    if let Err(e) = self.refresh().await {
      warn!("recompute failed: {}", e);
      return Err(LeaderboardError::unavailable(e.to_string()));
    }

    self
      .cache
      .get()
      .await?
      .ok_or_else(|| LeaderboardError::unavailable("snapshot missing after recompute"))
  }

  /// Leaderboard over a trailing window, re-ranked by windowed score.
  pub async fn windowed(&self, window: Window) -> Result<Vec<ContributorAggregate>, LeaderboardError> {
    let leaders = self.full().await?;
    if window == Window::All {
      return Ok(leaders);
    }
    debug!("Projecting {} contributors onto {} window", leaders.len(), window.as_str());
    Ok(project_ranked(&leaders, window, &self.now(), &self.scoring))
  }

  /// Full-history aggregate for one contributor (exact, case-sensitive name).
  pub async fn contributor(&self, name: &str) -> Result<ContributorAggregate, LeaderboardError> {
    self
      .full()
      .await?
      .into_iter()
      .find(|a| a.name == name)
      .ok_or_else(|| LeaderboardError::ContributorNotFound(name.to_string()))
  }

  /// Time of the last recompute, `None` if never.
  pub async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, LeaderboardError> {
    Ok(self.cache.last_updated().await?)
  }

  fn now(&self) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&self.utc_offset)
  }
}
