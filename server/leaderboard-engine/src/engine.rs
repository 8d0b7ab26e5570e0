//! Core engine: folds raw commits into one aggregate per contributor.

use std::collections::HashMap;

use tracing::debug;

use crate::category;
use crate::config::Config;
use crate::score;
use crate::types::*;

/// What happened to one raw commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
  Folded,
  /// No commit payload (deleted or unavailable commit).
  MissingPayload,
  /// No resolvable author name (bots, deleted accounts).
  MissingAuthor,
}

/// The commit analysis engine. Holds the aggregates built so far.
pub struct Engine {
  config: Config,
  index: HashMap<String, usize>,
  aggregates: Vec<ContributorAggregate>,
  skipped: usize,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self {
      config,
      index: HashMap::new(),
      aggregates: Vec::new(),
      skipped: 0,
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Fold a single raw commit into its author's aggregate.
  ///
  /// Commits without a payload or a resolvable author are skipped, never fatal.
  pub fn fold(&mut self, raw: &RawCommit) -> FoldOutcome {
    let payload = match &raw.commit {
      Some(p) => p,
      None => {
        debug!(sha = %raw.sha, "skipping commit without payload");
        self.skipped += 1;
        return FoldOutcome::MissingPayload;
      }
    };
    let identity = match resolve_identity(raw, payload) {
      Some(id) => id,
      None => {
        debug!(sha = %raw.sha, "skipping commit without resolvable author");
        self.skipped += 1;
        return FoldOutcome::MissingAuthor;
      }
    };

    let slot = match self.index.get(&identity.name) {
      Some(&i) => i,
      None => {
        self.index.insert(identity.name.clone(), self.aggregates.len());
        self.aggregates.push(ContributorAggregate::new(identity));
        self.aggregates.len() - 1
      }
    };

    let detail = CommitDetail {
      message: first_line(&payload.message).to_string(),
      date: commit_date(payload),
      files: raw.files.clone(),
    };
    self.aggregates[slot].record(detail, &self.config);
    FoldOutcome::Folded
  }

  pub fn fold_all<'a>(&mut self, commits: impl IntoIterator<Item = &'a RawCommit>) {
    for raw in commits {
      self.fold(raw);
    }
  }

  /// Number of commits skipped so far.
  pub fn skipped(&self) -> usize {
    self.skipped
  }

  /// Aggregates in first-seen author order.
  pub fn finish(self) -> Vec<ContributorAggregate> {
    self.aggregates
  }
}

/// Fold a whole batch. Output order is first-seen author order; callers sort.
pub fn analyze(commits: &[RawCommit], config: &Config) -> Vec<ContributorAggregate> {
  let mut engine = Engine::new(config.clone());
  engine.fold_all(commits);
  engine.finish()
}

/// Sort descending by overall score. Stable, so ties keep their input order.
pub fn rank(aggregates: &mut [ContributorAggregate], config: &Config) {
  aggregates.sort_by(|a, b| {
    b.overall_score(config)
      .partial_cmp(&a.overall_score(config))
      .unwrap_or(std::cmp::Ordering::Equal)
  });
}

impl ContributorAggregate {
  /// Append one commit: message, detail, change score and category tally.
  pub fn record(&mut self, detail: CommitDetail, config: &Config) {
    self.change_score += score::commit_change_score(&detail.files, config);
    if let Some(category) = category::categorize(&detail.message) {
      self.categories.record(category, &detail.message);
    }
    self.commit_messages.push(detail.message.clone());
    self.commit_details.push(detail);
  }

  /// Ranking value, always derived from the current commit count and change score.
  pub fn overall_score(&self, config: &Config) -> f64 {
    score::overall_score(self.commit_count(), self.change_score, config)
  }
}

/// Account author, then git author, then account committer; the first present one decides.
fn resolve_identity(raw: &RawCommit, payload: &CommitPayload) -> Option<Identity> {
  let (name, account) = if let Some(account) = &raw.author {
    (account.login.as_deref(), Some(account))
  } else if let Some(signature) = &payload.author {
    (signature.name.as_deref(), None)
  } else if let Some(account) = &raw.committer {
    (account.login.as_deref(), Some(account))
  } else {
    return None;
  };

  let name = name.filter(|n| !n.is_empty())?;
  Some(Identity {
    name: name.to_string(),
    avatar_url: account.map(|a| a.avatar_url.clone()).unwrap_or_default(),
    profile_url: account.map(|a| a.html_url.clone()).unwrap_or_default(),
  })
}

fn commit_date(payload: &CommitPayload) -> Option<chrono::DateTime<chrono::Utc>> {
  payload
    .author
    .as_ref()
    .and_then(|s| s.date)
    .or_else(|| payload.committer.as_ref().and_then(|s| s.date))
}

fn first_line(message: &str) -> &str {
  message.split('\n').next().unwrap_or_default()
}
