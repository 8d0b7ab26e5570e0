//! Core types for the scoring engine (upstream commit contract + aggregates).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upstream types (JSON contract — GitHub commit objects)
// ---------------------------------------------------------------------------

/// One commit as returned by the upstream commit listing. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommit {
  #[serde(default)]
  pub sha: String,
  #[serde(default)]
  pub commit: Option<CommitPayload>,
  /// Platform account of the author, when the commit email maps to one.
  #[serde(default)]
  pub author: Option<Account>,
  #[serde(default)]
  pub committer: Option<Account>,
  #[serde(default)]
  pub files: Vec<FileChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitPayload {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub author: Option<Signature>,
  #[serde(default)]
  pub committer: Option<Signature>,
}

/// Git-level identity attached to a commit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Signature {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub date: Option<DateTime<Utc>>,
}

/// Platform account (login plus display links).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Account {
  #[serde(default)]
  pub login: Option<String>,
  #[serde(default)]
  pub avatar_url: String,
  #[serde(default)]
  pub html_url: String,
}

/// One file touched by one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
  pub filename: String,
  #[serde(default)]
  pub additions: u32,
  #[serde(default)]
  pub deletions: u32,
  #[serde(default)]
  pub changes: u32,
}

impl FileChange {
  pub fn new(filename: impl Into<String>, additions: u32, deletions: u32) -> Self {
    Self {
      filename: filename.into(),
      additions,
      deletions,
      changes: additions.saturating_add(deletions),
    }
  }
}


// ---------------------------------------------------------------------------
// Commit categories
// ---------------------------------------------------------------------------

/// Conventional-commit category, in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Bug,
  Feature,
  Ci,
  Docs,
  Test,
  Perf,
}

impl Category {
  pub const ALL: [Category; 6] = [
    Self::Bug,
    Self::Feature,
    Self::Ci,
    Self::Docs,
    Self::Test,
    Self::Perf,
  ];
}

/// Count and messages for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTally {
  pub count: u32,
  pub messages: Vec<String>,
}

/// One tally per category, addressed by `Category`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
  bug: CategoryTally,
  feature: CategoryTally,
  ci: CategoryTally,
  docs: CategoryTally,
  test: CategoryTally,
  perf: CategoryTally,
}

impl CategoryBreakdown {
  pub fn get(&self, category: Category) -> &CategoryTally {
    match category {
      Category::Bug => &self.bug,
      Category::Feature => &self.feature,
      Category::Ci => &self.ci,
      Category::Docs => &self.docs,
      Category::Test => &self.test,
      Category::Perf => &self.perf,
    }
  }

  fn get_mut(&mut self, category: Category) -> &mut CategoryTally {
    match category {
      Category::Bug => &mut self.bug,
      Category::Feature => &mut self.feature,
      Category::Ci => &mut self.ci,
      Category::Docs => &mut self.docs,
      Category::Test => &mut self.test,
      Category::Perf => &mut self.perf,
    }
  }

  pub fn record(&mut self, category: Category, message: &str) {
    let tally = self.get_mut(category);
    tally.count += 1;
    tally.messages.push(message.to_string());
  }

  /// Sum of all category counts.
  pub fn total(&self) -> u32 {
    Category::ALL.iter().map(|c| self.get(*c).count).sum()
  }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// One commit attributed to one contributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
  /// First line of the commit message.
  pub message: String,
  /// Missing when upstream supplied no date; such commits fall outside every bounded window.
  #[serde(default)]
  pub date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub files: Vec<FileChange>,
}

/// Display identity of a contributor. Not used in scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub name: String,
  pub avatar_url: String,
  pub profile_url: String,
}

/// Rolled-up commit statistics for one contributor.
///
/// `commit_count` and `overall_score` are derived on read, so they can never
/// drift from the commit list and the running change score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorAggregate {
  pub name: String,
  #[serde(default)]
  pub avatar_url: String,
  #[serde(default, rename = "htmlUrl")]
  pub profile_url: String,
  #[serde(default, rename = "commits")]
  pub(crate) commit_messages: Vec<String>,
  #[serde(default)]
  pub(crate) commit_details: Vec<CommitDetail>,
  #[serde(default)]
  pub(crate) change_score: f64,
  #[serde(default)]
  pub(crate) categories: CategoryBreakdown,
}

impl ContributorAggregate {
  pub fn new(identity: Identity) -> Self {
    Self {
      name: identity.name,
      avatar_url: identity.avatar_url,
      profile_url: identity.profile_url,
      commit_messages: Vec::new(),
      commit_details: Vec::new(),
      change_score: 0.0,
      categories: CategoryBreakdown::default(),
    }
  }

  pub fn identity(&self) -> Identity {
    Identity {
      name: self.name.clone(),
      avatar_url: self.avatar_url.clone(),
      profile_url: self.profile_url.clone(),
    }
  }

  pub fn commit_messages(&self) -> &[String] {
    &self.commit_messages
  }

  pub fn commit_details(&self) -> &[CommitDetail] {
    &self.commit_details
  }

  pub fn commit_count(&self) -> usize {
    self.commit_details.len()
  }

  pub fn change_score(&self) -> f64 {
    self.change_score
  }

  pub fn categories(&self) -> &CategoryBreakdown {
    &self.categories
  }
}
