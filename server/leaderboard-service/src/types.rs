//! Request/response types for the leaderboard HTTP API.

use leaderboard_engine::{CommitDetail, Config, ContributorAggregate};
use serde::{Deserialize, Serialize};

/// One leaderboard row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry<'a> {
  pub name: &'a str,
  pub avatar_url: &'a str,
  pub html_url: &'a str,
  pub commits: usize,
  pub change_score: f64,
  pub overall_score: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_details: Option<&'a [CommitDetail]>,
}

impl<'a> LeaderboardEntry<'a> {
  pub fn summary(agg: &'a ContributorAggregate, config: &Config) -> Self {
    Self {
      name: &agg.name,
      avatar_url: &agg.avatar_url,
      html_url: &agg.profile_url,
      commits: agg.commit_count(),
      change_score: agg.change_score(),
      overall_score: agg.overall_score(config),
      commit_details: None,
    }
  }

  pub fn with_details(agg: &'a ContributorAggregate, config: &Config) -> Self {
    Self {
      commit_details: Some(agg.commit_details()),
      ..Self::summary(agg, config)
    }
  }
}

/// Full contributor profile: the aggregate plus its derived values.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile<'a> {
  #[serde(flatten)]
  pub aggregate: &'a ContributorAggregate,
  pub commit_count: usize,
  pub overall_score: f64,
}

impl<'a> Profile<'a> {
  pub fn new(aggregate: &'a ContributorAggregate, config: &Config) -> Self {
    Self {
      aggregate,
      commit_count: aggregate.commit_count(),
      overall_score: aggregate.overall_score(config),
    }
  }
}

/// Error body, `{"body": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
  pub body: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SuccessBody {
  pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
  #[serde(default)]
  pub range: Option<String>,
}
