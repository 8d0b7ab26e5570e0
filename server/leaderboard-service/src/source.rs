//! Upstream commit source and the concurrent per-repository fetch.
//!
//! Every repository is fetched concurrently. One repository failing never
//! aborts the others: failures are collected and logged, and the recompute
//! proceeds with whatever succeeded. Only when every repository fails is the
//! fetch itself an error.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use leaderboard_engine::RawCommit;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SourceError;

/// Upstream API quota status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
  pub used: u32,
  pub limit: u32,
}

/// Where commits come from. Retry and rate-limit policy belong to the implementation.
#[async_trait]
pub trait CommitSource: Send + Sync {
  /// Repository names of the organization, forks excluded.
  async fn list_repositories(&self, org: &str) -> Result<Vec<String>, SourceError>;

  /// Every commit of one repository, with per-file stats.
  async fn list_commits(&self, repo: &str) -> Result<Vec<RawCommit>, SourceError>;

  /// Quota status, when the source has one.
  async fn rate_limit(&self) -> Result<Option<RateLimit>, SourceError> {
    Ok(None)
  }
}

/// Commits fetched from one repository.
#[derive(Debug)]
pub struct RepoCommits {
  pub repo: String,
  pub commits: Vec<RawCommit>,
}

/// A single repository failure.
#[derive(Debug)]
pub struct RepoFailure {
  pub repo: String,
  pub error: String,
}

/// Result of fetching every repository.
#[derive(Debug)]
pub struct FetchReport {
  /// Successful repositories, in listing order.
  pub successes: Vec<RepoCommits>,
  pub failures: Vec<RepoFailure>,
}

impl FetchReport {
  pub fn commit_count(&self) -> usize {
    self.successes.iter().map(|r| r.commits.len()).sum()
  }

  /// All commits, concatenated in repository listing order.
  pub fn commits(&self) -> impl Iterator<Item = &RawCommit> {
    self.successes.iter().flat_map(|r| r.commits.iter())
  }
}

/// Fetch all repositories of `org` concurrently, each under `timeout`.
pub async fn fetch_all(
  source: &dyn CommitSource,
  org: &str,
  timeout: Duration,
) -> Result<FetchReport, SourceError> {
  let repos = source.list_repositories(org).await?;
  info!("Fetching commits for {} repositories of {}", repos.len(), org);

  let futures: Vec<_> = repos
    .into_iter()
    .map(|repo| async move {
      debug!("Fetching {}", repo);
      let result = match tokio::time::timeout(timeout, source.list_commits(&repo)).await {
        Ok(r) => r,
        Err(_) => Err(SourceError::Timeout {
          repo: repo.clone(),
          secs: timeout.as_secs(),
        }),
      };
      (repo, result)
    })
    .collect();

  let results = futures::future::join_all(futures).await;

  let mut successes = Vec::new();
  let mut failures = Vec::new();
  for (repo, result) in results {
    match result {
      Ok(commits) => {
        debug!("{}: {} commits", repo, commits.len());
        successes.push(RepoCommits { repo, commits });
      }
      Err(e) => {
        warn!("{}: fetch failed: {}", repo, e);
        failures.push(RepoFailure {
          repo,
          error: e.to_string(),
        });
      }
    }
  }

  if successes.is_empty() && !failures.is_empty() {
    let repos: Vec<_> = failures.iter().map(|f| f.repo.as_str()).collect();
    return Err(SourceError::AllFailed {
      count: failures.len(),
      repos: repos.join(", "),
    });
  }

  let report = FetchReport {
    successes,
    failures,
  };
  info!(
    "Fetch complete: {}/{} repositories, {} commits",
    report.successes.len(),
    report.successes.len() + report.failures.len(),
    report.commit_count()
  );
  Ok(report)
}

// ---------------------------------------------------------------------------
// Directory-backed source
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RepoListing {
  name: String,
  #[serde(default)]
  fork: bool,
}

/// Reads an export of the upstream API from disk.
///
/// Layout: `<root>/<org>/repos.json` is the repository listing
/// (`[{"name", "fork"}]`) and `<root>/<org>/<repo>.json` holds that
/// repository's commit objects.
pub struct DirectorySource {
  root: PathBuf,
  org: String,
}

impl DirectorySource {
  pub fn new(root: impl Into<PathBuf>, org: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      org: org.into(),
    }
  }

  async fn read_json<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T, SourceError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(&path).await.map_err(|source| SourceError::Io {
      path: display.clone(),
      source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
      path: display,
      source,
    })
  }
}

#[async_trait]
impl CommitSource for DirectorySource {
  async fn list_repositories(&self, org: &str) -> Result<Vec<String>, SourceError> {
    let listing: Vec<RepoListing> = Self::read_json(self.root.join(org).join("repos.json")).await?;
    Ok(
      listing
        .into_iter()
        .filter(|r| !r.fork)
        .map(|r| r.name)
        .collect(),
    )
  }

  async fn list_commits(&self, repo: &str) -> Result<Vec<RawCommit>, SourceError> {
    Self::read_json(self.root.join(&self.org).join(format!("{}.json", repo))).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  /// Mock source: repo name -> Some(commits) or None (failure).
  struct MockSource {
    repos: Vec<(String, Option<usize>)>,
  }

  fn commit(login: &str) -> RawCommit {
    serde_json::from_value(serde_json::json!({
      "commit": {"message": "feat: x"},
      "author": {"login": login},
    }))
    .unwrap()
  }

  #[async_trait]
  impl CommitSource for MockSource {
    async fn list_repositories(&self, _org: &str) -> Result<Vec<String>, SourceError> {
      Ok(self.repos.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn list_commits(&self, repo: &str) -> Result<Vec<RawCommit>, SourceError> {
      let table: HashMap<_, _> = self.repos.iter().cloned().collect();
      match table.get(repo).copied().flatten() {
        Some(n) => Ok((0..n).map(|_| commit(repo)).collect()),
        None => Err(SourceError::Io {
          path: repo.to_string(),
          source: std::io::Error::new(std::io::ErrorKind::Other, "mock failure"),
        }),
      }
    }
  }

  struct SlowSource;

  #[async_trait]
  impl CommitSource for SlowSource {
    async fn list_repositories(&self, _org: &str) -> Result<Vec<String>, SourceError> {
      Ok(vec!["slow".into()])
    }

    async fn list_commits(&self, _repo: &str) -> Result<Vec<RawCommit>, SourceError> {
      tokio::time::sleep(Duration::from_secs(30)).await;
      Ok(vec![])
    }
  }

  fn mock(repos: &[(&str, Option<usize>)]) -> MockSource {
    MockSource {
      repos: repos.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
    }
  }

  #[tokio::test]
  async fn test_partial_failure() {
    let source = mock(&[("api", Some(2)), ("web", None), ("cli", Some(1))]);
    let report = fetch_all(&source, "acme", Duration::from_secs(5)).await.unwrap();
    assert_eq!(report.successes.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].repo, "web");
    assert_eq!(report.commit_count(), 3);
    let repos: Vec<_> = report.successes.iter().map(|r| r.repo.as_str()).collect();
    assert_eq!(repos, vec!["api", "cli"]);
  }

  #[tokio::test]
  async fn test_all_fail() {
    let source = mock(&[("api", None), ("web", None)]);
    let err = fetch_all(&source, "acme", Duration::from_secs(5)).await.unwrap_err();
    assert!(err.to_string().contains("all 2 repositories failed"));
  }

  #[tokio::test]
  async fn test_no_repositories_is_empty_not_error() {
    let source = mock(&[]);
    let report = fetch_all(&source, "acme", Duration::from_secs(5)).await.unwrap();
    assert_eq!(report.commit_count(), 0);
  }

  #[tokio::test]
  async fn test_timeout_is_reported() {
    let err = fetch_all(&SlowSource, "acme", Duration::from_millis(50)).await.unwrap_err();
    assert!(err.to_string().contains("slow"));
  }

  #[tokio::test]
  async fn test_directory_source_skips_forks() {
    let dir = tempfile::TempDir::new().unwrap();
    let org_dir = dir.path().join("acme");
    std::fs::create_dir_all(&org_dir).unwrap();
    std::fs::write(
      org_dir.join("repos.json"),
      r#"[{"name": "api", "fork": false}, {"name": "upstream-fork", "fork": true}, {"name": "web"}]"#,
    )
    .unwrap();
    std::fs::write(
      org_dir.join("api.json"),
      r#"[{"sha": "1", "commit": {"message": "feat: a"}, "author": {"login": "ana"}, "files": []}]"#,
    )
    .unwrap();

    let source = DirectorySource::new(dir.path(), "acme");
    let repos = source.list_repositories("acme").await.unwrap();
    assert_eq!(repos, vec!["api", "web"]);

    let commits = source.list_commits("api").await.unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].sha, "1");

    // web.json is missing: reported, not panicking.
    let err = source.list_commits("web").await.unwrap_err();
    assert!(err.to_string().contains("web.json"));
    assert!(source.rate_limit().await.unwrap().is_none());
  }
}
