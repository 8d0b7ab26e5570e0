//! Integration tests for the scoring engine.

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use leaderboard_engine::score::{file_change_score, overall_score};
use leaderboard_engine::{analyze, project, Category, Config, RawCommit, Window};

fn fixture_commits() -> Vec<RawCommit> {
  let json = r#"[
    {
      "sha": "a1",
      "commit": {
        "message": "feat: add login\n\nWires the OAuth callback.",
        "author": {"name": "Ana Lima", "date": "2025-10-15T09:00:00Z"}
      },
      "author": {"login": "ana", "avatar_url": "https://avatars.example/ana", "html_url": "https://github.com/ana"},
      "files": [{"filename": "src/auth/login.ts", "additions": 200, "deletions": 10, "changes": 210}]
    },
    {
      "sha": "b2",
      "commit": {
        "message": "chore: bump deps",
        "author": {"name": "Bo", "date": "2025-10-14T09:00:00Z"}
      },
      "author": {"login": "bo", "avatar_url": "", "html_url": ""},
      "files": [{"filename": "package-lock.json", "additions": 5000, "deletions": 4000, "changes": 9000}]
    },
    {
      "sha": "c3",
      "commit": {"message": "fix: orphaned commit"},
      "author": null,
      "committer": null,
      "files": []
    },
    {
      "sha": "d4",
      "author": {"login": "ghost"},
      "files": []
    },
    {
      "sha": "e5",
      "commit": {
        "message": "fix(auth): token refresh",
        "author": {"name": "Ana Lima", "date": "2025-09-05T09:00:00Z"}
      },
      "author": {"login": "ana", "avatar_url": "https://avatars.example/ana", "html_url": "https://github.com/ana"},
      "files": [
        {"filename": "src/auth/refresh.ts", "additions": 3, "deletions": 1},
        {"filename": "dist/bundle.js", "additions": 900, "deletions": 900}
      ],
      "stats": {"total": 1804},
      "some_unknown_field": true
    }
  ]"#;
  serde_json::from_str(json).unwrap()
}

fn now() -> chrono::DateTime<FixedOffset> {
  FixedOffset::east_opt(0)
    .unwrap()
    .with_ymd_and_hms(2025, 10, 15, 18, 0, 0)
    .unwrap()
}

#[test]
fn analyze_builds_aggregates_from_upstream_json() {
  let config = Config::default();
  let aggs = analyze(&fixture_commits(), &config);

  // c3 has no author at all, d4 has no commit payload.
  assert_eq!(aggs.len(), 2);

  let ana = aggs.iter().find(|a| a.name == "ana").unwrap();
  assert_eq!(ana.commit_count(), 2);
  assert_eq!(ana.commit_messages(), &["feat: add login", "fix(auth): token refresh"]);
  assert_eq!(ana.categories().get(Category::Feature).count, 1);
  assert_eq!(ana.categories().get(Category::Bug).count, 1);
  assert!(ana.categories().total() as usize <= ana.commit_count());

  let expected = file_change_score(200, 10, &config) + file_change_score(3, 1, &config);
  assert!((ana.change_score() - expected).abs() < 1e-9);
  assert_eq!(
    ana.overall_score(&config),
    overall_score(2, ana.change_score(), &config)
  );

  let bo = aggs.iter().find(|a| a.name == "bo").unwrap();
  assert_eq!(bo.change_score(), 0.0);
  assert_eq!(bo.categories().total(), 0);
}

#[test]
fn analyze_is_deterministic() {
  let config = Config::default();
  let a = analyze(&fixture_commits(), &config);
  let b = analyze(&fixture_commits(), &config);
  assert_eq!(a, b);
  assert_eq!(
    serde_json::to_string(&a).unwrap(),
    serde_json::to_string(&b).unwrap()
  );
}

#[test]
fn aggregates_survive_a_json_round_trip_with_files() {
  let aggs = analyze(&fixture_commits(), &Config::default());
  let bytes = serde_json::to_vec(&aggs).unwrap();
  let back: Vec<leaderboard_engine::ContributorAggregate> = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(back.len(), aggs.len());
  for (b, a) in back.iter().zip(&aggs) {
    assert_eq!(b.name, a.name);
    assert_eq!(b.commit_details(), a.commit_details());
    assert_eq!(b.categories(), a.categories());
    assert_eq!(b.change_score().to_bits(), a.change_score().to_bits());
  }
  assert!(!back[0].commit_details()[0].files.is_empty());
}

#[test]
fn change_scores_are_bit_exact_after_json_round_trip() {
  let config = Config::default();
  let commits: Vec<RawCommit> = (5..400u32)
    .map(|a| {
      serde_json::from_value(serde_json::json!({
        "sha": format!("s{}", a),
        "commit": {"message": "feat: step", "author": {"name": "ana", "date": "2025-10-15T09:00:00Z"}},
        "author": {"login": format!("dev{}", a)},
        "files": [{"filename": "src/lib.rs", "additions": a, "deletions": 0}]
      }))
      .unwrap()
    })
    .collect();
  let aggs = analyze(&commits, &config);
  let back: Vec<leaderboard_engine::ContributorAggregate> =
    serde_json::from_slice(&serde_json::to_vec(&aggs).unwrap()).unwrap();
  for (b, a) in back.iter().zip(&aggs) {
    assert_eq!(
      b.change_score().to_bits(),
      a.change_score().to_bits(),
      "{}: {} != {}",
      a.name,
      b.change_score(),
      a.change_score()
    );
  }
}

#[test]
fn windows_recompute_from_retained_files() {
  let config = Config::default();
  let aggs = analyze(&fixture_commits(), &config);

  let daily = project(&aggs, Window::Daily, &now(), &config);
  assert_eq!(daily.len(), 1);
  assert_eq!(daily[0].name, "ana");
  assert_eq!(daily[0].commit_count(), 1);
  assert!((daily[0].change_score() - file_change_score(200, 10, &config)).abs() < 1e-12);

  let weekly = project(&aggs, Window::Weekly, &now(), &config);
  let names: Vec<_> = weekly.iter().map(|a| a.name.as_str()).collect();
  assert_eq!(names, vec!["ana", "bo"]);

  let yearly = project(&aggs, Window::Yearly, &now(), &config);
  assert_eq!(yearly, aggs);
}

#[test]
fn retained_and_dropped_commits_split_at_window_start() {
  let config = Config::default();
  let aggs = analyze(&fixture_commits(), &config);
  for window in [Window::Daily, Window::Weekly, Window::Monthly, Window::Yearly] {
    let start = window.start(&now()).unwrap();
    let projected = project(&aggs, window, &now(), &config);
    for full in &aggs {
      let kept = projected.iter().find(|a| a.name == full.name);
      let kept_count = kept.map(|a| a.commit_count()).unwrap_or(0);
      let in_window = full
        .commit_details()
        .iter()
        .filter(|d| d.date.map(|t| t >= start).unwrap_or(false))
        .count();
      assert_eq!(kept_count, in_window, "{} in {:?}", full.name, window);
    }
  }
}

#[test]
fn forty_day_old_commit_leaves_daily_window() {
  let config = Config::default();
  let today = now().with_timezone(&Utc);
  let old = today - Duration::days(40);
  let json = format!(
    r#"[
      {{"commit": {{"message": "feat: today", "author": {{"name": "x", "date": "{}"}}}}, "author": {{"login": "ana"}}, "files": []}},
      {{"commit": {{"message": "feat: old", "author": {{"name": "x", "date": "{}"}}}}, "author": {{"login": "ana"}}, "files": []}}
    ]"#,
    today.to_rfc3339(),
    old.to_rfc3339()
  );
  let commits: Vec<RawCommit> = serde_json::from_str(&json).unwrap();
  let aggs = analyze(&commits, &config);
  let daily = project(&aggs, Window::Daily, &now(), &config);
  assert_eq!(daily[0].commit_count(), 1);
  assert_eq!(daily[0].commit_messages(), &["feat: today"]);
}
