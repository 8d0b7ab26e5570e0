//! Binary entrypoint: read a JSON array of commits from stdin, write the ranked leaderboard to stdout.
//!
//! Usage: leaderboard-engine [daily|weekly|monthly|yearly|all] [--utc-offset-minutes N]

use chrono::{FixedOffset, Utc};
use leaderboard_engine::{analyze, project_ranked, Config, EngineError, RawCommit, Window};
use serde::Serialize;
use std::io::{self, Read, Write};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a> {
  name: &'a str,
  avatar_url: &'a str,
  html_url: &'a str,
  commits: usize,
  change_score: f64,
  overall_score: f64,
}

fn main() {
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "leaderboard-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), EngineError> {
  let args: Vec<String> = std::env::args().skip(1).collect();
  let (window, offset) = parse_args(&args)?;

  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let commits: Vec<RawCommit> = serde_json::from_str(&raw)?;

  let config = Config::default();
  let aggregates = analyze(&commits, &config);
  let now = Utc::now().with_timezone(&offset);
  let ranked = project_ranked(&aggregates, window, &now, &config);

  let rows: Vec<Row> = ranked
    .iter()
    .map(|a| Row {
      name: &a.name,
      avatar_url: &a.avatar_url,
      html_url: &a.profile_url,
      commits: a.commit_count(),
      change_score: a.change_score(),
      overall_score: a.overall_score(&config),
    })
    .collect();

  let json = serde_json::to_vec(&rows)?;
  io::stdout().write_all(&json)?;
  Ok(())
}

fn parse_args(args: &[String]) -> Result<(Window, FixedOffset), EngineError> {
  let mut window = Window::All;
  let mut offset_minutes: i32 = 0;
  let mut iter = args.iter();
  while let Some(arg) = iter.next() {
    if arg == "--utc-offset-minutes" {
      let value = iter
        .next()
        .ok_or_else(|| EngineError::parse("--utc-offset-minutes needs a value"))?;
      offset_minutes = value
        .parse()
        .map_err(|e| EngineError::parse(format!("--utc-offset-minutes: {}", e)))?;
    } else {
      window = Window::parse_or_all(arg);
    }
  }
  let offset = offset_minutes
    .checked_mul(60)
    .and_then(FixedOffset::east_opt)
    .ok_or_else(|| EngineError::parse(format!("utc offset out of range: {}", offset_minutes)))?;
  Ok((window, offset))
}
