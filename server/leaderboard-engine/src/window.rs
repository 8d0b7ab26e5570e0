//! Trailing time windows over full-history aggregates.

use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine;
use crate::types::ContributorAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
  Daily,
  Weekly,
  Monthly,
  Yearly,
  All,
}

impl Window {
  /// Unrecognized names fall back to `All`.
  pub fn parse_or_all(s: &str) -> Self {
    match s.to_ascii_lowercase().as_str() {
      "daily" => Self::Daily,
      "weekly" => Self::Weekly,
      "monthly" => Self::Monthly,
      "yearly" => Self::Yearly,
      _ => Self::All,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Daily => "daily",
      Self::Weekly => "weekly",
      Self::Monthly => "monthly",
      Self::Yearly => "yearly",
      Self::All => "all",
    }
  }

  /// First instant inside the window, or `None` for `All`.
  ///
  /// Calendar boundaries are taken in `now`'s offset: local midnight today,
  /// of the most recent Sunday, of the 1st of the month, of January 1.
  pub fn start(self, now: &DateTime<FixedOffset>) -> Option<DateTime<Utc>> {
    let today = now.date_naive();
    let first_day = match self {
      Self::Daily => today,
      Self::Weekly => today - Days::new(today.weekday().num_days_from_sunday() as u64),
      Self::Monthly => today - Days::new(today.day0() as u64),
      Self::Yearly => today - Days::new(today.ordinal0() as u64),
      Self::All => return None,
    };
    Some(local_midnight(first_day, now.offset()))
  }
}

fn local_midnight(day: NaiveDate, offset: &FixedOffset) -> DateTime<Utc> {
  let local = day.and_time(NaiveTime::default());
  (local - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
}

/// Rebuild each aggregate from only its in-window commits.
///
/// Change scores are re-summed from the retained commits' files, so a window
/// reflects only in-window diffs. Contributors with no in-window commits are
/// dropped. `All` returns the input unchanged. Input order is preserved.
pub fn project(
  aggregates: &[ContributorAggregate],
  window: Window,
  now: &DateTime<FixedOffset>,
  config: &Config,
) -> Vec<ContributorAggregate> {
  let start = match window.start(now) {
    Some(s) => s,
    None => return aggregates.to_vec(),
  };

  aggregates
    .iter()
    .filter_map(|agg| {
      let mut windowed = ContributorAggregate::new(agg.identity());
      for detail in agg.commit_details() {
        if detail.date.is_some_and(|d| d >= start) {
          windowed.record(detail.clone(), config);
        }
      }
      (windowed.commit_count() > 0).then_some(windowed)
    })
    .collect()
}

/// Project, then sort descending by overall score.
pub fn project_ranked(
  aggregates: &[ContributorAggregate],
  window: Window,
  now: &DateTime<FixedOffset>,
  config: &Config,
) -> Vec<ContributorAggregate> {
  let mut out = project(aggregates, window, now, config);
  engine::rank(&mut out, config);
  out
}
