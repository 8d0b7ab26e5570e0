//! Change score (logistic per-file curve) and overall score.

use crate::config::Config;
use crate::noise;
use crate::types::FileChange;

/// L / (1 + e^(-k (x - x0)))
fn logistic(max: f64, steepness: f64, midpoint: f64, x: f64) -> f64 {
  max / (1.0 + (-steepness * (x - midpoint)).exp())
}

/// Score for one file change, in `(0, logistic_max)`.
///
/// Additions below the low-effort threshold collapse to a small constant so
/// trivial one-line commits score almost nothing. The curve grows roughly
/// linearly around the midpoint and saturates for very large diffs; in f64 it
/// rounds to exactly `logistic_max` a few thousand lines past the midpoint.
pub fn file_change_score(additions: u32, deletions: u32, config: &Config) -> f64 {
  let effective_additions = if additions < config.low_effort_threshold {
    config.low_effort_penalty
  } else {
    additions as f64
  };
  let magnitude =
    effective_additions * config.addition_weight + deletions as f64 * config.deletion_weight;
  logistic(
    config.logistic_max,
    config.logistic_steepness,
    config.logistic_midpoint,
    magnitude,
  )
}

/// Sum of file change scores over a commit's files, skipping noise paths.
pub fn commit_change_score(files: &[FileChange], config: &Config) -> f64 {
  files
    .iter()
    .filter(|f| !noise::is_noise(&f.filename))
    .map(|f| file_change_score(f.additions, f.deletions, config))
    .sum()
}

/// Commit volume dominates; log10 compresses the change score's influence.
pub fn overall_score(commit_count: usize, change_score: f64, config: &Config) -> f64 {
  commit_count as f64 * config.commit_weight
    + (change_score + 1.0).log10() * config.change_score_weight
}
