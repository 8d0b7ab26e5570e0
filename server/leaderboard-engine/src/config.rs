//! Scoring configuration with the leaderboard's published defaults.

/// Tunable constants for change and overall scoring.
#[derive(Debug, Clone)]
pub struct Config {
  /// Additions below this count are treated as low effort.
  pub low_effort_threshold: u32,
  /// Effective additions used for a low-effort file change.
  pub low_effort_penalty: f64,
  /// Weight of one added line in the change magnitude.
  pub addition_weight: f64,
  /// Weight of one deleted line in the change magnitude.
  pub deletion_weight: f64,
  /// Logistic curve maximum (upper bound of a file change score).
  pub logistic_max: f64,
  /// Logistic growth rate (steepness).
  pub logistic_steepness: f64,
  /// Magnitude at which a file change scores half of `logistic_max`.
  pub logistic_midpoint: f64,
  /// Weight of one commit in the overall score.
  pub commit_weight: f64,
  /// Weight of log10(change_score + 1) in the overall score.
  pub change_score_weight: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      low_effort_threshold: 5,
      low_effort_penalty: 0.1,
      addition_weight: 1.0,
      deletion_weight: 0.25,
      logistic_max: 20.0,
      logistic_steepness: 0.01,
      logistic_midpoint: 160.0,
      commit_weight: 1.8,
      change_score_weight: 0.125,
    }
  }
}
