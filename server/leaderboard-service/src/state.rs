//! Shared handler state.

use crate::leaderboard::Leaderboard;

pub struct AppState {
  pub leaderboard: Leaderboard,
  /// Bearer token for the cron refresh route.
  pub cron_secret: Option<String>,
}
