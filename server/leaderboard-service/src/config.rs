//! Service configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use leaderboard_engine::Config as ScoringConfig;

use crate::error::ConfigError;

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
  /// Organization whose repositories are ranked.
  pub org: String,
  /// Root of the commit export directory read by `DirectorySource`.
  pub export_dir: PathBuf,
  pub port: u16,
  /// Bearer token accepted by the cron refresh route; `None` disables it.
  pub cron_secret: Option<String>,
  /// Lifetime of the cached full-history snapshot.
  pub cache_ttl: Duration,
  /// Upper bound on one repository fetch.
  pub fetch_timeout: Duration,
  /// Offset used for calendar window boundaries.
  pub utc_offset: FixedOffset,
  pub scoring: ScoringConfig,
}

impl ServiceConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Build from any variable lookup (the environment in production).
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let required = |name: &'static str| {
      lookup(name)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { name })
    };

    let org = required("GITHUB_OWNER")?;
    let export_dir = PathBuf::from(required("COMMIT_EXPORT_DIR")?);
    let port = parse_or(&lookup, "PORT", 5005u16)?;
    let cache_ttl = Duration::from_secs(parse_or(&lookup, "LEADERBOARD_TTL_SECS", 6 * 60 * 60u64)?);
    let fetch_timeout = Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 60u64)?);
    let offset_minutes: i32 = parse_or(&lookup, "LEADERBOARD_UTC_OFFSET_MINUTES", 0i32)?;
    let utc_offset = offset_minutes
      .checked_mul(60)
      .and_then(FixedOffset::east_opt)
      .ok_or_else(|| ConfigError::Invalid {
        name: "LEADERBOARD_UTC_OFFSET_MINUTES",
        reason: format!("offset out of range: {}", offset_minutes),
      })?;
    let cron_secret = lookup("CRON_SECRET").filter(|v| !v.is_empty());

    Ok(Self {
      org,
      export_dir,
      port,
      cron_secret,
      cache_ttl,
      fetch_timeout,
      utc_offset,
      scoring: ScoringConfig::default(),
    })
  }
}

fn parse_or<T>(
  lookup: &impl Fn(&str) -> Option<String>,
  name: &'static str,
  default: T,
) -> Result<T, ConfigError>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match lookup(name) {
    Some(raw) if !raw.is_empty() => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
      name,
      reason: e.to_string(),
    }),
    _ => Ok(default),
  }
}
