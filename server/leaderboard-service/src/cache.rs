//! Key-value cache port, an in-process TTL store, and the typed snapshot cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use leaderboard_engine::ContributorAggregate;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{LeaderboardError, StoreError};

/// Key holding the full, unfiltered, ranked snapshot.
pub const LEADERS_KEY: &str = "leaders";
/// Key holding the epoch-milliseconds time of the last recompute.
pub const LAST_UPDATE_KEY: &str = "lastUpdate";

/// Byte-oriented key-value store with optional per-key expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

  /// Replace the value under `key`. `ttl: None` never expires.
  async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), StoreError>;
}

struct Entry {
  value: Vec<u8>,
  expires_at: Option<Instant>,
}

/// In-process store. Expired entries read as misses and are dropped lazily.
#[derive(Default)]
pub struct MemoryStore {
  entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl CacheStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
    let now = Instant::now();
    {
      let entries = self.entries.read().await;
      match entries.get(key) {
        None => return Ok(None),
        Some(e) if e.expires_at.map_or(true, |t| t > now) => return Ok(Some(e.value.clone())),
        Some(_) => {}
      }
    }
    let mut entries = self.entries.write().await;
    if entries
      .get(key)
      .is_some_and(|e| e.expires_at.is_some_and(|t| t <= now))
    {
      debug!("{} expired", key);
      entries.remove(key);
    }
    Ok(None)
  }

  async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<(), StoreError> {
    let expires_at = ttl.map(|t| Instant::now() + t);
    self
      .entries
      .write()
      .await
      .insert(key.to_string(), Entry { value, expires_at });
    Ok(())
  }
}

/// Typed view over a `CacheStore` for the leaderboard snapshot.
///
/// Every write replaces the whole snapshot. There is no lock across
/// read-then-write, so concurrent misses may each recompute; the last write wins.
#[derive(Clone)]
pub struct AggregateCache {
  store: Arc<dyn CacheStore>,
  ttl: Duration,
}

impl AggregateCache {
  pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
    Self { store, ttl }
  }

  /// Cached snapshot, or `None` on a miss. A corrupt payload counts as a miss.
  pub async fn get(&self) -> Result<Option<Vec<ContributorAggregate>>, StoreError> {
    let bytes = match self.store.get(LEADERS_KEY).await? {
      Some(b) => b,
      None => return Ok(None),
    };
    match serde_json::from_slice(&bytes) {
      Ok(leaders) => Ok(Some(leaders)),
      Err(e) => {
        warn!("discarding corrupt {} payload: {}", LEADERS_KEY, e);
        Ok(None)
      }
    }
  }

  /// Write the snapshot with the configured TTL.
  pub async fn set(&self, leaders: &[ContributorAggregate]) -> Result<(), LeaderboardError> {
    let bytes = serde_json::to_vec(leaders)?;
    self.store.set(LEADERS_KEY, bytes, Some(self.ttl)).await?;
    Ok(())
  }

  pub async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
    let bytes = match self.store.get(LAST_UPDATE_KEY).await? {
      Some(b) => b,
      None => return Ok(None),
    };
    let millis = std::str::from_utf8(&bytes)
      .ok()
      .and_then(|s| s.trim().parse::<i64>().ok());
    match millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
      Some(ts) => Ok(Some(ts)),
      None => {
        warn!("discarding corrupt {} payload", LAST_UPDATE_KEY);
        Ok(None)
      }
    }
  }

  pub async fn set_last_updated(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
    let bytes = at.timestamp_millis().to_string().into_bytes();
    self.store.set(LAST_UPDATE_KEY, bytes, None).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn memory_store_round_trip() {
    let store = MemoryStore::new();
    assert!(store.get("k").await.unwrap().is_none());
    store.set("k", b"v1".to_vec(), None).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some(&b"v1"[..]));
    store.set("k", b"v2".to_vec(), None).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some(&b"v2"[..]));
  }

  #[tokio::test]
  async fn memory_store_expires_entries() {
    let store = MemoryStore::new();
    store
      .set("k", b"v".to_vec(), Some(Duration::from_millis(20)))
      .await
      .unwrap();
    assert!(store.get("k").await.unwrap().is_some());
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(store.get("k").await.unwrap().is_none());
    assert!(store.entries.read().await.is_empty());
  }

  #[tokio::test]
  async fn corrupt_snapshot_is_a_miss() {
    let store = Arc::new(MemoryStore::new());
    store.set(LEADERS_KEY, b"{not json".to_vec(), None).await.unwrap();
    let cache = AggregateCache::new(store, Duration::from_secs(60));
    assert!(cache.get().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn empty_snapshot_is_a_hit() {
    let cache = AggregateCache::new(Arc::new(MemoryStore::new()), Duration::from_secs(60));
    cache.set(&[]).await.unwrap();
    assert_eq!(cache.get().await.unwrap(), Some(vec![]));
  }

  #[tokio::test]
  async fn last_updated_round_trip() {
    let cache = AggregateCache::new(Arc::new(MemoryStore::new()), Duration::from_secs(60));
    assert!(cache.last_updated().await.unwrap().is_none());
    let at = Utc.with_ymd_and_hms(2025, 10, 15, 8, 0, 0).unwrap();
    cache.set_last_updated(at).await.unwrap();
    assert_eq!(cache.last_updated().await.unwrap(), Some(at));
  }
}
