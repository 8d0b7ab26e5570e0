//! Binary entrypoint for the leaderboard service.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use leaderboard_service::{
  router, AggregateCache, AppState, DirectorySource, Leaderboard, MemoryStore, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = ServiceConfig::from_env()?;

  let source = Arc::new(DirectorySource::new(&config.export_dir, &config.org));
  let cache = AggregateCache::new(Arc::new(MemoryStore::new()), config.cache_ttl);
  let leaderboard = Leaderboard::new(source, cache, &config.org, config.scoring.clone())
    .with_fetch_timeout(config.fetch_timeout)
    .with_utc_offset(config.utc_offset);

  let state = Arc::new(AppState {
    leaderboard,
    cron_secret: config.cron_secret.clone(),
  });
  let app = router(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
  info!("leaderboard-service listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
