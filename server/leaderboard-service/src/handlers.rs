//! HTTP handlers for the leaderboard service.

use axum::{
  extract::{Path, Query, State},
  http::{header, HeaderMap, StatusCode},
  response::{IntoResponse, Response},
  routing::get,
  Json, Router,
};
use leaderboard_engine::{ContributorAggregate, Window};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::error::LeaderboardError;
use crate::state::AppState;
use crate::types::{LeaderboardEntry, MessageBody, Profile, RangeQuery, SuccessBody};

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/leaderboard", get(leaderboard_all))
    .route("/api/leaderboard/range", get(leaderboard_by_query))
    .route("/api/leaderboard/last-update", get(last_update))
    .route("/api/leaderboard/update", get(cron_update).post(update))
    .route("/api/leaderboard/:range", get(leaderboard_by_path))
    .route("/api/profile/:username", get(profile))
    .layer(CorsLayer::permissive())
    .with_state(state)
}

pub async fn health() -> &'static str {
  "ok"
}

pub async fn leaderboard_all(State(state): State<Arc<AppState>>) -> Response {
  ranked(&state, Window::All, false).await
}

pub async fn leaderboard_by_path(
  State(state): State<Arc<AppState>>,
  Path(range): Path<String>,
) -> Response {
  ranked(&state, Window::parse_or_all(&range), false).await
}

/// Same rows as the path variant, plus each contributor's commit details.
pub async fn leaderboard_by_query(
  State(state): State<Arc<AppState>>,
  Query(query): Query<RangeQuery>,
) -> Response {
  let window = query
    .range
    .as_deref()
    .map(Window::parse_or_all)
    .unwrap_or(Window::All);
  ranked(&state, window, true).await
}

async fn ranked(state: &AppState, window: Window, details: bool) -> Response {
  let leaders = match state.leaderboard.windowed(window).await {
    Ok(l) => l,
    Err(e) => return error_response(e),
  };
  let config = state.leaderboard.scoring();
  let rows: Vec<LeaderboardEntry> = leaders
    .iter()
    .map(|a| {
      if details {
        LeaderboardEntry::with_details(a, config)
      } else {
        LeaderboardEntry::summary(a, config)
      }
    })
    .collect();
  Json(rows).into_response()
}

pub async fn profile(
  State(state): State<Arc<AppState>>,
  Path(username): Path<String>,
) -> Response {
  let aggregate: ContributorAggregate = match state.leaderboard.contributor(&username).await {
    Ok(a) => a,
    Err(e) => return error_response(e),
  };
  Json(Profile::new(&aggregate, state.leaderboard.scoring())).into_response()
}

/// Epoch milliseconds of the last recompute, or `null`.
pub async fn last_update(State(state): State<Arc<AppState>>) -> Response {
  match state.leaderboard.last_updated().await {
    Ok(ts) => Json(ts.map(|t| t.timestamp_millis())).into_response(),
    Err(e) => error_response(e),
  }
}

pub async fn update(State(state): State<Arc<AppState>>) -> Response {
  match state.leaderboard.refresh().await {
    Ok(_) => Json(SuccessBody { success: true }).into_response(),
    Err(e) => error_response(e),
  }
}

/// Scheduled refresh; requires `Authorization: Bearer <CRON_SECRET>`.
pub async fn cron_update(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
  if !cron_authorized(state.cron_secret.as_deref(), &headers) {
    return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
  }
  update(State(state)).await
}

fn cron_authorized(secret: Option<&str>, headers: &HeaderMap) -> bool {
  let secret = match secret {
    Some(s) => s,
    None => return false,
  };
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .is_some_and(|token| token == secret)
}

pub fn status_for(e: &LeaderboardError) -> StatusCode {
  match e {
    LeaderboardError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    LeaderboardError::ContributorNotFound(_) => StatusCode::NOT_FOUND,
    _ => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn error_response(e: LeaderboardError) -> Response {
  let status = status_for(&e);
  let body = match &e {
    LeaderboardError::Unavailable { .. } => {
      warn!("{}", e);
      "Cannot fetch leaderboard now"
    }
    LeaderboardError::ContributorNotFound(_) => "User not found",
    _ => {
      error!("{}", e);
      "Internal error"
    }
  };
  (status, Json(MessageBody { body })).into_response()
}
