//! Structured error types for the scoring engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("parse: {0}")]
  Parse(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl EngineError {
  pub fn parse(msg: impl Into<String>) -> Self {
    Self::Parse(msg.into())
  }
}
