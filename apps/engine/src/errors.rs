#![allow(dead_code)]

use thiserror::Error;

/// Application-level error type.
///
/// Every failure in the engine converts to UI-visible state at the boundary
/// where it occurs; nothing here is fatal. Handlers that must stay infallible
/// (draft load, history list) log and fall back instead of returning this.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("No credits remaining")]
    NoCredits,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
