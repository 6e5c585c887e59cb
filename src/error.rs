//! Error types and the append-only session error log
//!
//! Nothing inside the frame update or effect dispatch is allowed to take the
//! game loop down. Failures are converted to [`GameError`] at the boundary and
//! appended to an [`ErrorLog`] instead of being returned to the driver.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Touch input that cannot be turned into a launch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("swipe duration must be positive (got {duration_ms} ms)")]
    NonPositiveSwipeDuration { duration_ms: f64 },
    #[error("force sample {force} is not a finite number")]
    InvalidForce { force: f32 },
}

/// Smart-light failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LightError {
    #[error("smart-light bridge is not connected")]
    NotConnected,
    #[error("light command failed: {0}")]
    Command(String),
    #[error("light worker stopped before replying")]
    WorkerGone,
}

/// Settings store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure the session can record
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Light(#[from] LightError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed color identifier {0:?}")]
    Color(String),
    #[error("non-finite flight state at ({x}, {y})")]
    NonFiniteFlight { x: f32, y: f32 },
}

/// A single logged failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Session clock (seconds) when the failure was recorded
    pub at: f64,
    pub message: String,
}

/// In-memory, timestamped, append-only error log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure. Also forwarded to the `log` facade at warn level.
    pub fn record(&mut self, at: f64, error: impl std::fmt::Display) {
        let message = error.to_string();
        log::warn!("[{:.3}s] {}", at, message);
        self.entries.push(ErrorEntry { at, message });
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the log as text, one blank line between entries
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{:.3}: {}", e.at, e.message))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
