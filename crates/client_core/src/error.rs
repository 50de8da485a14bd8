use shared::domain::FoodId;
use thiserror::Error;

/// Failures surfaced by a [`crate::StateSource`]. None are fatal to the
/// session; the interaction layer shows the message and keeps the last
/// rendered state on screen.
#[derive(Debug, Error)]
pub enum StateSourceError {
    /// Network/transport failure before any response arrived.
    #[error("failed to reach the checklist service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status. `message` carries the
    /// body's `message`/`error` text, or an HTTP-status default.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose payload did not parse as the expected shape.
    #[error("malformed response from checklist service: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Local fallback only: the requested item does not exist.
    #[error("food '{0}' not found")]
    FoodNotFound(FoodId),

    /// Local fallback plumbing (sqlite read/write) failed.
    #[error("local checklist store failed: {0}")]
    Storage(#[source] anyhow::Error),
}
