//! State verifier port - interface to the browser automation endpoint.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::StateSnapshot;

/// Errors from the verification client.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// Transport-level failure (closed socket, send/receive error).
    /// Retried exactly once per command via reconnect.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Connection attempt was refused outright.
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// The endpoint returned an error response for a command.
    /// Logical failure, never retried.
    #[error("{method} error: {message}")]
    Command { method: String, message: String },

    /// No response carrying our correlation id arrived within the bounded
    /// number of receive attempts.
    #[error("{method}: no matching response after {attempts} messages")]
    NoMatchingResponse { method: String, attempts: u32 },

    /// Timed out awaiting any response frame.
    #[error("{method}: timed out awaiting response")]
    Timeout { method: String },
}

impl From<VerifierError> for crate::domain::errors::DomainError {
    fn from(err: VerifierError) -> Self {
        use crate::domain::errors::DomainError;
        match err {
            VerifierError::ConnectionRefused(m) => DomainError::ConnectionRefused(m),
            VerifierError::Timeout { .. } => DomainError::CommandTimeout(err.to_string()),
            other => DomainError::Verification(other.to_string()),
        }
    }
}

/// Trait for browser-state verification clients.
#[async_trait]
pub trait StateVerifier: Send + Sync {
    /// Capture a merged browser-state snapshot for predicate evaluation.
    async fn capture_state(&mut self) -> Result<StateSnapshot, VerifierError>;

    /// Best-effort close of every open tab, isolating scenarios from each
    /// other's residual state. Individual close failures are tolerated.
    async fn cleanup_tabs(&mut self) -> Result<(), VerifierError>;

    /// Close the underlying connection.
    async fn close(&mut self);
}
