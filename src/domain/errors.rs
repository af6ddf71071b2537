//! Domain errors for the agentbench orchestrator.

use thiserror::Error;

/// Domain-level errors that can occur while orchestrating benchmark runs.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Agent runtime error: {0}")]
    AgentRuntime(String),

    #[error("Scenario timed out after {0}s")]
    ScenarioTimeout(u64),

    #[error("Verification command timed out: {0}")]
    CommandTimeout(String),

    #[error("Connection refused by automation endpoint: {0}")]
    ConnectionRefused(String),

    #[error("Verification error: {0}")]
    Verification(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
