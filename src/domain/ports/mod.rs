//! Ports (trait seams) between the orchestration core and its collaborators.

pub mod agent_runtime;
pub mod metrics_repository;
pub mod state_verifier;

pub use agent_runtime::{AgentEvent, AgentInvocationOptions, AgentRuntime};
pub use metrics_repository::MetricsRepository;
pub use state_verifier::{StateVerifier, VerifierError};
