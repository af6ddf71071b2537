//! Adapters implementing the domain ports.

pub mod mock;
pub mod sqlite;

pub use mock::{MockAgentRuntime, MockAgentScript, MockStateVerifier};
pub use sqlite::SqliteMetricsStore;
