//! Agent runtime port - interface to the external agent that drives the browser.
//!
//! The orchestrator only consumes the runtime's event stream; it never defines
//! tool semantics. Budgets (turns, cost, timeout) are circuit breakers
//! enforced by the runtime itself.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::errors::DomainResult;
use crate::domain::models::AgentSummary;

/// Options passed to the agent runtime for one invocation.
#[derive(Debug, Clone)]
pub struct AgentInvocationOptions {
    /// Fixed allow-list of automation tool names.
    pub allowed_tools: Vec<String>,
    pub max_turns: u32,
    pub max_budget_usd: f64,
    pub permission_mode: String,
    pub working_dir: Option<String>,
    pub append_system_prompt: Option<String>,
}

/// Typed messages yielded by the agent runtime during one invocation.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// The agent invoked a tool. `id` is the runtime-issued call id.
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// Result of a prior tool invocation, correlated by call id.
    ToolResult { id: String, output: Value },
    /// Terminal summary; the stream ends after this.
    Completed(AgentSummary),
}

/// Trait for agent runtime implementations.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Start one agent invocation and return its event stream.
    ///
    /// The receiver yields tool-use and tool-result events as they happen and
    /// closes after the `Completed` summary (or after a runtime failure, in
    /// which case no summary arrives).
    async fn invoke(
        &self,
        prompt: &str,
        options: &AgentInvocationOptions,
    ) -> DomainResult<mpsc::Receiver<AgentEvent>>;
}
