//! Mock agent runtime and state verifier for testing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentSummary, StateSnapshot};
use crate::domain::ports::{
    AgentEvent, AgentInvocationOptions, AgentRuntime, StateVerifier, VerifierError,
};

/// Scripted response for one mock agent invocation.
#[derive(Debug, Clone)]
pub struct MockAgentScript {
    /// Tool events to emit before the summary, in order.
    pub events: Vec<AgentEvent>,
    /// Terminal summary; `None` simulates a stream that dies mid-flight.
    pub summary: Option<AgentSummary>,
    /// Simulate a runtime-level invocation failure instead of a stream.
    pub invoke_error: Option<String>,
}

impl Default for MockAgentScript {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            summary: Some(AgentSummary {
                duration_ms: 1200,
                num_turns: 3,
                total_cost_usd: Some(0.01),
                is_error: false,
                result: Some("done".to_string()),
                session_id: Some("mock-session".to_string()),
            }),
            invoke_error: None,
        }
    }
}

impl MockAgentScript {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn agent_failure(message: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            summary: Some(AgentSummary {
                duration_ms: 800,
                num_turns: 1,
                total_cost_usd: Some(0.005),
                is_error: true,
                result: Some(message.into()),
                session_id: None,
            }),
            invoke_error: None,
        }
    }

    /// Stream that ends without ever yielding a completion summary.
    pub fn no_summary() -> Self {
        Self {
            events: Vec::new(),
            summary: None,
            invoke_error: None,
        }
    }

    pub fn invoke_failure(message: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            summary: None,
            invoke_error: Some(message.into()),
        }
    }

    #[must_use]
    pub fn with_tool_call(mut self, id: &str, name: &str, input: Value) -> Self {
        self.events.push(AgentEvent::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        });
        self
    }

    #[must_use]
    pub fn with_tool_result(mut self, id: &str, output: Value) -> Self {
        self.events.push(AgentEvent::ToolResult {
            id: id.to_string(),
            output,
        });
        self
    }
}

/// Mock agent runtime that replays scripted event streams.
///
/// Scripts queue per prompt-independent invocation order; `set_scripts`
/// replaces the queue. With an empty queue every invocation succeeds with the
/// default script.
#[derive(Clone)]
pub struct MockAgentRuntime {
    scripts: Arc<Mutex<Vec<MockAgentScript>>>,
    invocations: Arc<Mutex<Vec<String>>>,
}

impl MockAgentRuntime {
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(Vec::new())),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn set_scripts(&self, scripts: Vec<MockAgentScript>) {
        *self.scripts.lock().await = scripts;
    }

    /// Prompts received so far, in invocation order.
    pub async fn invocations(&self) -> Vec<String> {
        self.invocations.lock().await.clone()
    }
}

impl Default for MockAgentRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentRuntime for MockAgentRuntime {
    async fn invoke(
        &self,
        prompt: &str,
        _options: &AgentInvocationOptions,
    ) -> DomainResult<mpsc::Receiver<AgentEvent>> {
        self.invocations.lock().await.push(prompt.to_string());

        let script = {
            let mut scripts = self.scripts.lock().await;
            if scripts.is_empty() {
                MockAgentScript::default()
            } else {
                scripts.remove(0)
            }
        };

        if let Some(message) = script.invoke_error {
            return Err(DomainError::AgentRuntime(message));
        }

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(async move {
            for event in script.events {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            if let Some(summary) = script.summary {
                let _ = tx.send(AgentEvent::Completed(summary)).await;
            }
        });

        Ok(rx)
    }
}

/// Mock state verifier with a configurable snapshot and failure injection.
#[derive(Clone)]
pub struct MockStateVerifier {
    snapshot: Arc<RwLock<StateSnapshot>>,
    /// Errors returned by the next `capture_state` calls, consumed in order.
    capture_errors: Arc<Mutex<Vec<VerifierError>>>,
    cleanup_calls: Arc<Mutex<u32>>,
}

impl MockStateVerifier {
    pub fn new(snapshot: StateSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            capture_errors: Arc::new(Mutex::new(Vec::new())),
            cleanup_calls: Arc::new(Mutex::new(0)),
        }
    }

    pub async fn set_snapshot(&self, snapshot: StateSnapshot) {
        *self.snapshot.write().await = snapshot;
    }

    pub async fn fail_next_captures(&self, errors: Vec<VerifierError>) {
        *self.capture_errors.lock().await = errors;
    }

    pub async fn cleanup_calls(&self) -> u32 {
        *self.cleanup_calls.lock().await
    }
}

impl Default for MockStateVerifier {
    fn default() -> Self {
        Self::new(StateSnapshot::default())
    }
}

#[async_trait]
impl StateVerifier for MockStateVerifier {
    async fn capture_state(&mut self) -> Result<StateSnapshot, VerifierError> {
        let mut errors = self.capture_errors.lock().await;
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        Ok(self.snapshot.read().await.clone())
    }

    async fn cleanup_tabs(&mut self) -> Result<(), VerifierError> {
        *self.cleanup_calls.lock().await += 1;
        Ok(())
    }

    async fn close(&mut self) {}
}
