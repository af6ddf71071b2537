//! Per-attempt execution records and the persisted run summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a scenario attempt failed. Mutually exclusive, assigned once per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The agent runtime reported failure or an unclassified error occurred.
    AgentError,
    /// The agent completed cleanly but post-condition checks failed.
    VerificationFailure,
    /// Timeout or connection-level failure reaching the endpoint or runtime.
    Infrastructure,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgentError => "agent_error",
            Self::VerificationFailure => "verification_failure",
            Self::Infrastructure => "infrastructure",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "agent_error" => Some(Self::AgentError),
            "verification_failure" => Some(Self::VerificationFailure),
            "infrastructure" => Some(Self::Infrastructure),
            _ => None,
        }
    }

    /// Only infrastructure failures are eligible for automatic retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure)
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a single tool invocation captured from the agent stream.
///
/// Owned exclusively by the `ScenarioRun` that created it; the result payload
/// is attached later when the matching tool-result event arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub tool_input: Value,
    pub tool_result: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl ToolCallRecord {
    pub fn new(tool_name: impl Into<String>, tool_input: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input,
            tool_result: None,
            timestamp: Utc::now(),
        }
    }
}

/// Full mutable record of one scenario attempt. Folded into a `RunResult`
/// when the attempt finishes and then discarded.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub scenario_id: String,
    pub attempt: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub tool_calls: Vec<ToolCallRecord>,
    pub summary: Option<AgentSummary>,
    pub verification_results: BTreeMap<String, bool>,
    pub error: Option<String>,
    pub failure_category: Option<FailureCategory>,
}

impl ScenarioRun {
    pub fn start(scenario_id: impl Into<String>, attempt: u32) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            attempt,
            started_at: Utc::now(),
            ended_at: None,
            tool_calls: Vec::new(),
            summary: None,
            verification_results: BTreeMap::new(),
            error: None,
            failure_category: None,
        }
    }

    pub fn fail(&mut self, category: FailureCategory, error: impl Into<String>) {
        self.failure_category = Some(category);
        self.error = Some(error.into());
    }

    pub fn duration_ms(&self) -> i64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_milliseconds()
    }
}

/// Terminal summary event from the agent runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub duration_ms: i64,
    pub num_turns: u32,
    pub total_cost_usd: Option<f64>,
    pub is_error: bool,
    pub result: Option<String>,
    pub session_id: Option<String>,
}

/// One entry of the serialized tool-call trace kept for later inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallTraceEntry {
    pub tool: String,
    pub input: Value,
    pub result_preview: Option<String>,
    pub timestamp: DateTime<Utc>,
}

const RESULT_PREVIEW_MAX: usize = 500;

impl From<&ToolCallRecord> for ToolCallTraceEntry {
    fn from(record: &ToolCallRecord) -> Self {
        let result_preview = record.tool_result.as_ref().map(|v| {
            let text = v.to_string();
            text.chars().take(RESULT_PREVIEW_MAX).collect()
        });
        Self {
            tool: record.tool_name.clone(),
            input: record.tool_input.clone(),
            result_preview,
            timestamp: record.timestamp,
        }
    }
}

/// Immutable, denormalized summary of one attempt. One `RunResult` is
/// persisted per attempt that actually executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub scenario_id: String,
    pub scenario_name: String,
    pub category: String,
    pub passed: bool,
    pub attempt: u32,
    pub total_cost_usd: Option<f64>,
    pub duration_ms: i64,
    pub num_turns: u32,
    pub tool_call_count: u32,
    pub tool_names_used: Vec<String>,
    pub verification_results: BTreeMap<String, bool>,
    pub error: Option<String>,
    pub failure_category: Option<FailureCategory>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tool_call_trace: Vec<ToolCallTraceEntry>,
    pub agent_response: Option<String>,
}

/// Persisted summary of one suite execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteRunRecord {
    pub id: uuid::Uuid,
    pub suite_name: String,
    pub total_scenarios: u32,
    pub passed: u32,
    pub failed: u32,
    pub total_cost_usd: f64,
    pub total_duration_ms: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_category_round_trips() {
        for cat in [
            FailureCategory::AgentError,
            FailureCategory::VerificationFailure,
            FailureCategory::Infrastructure,
        ] {
            assert_eq!(FailureCategory::from_str(cat.as_str()), Some(cat));
        }
        assert_eq!(FailureCategory::from_str("bogus"), None);
    }

    #[test]
    fn only_infrastructure_is_retryable() {
        assert!(FailureCategory::Infrastructure.is_retryable());
        assert!(!FailureCategory::AgentError.is_retryable());
        assert!(!FailureCategory::VerificationFailure.is_retryable());
    }

    #[test]
    fn trace_entry_caps_result_preview() {
        let mut record = ToolCallRecord::new("browser_get_dom", serde_json::json!({}));
        record.tool_result = Some(serde_json::Value::String("x".repeat(2000)));
        let entry = ToolCallTraceEntry::from(&record);
        assert_eq!(entry.result_preview.unwrap().len(), 500);
    }
}
