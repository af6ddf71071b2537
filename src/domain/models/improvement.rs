//! Failure-pattern mining and improvement-task types.
//!
//! These are derived fresh from a result batch on each analysis run and are
//! never persisted.

use serde::{Deserialize, Serialize};

/// A recurring failure grouping keyed by `failure_category:error_signature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailurePattern {
    pub pattern_name: String,
    pub frequency: u32,
    pub affected_scenarios: Vec<String>,
    /// Up to 3 example error strings.
    pub example_errors: Vec<String>,
    pub root_cause_hypothesis: String,
}

/// Remediation area a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    PromptEngineering,
    ToolDesign,
    AutomationServer,
    AgentBehavior,
    TestInfra,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromptEngineering => "prompt_engineering",
            Self::ToolDesign => "tool_design",
            Self::AutomationServer => "automation_server",
            Self::AgentBehavior => "agent_behavior",
            Self::TestInfra => "test_infra",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority derived from pattern frequency: >=3 critical, >=2 high, else medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub fn from_frequency(frequency: u32) -> Self {
        if frequency >= 3 {
            Self::Critical
        } else if frequency >= 2 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete remediation task generated from a failure pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub related_scenarios: Vec<String>,
    pub suggested_changes: Vec<String>,
    pub estimated_impact: String,
}
