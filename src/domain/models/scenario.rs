//! Scenario and suite definitions.
//!
//! A scenario is static configuration: a natural-language prompt driving the
//! agent plus declarative checks evaluated against the browser state after
//! the agent finishes. Scenarios are built once by the catalog and never
//! mutated during execution.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::snapshot::StateSnapshot;

/// Functional category of a scenario, used for report breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioCategory {
    Navigation,
    FormFilling,
    InfoExtraction,
    MultiStep,
    TabManagement,
    ErrorRecovery,
    Workspace,
}

impl ScenarioCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::FormFilling => "form_filling",
            Self::InfoExtraction => "info_extraction",
            Self::MultiStep => "multi_step",
            Self::TabManagement => "tab_management",
            Self::ErrorRecovery => "error_recovery",
            Self::Workspace => "workspace",
        }
    }
}

impl fmt::Display for ScenarioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Async boolean predicate over a captured browser-state snapshot.
pub type CheckFn = Arc<dyn Fn(StateSnapshot) -> BoxFuture<'static, bool> + Send + Sync>;

/// Async setup/teardown hook run around a scenario attempt.
pub type HookFn = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// A single named assertion about browser state after the scenario.
#[derive(Clone)]
pub struct VerificationCheck {
    pub description: String,
    pub check: CheckFn,
}

impl VerificationCheck {
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(StateSnapshot) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            check: Arc::new(check),
        }
    }
}

impl fmt::Debug for VerificationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationCheck")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A benchmark scenario definition.
#[derive(Clone)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub category: ScenarioCategory,
    pub prompt: String,

    /// Ordered post-condition checks; all must pass for the run to pass.
    pub verifications: Vec<VerificationCheck>,

    // Guardrails enforced by the agent runtime.
    pub max_turns: u32,
    pub max_budget_usd: f64,
    pub timeout: Duration,
    pub max_attempts: u32,

    pub setup: Option<HookFn>,
    pub teardown: Option<HookFn>,

    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub append_system_prompt: Option<String>,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("verifications", &self.verifications.len())
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl Scenario {
    /// Create a scenario with default guardrails (20 turns, $0.50, 120s, 2 attempts).
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ScenarioCategory,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            prompt: prompt.into(),
            verifications: Vec::new(),
            max_turns: 20,
            max_budget_usd: 0.50,
            timeout: Duration::from_secs(120),
            max_attempts: 2,
            setup: None,
            teardown: None,
            tags: Vec::new(),
            difficulty: Difficulty::Medium,
            append_system_prompt: None,
        }
    }

    #[must_use]
    pub fn with_verification(mut self, check: VerificationCheck) -> Self {
        self.verifications.push(check);
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    #[must_use]
    pub fn with_budget(mut self, budget_usd: f64) -> Self {
        self.max_budget_usd = budget_usd;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A collection of scenarios run together.
#[derive(Debug, Clone)]
pub struct ScenarioSuite {
    pub name: String,
    pub description: String,
    pub scenarios: Vec<Scenario>,
}
