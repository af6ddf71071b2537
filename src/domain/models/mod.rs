//! Domain models for benchmark orchestration.

pub mod config;
pub mod improvement;
pub mod report;
pub mod run;
pub mod scenario;
pub mod snapshot;

pub use config::{AgentConfig, BrowserConfig, Config, DatabaseConfig, LoggingConfig};
pub use improvement::{FailurePattern, ImprovementTask, TaskCategory, TaskPriority};
pub use report::{CategoryStats, FailureDetail, Regression, SuiteReport};
pub use run::{
    AgentSummary, FailureCategory, RunResult, ScenarioRun, SuiteRunRecord, ToolCallRecord,
    ToolCallTraceEntry,
};
pub use scenario::{
    CheckFn, Difficulty, HookFn, Scenario, ScenarioCategory, ScenarioSuite, VerificationCheck,
};
pub use snapshot::StateSnapshot;
