//! Application layer: use-case orchestration.

pub mod scenario_executor;

pub use scenario_executor::ScenarioExecutor;
