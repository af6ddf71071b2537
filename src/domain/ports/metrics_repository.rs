//! Metrics repository port - durable storage of run and suite records.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{RunResult, SuiteRunRecord};

/// Trait for metrics persistence implementations.
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Append one run result, optionally tagged with a run group.
    async fn store(&self, result: &RunResult, run_group: Option<&str>) -> DomainResult<()>;

    /// Append one suite execution summary.
    async fn store_suite(&self, record: &SuiteRunRecord) -> DomainResult<()>;

    /// Most recent runs ordered by timestamp descending, optionally filtered
    /// by scenario.
    async fn recent_runs(
        &self,
        scenario_id: Option<&str>,
        last_n: u32,
    ) -> DomainResult<Vec<RunResult>>;

    /// Pass rate over the last N runs for a scenario, 0.0 when no runs exist.
    async fn pass_rate(&self, scenario_id: &str, last_n: u32) -> DomainResult<f64>;

    /// Costs of the last N runs in chronological (ascending) order.
    async fn cost_trend(&self, scenario_id: &str, last_n: u32) -> DomainResult<Vec<f64>>;
}
