//! Derived suite report types. Computed on demand, never stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate stats for one scenario category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: u32,
    pub passed: u32,
    pub cost_usd: f64,
    pub duration_ms: i64,
}

impl CategoryStats {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.passed) / f64::from(self.total)
        }
    }
}

/// One entry of the report's failure listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetail {
    pub scenario_id: String,
    pub scenario_name: String,
    pub failure_category: Option<String>,
    pub error: Option<String>,
    pub verification_results: BTreeMap<String, bool>,
    pub tool_call_count: u32,
}

/// A scenario that historically passed but failed in the current batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regression {
    pub scenario_id: String,
    pub historical_pass_rate: f64,
    pub error: Option<String>,
}

/// Summary report for one batch of run results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite_name: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub pass_rate: f64,
    pub total_cost_usd: f64,
    pub total_duration_ms: i64,
    pub avg_cost_per_scenario: f64,
    pub avg_duration_per_scenario_ms: f64,
    pub by_category: BTreeMap<String, CategoryStats>,
    pub failures: Vec<FailureDetail>,
    pub regressions: Vec<Regression>,
}
