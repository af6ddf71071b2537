use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use agentbench::domain::models::{FailureCategory, RunResult};

/// A passing run result with plausible defaults.
pub fn passed_result(scenario_id: &str) -> RunResult {
    RunResult {
        scenario_id: scenario_id.to_string(),
        scenario_name: format!("Scenario {scenario_id}"),
        category: "navigation".to_string(),
        passed: true,
        attempt: 1,
        total_cost_usd: Some(0.01),
        duration_ms: 1500,
        num_turns: 3,
        tool_call_count: 2,
        tool_names_used: vec!["browser_create_tab".to_string()],
        verification_results: BTreeMap::from([("page loaded".to_string(), true)]),
        error: None,
        failure_category: None,
        timestamp: Utc::now(),
        tool_call_trace: Vec::new(),
        agent_response: Some("done".to_string()),
    }
}

/// A failed run result with the given category and error text.
pub fn failed_result(scenario_id: &str, category: FailureCategory, error: &str) -> RunResult {
    let mut result = passed_result(scenario_id);
    result.passed = false;
    result.failure_category = Some(category);
    result.error = Some(error.to_string());
    result.verification_results = BTreeMap::from([("page loaded".to_string(), false)]);
    result.agent_response = None;
    result
}

/// Shift a result's timestamp so ordering-sensitive queries are deterministic.
pub fn at_offset_secs(mut result: RunResult, secs: i64) -> RunResult {
    result.timestamp = Utc::now() + Duration::seconds(secs);
    result
}
