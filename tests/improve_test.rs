mod helpers;

use proptest::prelude::*;

use agentbench::domain::models::{FailureCategory, TaskCategory, TaskPriority};
use agentbench::services::FailureMiner;

use helpers::results::{failed_result, passed_result};

#[test]
fn repeated_connection_refusals_become_one_critical_task() {
    let batch = vec![
        failed_result("nav-001", FailureCategory::Infrastructure, "Connection refused"),
        failed_result("nav-002", FailureCategory::Infrastructure, "Connection refused"),
        failed_result("nav-003", FailureCategory::Infrastructure, "Connection refused"),
        passed_result("nav-004"),
    ];

    let patterns = FailureMiner::analyze_failures(&batch);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].pattern_name, "infrastructure:connection_refused");
    assert_eq!(patterns[0].frequency, 3);
    assert_eq!(
        patterns[0].affected_scenarios,
        vec!["nav-001", "nav-002", "nav-003"]
    );
    assert_eq!(patterns[0].example_errors.len(), 3);

    let tasks = FailureMiner::generate_tasks(&patterns);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, TaskPriority::Critical);
    assert_eq!(tasks[0].category, TaskCategory::TestInfra);
    assert_eq!(tasks[0].related_scenarios, patterns[0].affected_scenarios);
}

#[test]
fn distinct_signatures_produce_distinct_patterns_sorted_by_frequency() {
    let batch = vec![
        failed_result("a", FailureCategory::VerificationFailure, "text missing"),
        failed_result("b", FailureCategory::Infrastructure, "request timed out"),
        failed_result("c", FailureCategory::Infrastructure, "request timed out"),
    ];

    let patterns = FailureMiner::analyze_failures(&batch);
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].pattern_name, "infrastructure:timed_out");
    assert_eq!(patterns[0].frequency, 2);
    assert_eq!(patterns[1].frequency, 1);

    let tasks = FailureMiner::generate_tasks(&patterns);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].priority, TaskPriority::High);
    assert_eq!(tasks[1].priority, TaskPriority::Medium);
}

#[test]
fn frequency_ties_keep_first_seen_order() {
    let batch = vec![
        failed_result("a", FailureCategory::AgentError, "alpha problem"),
        failed_result("b", FailureCategory::AgentError, "beta problem"),
    ];

    let patterns = FailureMiner::analyze_failures(&batch);
    assert_eq!(patterns.len(), 2);
    assert!(patterns[0].pattern_name.ends_with("alpha problem"));
    assert!(patterns[1].pattern_name.ends_with("beta problem"));
}

#[test]
fn missing_error_text_uses_the_no_error_marker() {
    let mut result = failed_result("a", FailureCategory::AgentError, "");
    result.error = None;

    let patterns = FailureMiner::analyze_failures(&[result]);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].pattern_name, "agent_error:no_error");
    assert!(patterns[0].example_errors.is_empty());
}

#[test]
fn same_input_always_yields_identical_output() {
    let batch = vec![
        failed_result("a", FailureCategory::Infrastructure, "Connection refused"),
        failed_result("b", FailureCategory::VerificationFailure, "element index 4 missing"),
    ];

    let first = FailureMiner::analyze_failures(&batch);
    let second = FailureMiner::analyze_failures(&batch);
    let names_first: Vec<_> = first.iter().map(|p| &p.pattern_name).collect();
    let names_second: Vec<_> = second.iter().map(|p| &p.pattern_name).collect();
    assert_eq!(names_first, names_second);

    let hyp_first: Vec<_> = first.iter().map(|p| &p.root_cause_hypothesis).collect();
    let hyp_second: Vec<_> = second.iter().map(|p| &p.root_cause_hypothesis).collect();
    assert_eq!(hyp_first, hyp_second);

    // Tasks must be identical too, ids included.
    let tasks_first = FailureMiner::generate_tasks(&first);
    let tasks_second = FailureMiner::generate_tasks(&second);
    assert_eq!(
        serde_json::to_value(&tasks_first).unwrap(),
        serde_json::to_value(&tasks_second).unwrap()
    );
    let ids: Vec<_> = tasks_first.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["imp-001", "imp-002"]);
}

proptest! {
    #[test]
    fn fallback_signatures_never_exceed_fifty_chars(error in "[ -~]{0,200}") {
        let result = failed_result("prop", FailureCategory::AgentError, &error);
        let patterns = FailureMiner::analyze_failures(&[result]);
        prop_assert_eq!(patterns.len(), 1);

        let signature = patterns[0]
            .pattern_name
            .split_once(':')
            .map(|(_, s)| s.to_string())
            .unwrap_or_default();
        prop_assert!(signature.chars().count() <= 50);
        prop_assert_eq!(signature.clone(), signature.to_lowercase());
    }
}
