mod helpers;

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde_json::json;

use agentbench::adapters::{MockAgentRuntime, MockAgentScript, MockStateVerifier};
use agentbench::application::ScenarioExecutor;
use agentbench::domain::models::{
    AgentConfig, FailureCategory, Scenario, ScenarioCategory, ScenarioSuite, StateSnapshot,
    VerificationCheck,
};
use agentbench::domain::ports::{MetricsRepository, VerifierError};

use helpers::database::{setup_test_store, teardown_test_db};

fn text_check(needle: &'static str) -> VerificationCheck {
    VerificationCheck::new(format!("page text contains '{needle}'"), move |s: StateSnapshot| {
        async move { s.page_text_contains(needle) }.boxed()
    })
}

fn test_scenario() -> Scenario {
    Scenario::new(
        "t-001",
        "Test scenario",
        ScenarioCategory::Navigation,
        "open the page",
    )
    .with_verification(text_check("hello"))
    .with_timeout(Duration::from_secs(5))
}

fn snapshot_with_text(text: &str) -> StateSnapshot {
    StateSnapshot {
        page_text: text.to_string(),
        ..StateSnapshot::default()
    }
}

struct Fixture {
    runtime: MockAgentRuntime,
    verifier: MockStateVerifier,
    executor: ScenarioExecutor,
    store: Arc<agentbench::adapters::SqliteMetricsStore>,
    pool: sqlx::SqlitePool,
}

async fn fixture() -> Fixture {
    let (store, pool) = setup_test_store().await;
    let store = Arc::new(store);
    let runtime = MockAgentRuntime::new();
    let verifier = MockStateVerifier::new(snapshot_with_text("hello world"));
    let executor = ScenarioExecutor::new(
        Arc::new(runtime.clone()),
        Box::new(verifier.clone()),
        store.clone(),
        AgentConfig::default(),
        vec!["browser_navigate".to_string()],
    )
    .with_retry_delay(Duration::ZERO);
    Fixture {
        runtime,
        verifier,
        executor,
        store,
        pool,
    }
}

#[tokio::test]
async fn successful_run_passes_and_persists_one_result() {
    let f = fixture().await;

    let result = f.executor.run(&test_scenario()).await.expect("run failed");
    assert!(result.passed);
    assert_eq!(result.attempt, 1);
    assert!(result.failure_category.is_none());
    assert_eq!(result.verification_results.len(), 1);
    assert!(result.verification_results.values().all(|v| *v));

    let stored = f.store.recent_runs(Some("t-001"), 10).await.unwrap();
    assert_eq!(stored.len(), 1);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn infrastructure_failures_retry_and_persist_every_attempt() {
    let f = fixture().await;
    f.verifier
        .fail_next_captures(vec![
            VerifierError::Timeout {
                method: "list_tabs".to_string(),
            },
            VerifierError::Timeout {
                method: "list_tabs".to_string(),
            },
        ])
        .await;

    let scenario = test_scenario().with_max_attempts(2);
    let result = f.executor.run(&scenario).await.expect("run failed");

    assert!(!result.passed);
    assert_eq!(result.attempt, 2);
    assert_eq!(result.failure_category, Some(FailureCategory::Infrastructure));

    let stored = f.store.recent_runs(Some("t-001"), 10).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(f.runtime.invocations().await.len(), 2);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn infrastructure_failure_then_success_recovers() {
    let f = fixture().await;
    f.verifier
        .fail_next_captures(vec![VerifierError::ConnectionRefused(
            "endpoint down".to_string(),
        )])
        .await;

    let scenario = test_scenario().with_max_attempts(3);
    let result = f.executor.run(&scenario).await.expect("run failed");

    assert!(result.passed);
    assert_eq!(result.attempt, 2);

    let stored = f.store.recent_runs(Some("t-001"), 10).await.unwrap();
    assert_eq!(stored.len(), 2);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn agent_error_is_terminal() {
    let f = fixture().await;
    f.runtime
        .set_scripts(vec![MockAgentScript::agent_failure("model crashed")])
        .await;

    let scenario = test_scenario().with_max_attempts(3);
    let result = f.executor.run(&scenario).await.expect("run failed");

    assert!(!result.passed);
    assert_eq!(result.attempt, 1);
    assert_eq!(result.failure_category, Some(FailureCategory::AgentError));
    assert_eq!(result.error.as_deref(), Some("model crashed"));

    let stored = f.store.recent_runs(Some("t-001"), 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(f.runtime.invocations().await.len(), 1);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn verification_failure_is_terminal() {
    let f = fixture().await;
    f.verifier.set_snapshot(snapshot_with_text("goodbye")).await;

    let scenario = test_scenario().with_max_attempts(3);
    let result = f.executor.run(&scenario).await.expect("run failed");

    assert!(!result.passed);
    assert_eq!(
        result.failure_category,
        Some(FailureCategory::VerificationFailure)
    );
    assert!(result.verification_results.values().any(|v| !*v));

    let stored = f.store.recent_runs(Some("t-001"), 10).await.unwrap();
    assert_eq!(stored.len(), 1);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn missing_summary_classifies_as_agent_error() {
    let f = fixture().await;
    f.runtime
        .set_scripts(vec![MockAgentScript::no_summary()])
        .await;

    let result = f.executor.run(&test_scenario()).await.expect("run failed");

    assert!(!result.passed);
    assert_eq!(result.failure_category, Some(FailureCategory::AgentError));
    assert_eq!(result.error.as_deref(), Some("No result message"));

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn tool_calls_are_captured_and_correlated() {
    let f = fixture().await;
    f.runtime
        .set_scripts(vec![MockAgentScript::success()
            .with_tool_call("call-1", "browser_navigate", json!({"url": "https://example.com"}))
            .with_tool_result("call-1", json!({"ok": true}))
            .with_tool_call("call-2", "browser_get_page_text", json!({}))
            // Unknown call ids must be silently ignored.
            .with_tool_result("call-99", json!({"ignored": true}))])
        .await;

    let result = f.executor.run(&test_scenario()).await.expect("run failed");

    assert!(result.passed);
    assert_eq!(result.tool_call_count, 2);
    assert_eq!(
        result.tool_names_used,
        vec!["browser_navigate", "browser_get_page_text"]
    );
    assert_eq!(result.tool_call_trace.len(), 2);
    assert!(result.tool_call_trace[0]
        .result_preview
        .as_deref()
        .unwrap()
        .contains("ok"));
    assert!(result.tool_call_trace[1].result_preview.is_none());

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn duplicate_tool_names_are_deduplicated_in_order() {
    let f = fixture().await;
    f.runtime
        .set_scripts(vec![MockAgentScript::success()
            .with_tool_call("c1", "browser_navigate", json!({}))
            .with_tool_call("c2", "browser_click", json!({}))
            .with_tool_call("c3", "browser_navigate", json!({}))])
        .await;

    let result = f.executor.run(&test_scenario()).await.expect("run failed");
    assert_eq!(result.tool_call_count, 3);
    assert_eq!(result.tool_names_used, vec!["browser_navigate", "browser_click"]);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn run_suite_cleans_tabs_and_records_summary() {
    let f = fixture().await;

    let suite = ScenarioSuite {
        name: "mini".to_string(),
        description: "two scenarios".to_string(),
        scenarios: vec![
            test_scenario(),
            Scenario::new("t-002", "Second", ScenarioCategory::InfoExtraction, "read it")
                .with_verification(text_check("hello")),
        ],
    };

    let results = f.executor.run_suite(&suite).await.expect("suite failed");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.passed));
    assert_eq!(f.verifier.cleanup_calls().await, 2);

    let suite_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM suite_runs")
        .fetch_one(&f.pool)
        .await
        .expect("suite_runs query failed");
    assert_eq!(suite_rows, 1);

    teardown_test_db(f.pool).await;
}

#[tokio::test]
async fn scenario_timeout_classifies_as_infrastructure() {
    let (store, pool) = setup_test_store().await;
    let store = Arc::new(store);
    let runtime = MockAgentRuntime::new();

    // Verifier hangs long enough for the scenario timeout to fire first.
    let verifier = MockStateVerifier::new(snapshot_with_text("hello"));
    let executor = ScenarioExecutor::new(
        Arc::new(runtime),
        Box::new(verifier),
        store.clone(),
        AgentConfig::default(),
        Vec::new(),
    )
    .with_retry_delay(Duration::ZERO);

    let scenario = Scenario::new("t-003", "Slow", ScenarioCategory::Navigation, "wait")
        .with_timeout(Duration::from_millis(0))
        .with_max_attempts(1);

    let result = executor.run(&scenario).await.expect("run failed");
    assert!(!result.passed);
    assert_eq!(result.failure_category, Some(FailureCategory::Infrastructure));
    assert!(result.error.as_deref().unwrap().contains("timed out"));

    teardown_test_db(pool).await;
}
