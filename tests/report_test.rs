mod helpers;

use agentbench::domain::models::FailureCategory;
use agentbench::domain::ports::MetricsRepository;
use agentbench::services::report::{self, ReportAggregator};

use helpers::database::{setup_test_store, teardown_test_db};
use helpers::results::{at_offset_secs, failed_result, passed_result};

#[tokio::test]
async fn empty_batch_yields_zero_totals() {
    let (store, pool) = setup_test_store().await;
    let aggregator = ReportAggregator::new(&store);

    let suite_report = aggregator.generate(&[], "empty").await.expect("generate failed");
    assert_eq!(suite_report.total, 0);
    assert_eq!(suite_report.passed, 0);
    assert_eq!(suite_report.pass_rate, 0.0);
    assert_eq!(suite_report.avg_cost_per_scenario, 0.0);
    assert!(suite_report.by_category.is_empty());
    assert!(suite_report.failures.is_empty());
    assert!(suite_report.regressions.is_empty());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn aggregates_by_category_with_costs() {
    let (store, pool) = setup_test_store().await;
    let aggregator = ReportAggregator::new(&store);

    let mut extraction = passed_result("ext-001");
    extraction.category = "info_extraction".to_string();
    extraction.total_cost_usd = Some(0.04);
    let batch = vec![
        passed_result("nav-001"),
        failed_result("nav-002", FailureCategory::AgentError, "boom"),
        extraction,
    ];

    let suite_report = aggregator.generate(&batch, "mixed").await.expect("generate failed");
    assert_eq!(suite_report.total, 3);
    assert_eq!(suite_report.passed, 2);
    assert_eq!(suite_report.failed, 1);

    let nav = &suite_report.by_category["navigation"];
    assert_eq!(nav.total, 2);
    assert_eq!(nav.passed, 1);

    let ext = &suite_report.by_category["info_extraction"];
    assert_eq!(ext.total, 1);
    assert!((ext.cost_usd - 0.04).abs() < f64::EPSILON);

    assert_eq!(suite_report.failures.len(), 1);
    assert_eq!(suite_report.failures[0].scenario_id, "nav-002");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn regression_requires_historical_pass_rate_above_threshold() {
    let (store, pool) = setup_test_store().await;

    // nav-001: 8/10 historical pass rate, above the 0.7 threshold.
    for i in 0..8 {
        let r = at_offset_secs(passed_result("nav-001"), i - 60);
        store.store(&r, None).await.expect("store failed");
    }
    for i in 0..2 {
        let r = at_offset_secs(
            failed_result("nav-001", FailureCategory::AgentError, "old flake"),
            i - 50,
        );
        store.store(&r, None).await.expect("store failed");
    }

    // nav-002: 1/2 historical pass rate, below the threshold.
    let r = at_offset_secs(passed_result("nav-002"), -60);
    store.store(&r, None).await.expect("store failed");
    let r = at_offset_secs(
        failed_result("nav-002", FailureCategory::AgentError, "old flake"),
        -50,
    );
    store.store(&r, None).await.expect("store failed");

    let batch = vec![
        failed_result("nav-001", FailureCategory::VerificationFailure, "text missing"),
        failed_result("nav-002", FailureCategory::VerificationFailure, "text missing"),
    ];

    let aggregator = ReportAggregator::new(&store);
    let suite_report = aggregator.generate(&batch, "current").await.expect("generate failed");

    assert_eq!(suite_report.regressions.len(), 1);
    assert_eq!(suite_report.regressions[0].scenario_id, "nav-001");
    assert!(suite_report.regressions[0].historical_pass_rate > 0.7);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn renderers_cover_failures_and_regressions() {
    let (store, pool) = setup_test_store().await;
    let aggregator = ReportAggregator::new(&store);

    let batch = vec![
        passed_result("nav-001"),
        failed_result("nav-002", FailureCategory::Infrastructure, "connection refused"),
    ];
    let suite_report = aggregator.generate(&batch, "render").await.expect("generate failed");

    let markdown = report::to_markdown(&suite_report);
    assert!(markdown.contains("# Benchmark Report: render"));
    assert!(markdown.contains("## Failures"));
    assert!(markdown.contains("nav-002"));
    assert!(markdown.contains("infrastructure"));

    let json = report::to_json(&suite_report).expect("to_json failed");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("invalid json");
    assert_eq!(parsed["total"], 2);
    assert_eq!(parsed["failures"][0]["scenario_id"], "nav-002");

    teardown_test_db(pool).await;
}
