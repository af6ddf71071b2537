//! Suite report aggregation and rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    CategoryStats, FailureDetail, Regression, RunResult, SuiteReport,
};
use crate::domain::ports::MetricsRepository;

/// Historical pass rate above which a current failure counts as a regression.
const REGRESSION_THRESHOLD: f64 = 0.7;

/// Window of historical runs consulted for the regression check.
const REGRESSION_WINDOW: u32 = 10;

/// Folds a batch of run results into a suite report.
pub struct ReportAggregator<'a> {
    store: &'a dyn MetricsRepository,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(store: &'a dyn MetricsRepository) -> Self {
        Self { store }
    }

    /// Generate a report from a batch of run results.
    ///
    /// An empty batch yields total 0 and pass rate 0.0, never an error.
    pub async fn generate(
        &self,
        results: &[RunResult],
        suite_name: &str,
    ) -> DomainResult<SuiteReport> {
        let total = results.len() as u32;
        let passed = results.iter().filter(|r| r.passed).count() as u32;
        let failed = total - passed;
        let total_cost_usd: f64 = results.iter().filter_map(|r| r.total_cost_usd).sum();
        let total_duration_ms: i64 = results.iter().map(|r| r.duration_ms).sum();

        let mut by_category: BTreeMap<String, CategoryStats> = BTreeMap::new();
        for result in results {
            let stats = by_category.entry(result.category.clone()).or_default();
            stats.total += 1;
            if result.passed {
                stats.passed += 1;
            }
            stats.cost_usd += result.total_cost_usd.unwrap_or(0.0);
            stats.duration_ms += result.duration_ms;
        }

        let failures: Vec<FailureDetail> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| FailureDetail {
                scenario_id: r.scenario_id.clone(),
                scenario_name: r.scenario_name.clone(),
                failure_category: r.failure_category.map(|c| c.as_str().to_string()),
                error: r.error.clone(),
                verification_results: r.verification_results.clone(),
                tool_call_count: r.tool_call_count,
            })
            .collect();

        // Regressions: failed now but historically passing above threshold.
        let mut regressions = Vec::new();
        for result in results.iter().filter(|r| !r.passed) {
            let historical_rate = self
                .store
                .pass_rate(&result.scenario_id, REGRESSION_WINDOW)
                .await?;
            if historical_rate > REGRESSION_THRESHOLD {
                regressions.push(Regression {
                    scenario_id: result.scenario_id.clone(),
                    historical_pass_rate: historical_rate,
                    error: result.error.clone(),
                });
            }
        }

        let divisor = f64::from(total.max(1));
        Ok(SuiteReport {
            suite_name: suite_name.to_string(),
            total,
            passed,
            failed,
            pass_rate: if total == 0 {
                0.0
            } else {
                f64::from(passed) / f64::from(total)
            },
            total_cost_usd,
            total_duration_ms,
            avg_cost_per_scenario: if total == 0 { 0.0 } else { total_cost_usd / divisor },
            avg_duration_per_scenario_ms: if total == 0 {
                0.0
            } else {
                total_duration_ms as f64 / divisor
            },
            by_category,
            failures,
            regressions,
        })
    }
}

/// Render a report as Markdown.
pub fn to_markdown(report: &SuiteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Benchmark Report: {}", report.suite_name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Pass Rate:** {}/{} ({:.0}%)",
        report.passed,
        report.total,
        report.pass_rate * 100.0
    );
    let _ = writeln!(out, "**Total Cost:** ${:.4}", report.total_cost_usd);
    let _ = writeln!(
        out,
        "**Total Duration:** {:.1}s",
        report.total_duration_ms as f64 / 1000.0
    );
    let _ = writeln!(
        out,
        "**Avg Cost/Scenario:** ${:.4}",
        report.avg_cost_per_scenario
    );
    let _ = writeln!(
        out,
        "**Avg Duration/Scenario:** {:.1}s",
        report.avg_duration_per_scenario_ms / 1000.0
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "## By Category");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Category | Passed | Total | Rate | Cost |");
    let _ = writeln!(out, "|----------|--------|-------|------|------|");
    for (category, stats) in &report.by_category {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:.0}% | ${:.4} |",
            category,
            stats.passed,
            stats.total,
            stats.pass_rate() * 100.0,
            stats.cost_usd
        );
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Failures");
        let _ = writeln!(out);
        for failure in &report.failures {
            let _ = writeln!(
                out,
                "- **{}** ({}): {} - {}",
                failure.scenario_id,
                failure.scenario_name,
                failure.failure_category.as_deref().unwrap_or("unknown"),
                failure.error.as_deref().unwrap_or("no error recorded")
            );
        }
    }

    if !report.regressions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Regressions");
        let _ = writeln!(out);
        for regression in &report.regressions {
            let _ = writeln!(
                out,
                "- **{}**: was passing {:.0}%, now failing: {}",
                regression.scenario_id,
                regression.historical_pass_rate * 100.0,
                regression.error.as_deref().unwrap_or("no error recorded")
            );
        }
    }

    out
}

/// Render a report as pretty-printed JSON.
pub fn to_json(report: &SuiteReport) -> DomainResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
