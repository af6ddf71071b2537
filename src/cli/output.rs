//! Human-readable rendering for CLI commands.

use comfy_table::{presets, ContentArrangement, Table};
use serde_json::Value;

use crate::domain::models::{ImprovementTask, RunResult, Scenario, SuiteReport};

const TRACE_INPUT_MAX: usize = 120;
const TRACE_PREVIEW_MAX: usize = 200;
const RESPONSE_MAX: usize = 500;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// One-line pass/fail summary for a finished scenario run.
pub fn print_result_line(result: &RunResult) {
    let status = if result.passed { "PASS" } else { "FAIL" };
    let cost = result
        .total_cost_usd
        .map_or_else(|| "N/A".to_string(), |c| format!("${c:.4}"));
    println!(
        "  {status} | {}ms | {cost} | {} tools",
        result.duration_ms, result.tool_call_count
    );
    if !result.passed {
        println!(
            "  Error: {}",
            result.error.as_deref().unwrap_or("no error recorded")
        );
        for (check, passed) in &result.verification_results {
            if !passed {
                println!("  Failed check: {check}");
            }
        }
    }
}

/// Detailed tool trace and final agent response for one run.
pub fn print_trace(result: &RunResult) {
    if !result.tool_call_trace.is_empty() {
        println!("\n  Tool Trace ({} calls):", result.tool_call_trace.len());
        println!("  {}", "\u{2500}".repeat(60));
        for (i, call) in result.tool_call_trace.iter().enumerate() {
            let tool_short = call
                .tool
                .rsplit("browser_")
                .next()
                .unwrap_or(call.tool.as_str());
            let input = truncate(&compact_json(&call.input), TRACE_INPUT_MAX);
            println!("  {:3}. {tool_short}", i + 1);
            println!("       input: {input}");
            if let Some(preview) = &call.result_preview {
                if !preview.is_empty() {
                    println!("       result: {}", truncate(preview, TRACE_PREVIEW_MAX));
                }
            }
        }
        println!("  {}", "\u{2500}".repeat(60));
    }
    if let Some(response) = &result.agent_response {
        println!("\n  Agent Response: {}", truncate(response, RESPONSE_MAX));
    }
}

/// Compact suite summary block for text output.
pub fn print_summary(report: &SuiteReport) {
    println!("{}", "=".repeat(50));
    println!(
        "Results: {}/{} passed ({:.0}%)",
        report.passed,
        report.total,
        report.pass_rate * 100.0
    );
    println!("Total cost: ${:.4}", report.total_cost_usd);
    println!(
        "Total duration: {:.1}s",
        report.total_duration_ms as f64 / 1000.0
    );
}

/// Scenario catalog listing.
pub fn format_scenario_table(scenarios: &[Scenario]) -> String {
    let mut table = base_table();
    table.set_header(vec!["ID", "Difficulty", "Name", "Category", "Tags"]);
    for scenario in scenarios {
        table.add_row(vec![
            scenario.id.clone(),
            scenario.difficulty.as_str().to_string(),
            scenario.name.clone(),
            scenario.category.as_str().to_string(),
            scenario.tags.join(", "),
        ]);
    }
    table.to_string()
}

/// Print generated improvement tasks.
pub fn print_tasks(tasks: &[ImprovementTask]) {
    println!("Generated {} improvement task(s):\n", tasks.len());
    for task in tasks {
        println!(
            "[{}] {}: {}",
            task.priority.as_str().to_uppercase(),
            task.id,
            task.title
        );
        println!("  Category: {}", task.category);
        println!("  Impact: {}", task.estimated_impact);
        println!("  Scenarios: {}", task.related_scenarios.join(", "));
        println!("  Suggestions:");
        for change in &task.suggested_changes {
            println!("    - {change}");
        }
        println!();
    }
}

fn compact_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
