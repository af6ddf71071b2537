//! Failure-pattern mining and improvement-task generation.
//!
//! Mines recurring failure signatures out of persisted run results and turns
//! each pattern into a concrete remediation task with a priority derived from
//! how often the pattern occurred.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    FailurePattern, ImprovementTask, RunResult, TaskCategory, TaskPriority,
};
use crate::domain::ports::MetricsRepository;

/// Known error substrings, checked in order. The first match becomes the
/// pattern signature; unmatched errors fall back to a truncated prefix.
const KNOWN_SIGNATURES: &[&str] = &[
    "tab not found",
    "timed out",
    "timeout",
    "connection refused",
    "element index",
    "no element at",
    "page not loaded",
    "cannot access",
];

/// Maximum length of a fallback signature built from the raw error text.
const SIGNATURE_PREFIX_LEN: usize = 50;

/// Mines failure patterns from run results and derives improvement tasks.
pub struct FailureMiner;

impl FailureMiner {
    /// Group failed results into patterns keyed by
    /// `failure_category:error_signature`.
    ///
    /// Patterns come back sorted by frequency descending; ties keep the
    /// order in which the pattern first appeared in the input.
    pub fn analyze_failures(results: &[RunResult]) -> Vec<FailurePattern> {
        struct Bucket {
            first_seen: usize,
            count: u32,
            scenarios: Vec<String>,
            errors: Vec<String>,
            category: String,
        }

        let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

        for (index, result) in results.iter().filter(|r| !r.passed).enumerate() {
            let category = result
                .failure_category
                .map_or("unknown", |c| c.as_str())
                .to_string();
            let signature = error_signature(result.error.as_deref());
            let key = format!("{category}:{signature}");

            let bucket = buckets.entry(key).or_insert_with(|| Bucket {
                first_seen: index,
                count: 0,
                scenarios: Vec::new(),
                errors: Vec::new(),
                category: category.clone(),
            });
            bucket.count += 1;
            if !bucket.scenarios.contains(&result.scenario_id) {
                bucket.scenarios.push(result.scenario_id.clone());
            }
            if let Some(error) = &result.error {
                bucket.errors.push(error.clone());
            }
        }

        let mut patterns: Vec<(usize, FailurePattern)> = buckets
            .into_iter()
            .map(|(key, bucket)| {
                let frequency = bucket.count;
                let hypothesis = root_cause_hypothesis(&bucket.category, &key);
                let mut example_errors = bucket.errors;
                example_errors.truncate(3);
                (
                    bucket.first_seen,
                    FailurePattern {
                        pattern_name: key,
                        frequency,
                        affected_scenarios: bucket.scenarios,
                        example_errors,
                        root_cause_hypothesis: hypothesis,
                    },
                )
            })
            .collect();

        patterns.sort_by(|a, b| b.1.frequency.cmp(&a.1.frequency).then(a.0.cmp(&b.0)));
        patterns.into_iter().map(|(_, p)| p).collect()
    }

    /// Derive one remediation task per pattern. Ids are positional so that
    /// identical input always yields identical output.
    pub fn generate_tasks(patterns: &[FailurePattern]) -> Vec<ImprovementTask> {
        patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| {
                let (title, category, suggested_changes) = task_plan(pattern);
                ImprovementTask {
                    id: format!("imp-{:03}", index + 1),
                    title,
                    description: format!(
                        "Pattern `{}` hit {} time(s) across {} scenario(s). Hypothesis: {}",
                        pattern.pattern_name,
                        pattern.frequency,
                        pattern.affected_scenarios.len(),
                        pattern.root_cause_hypothesis
                    ),
                    category,
                    priority: TaskPriority::from_frequency(pattern.frequency),
                    related_scenarios: pattern.affected_scenarios.clone(),
                    suggested_changes,
                    estimated_impact: format!(
                        "Could fix up to {} failing run(s)",
                        pattern.frequency
                    ),
                }
            })
            .collect()
    }

    /// Fetch recent runs, mine patterns, and generate tasks in one pass.
    pub async fn run_improvement_cycle(
        store: &dyn MetricsRepository,
        last_n: u32,
    ) -> DomainResult<(Vec<FailurePattern>, Vec<ImprovementTask>)> {
        let results = store.recent_runs(None, last_n).await?;
        let failures = results.iter().filter(|r| !r.passed).count();
        info!(
            runs = results.len(),
            failures, "Mining failure patterns from recent runs"
        );

        let patterns = Self::analyze_failures(&results);
        let tasks = Self::generate_tasks(&patterns);
        Ok((patterns, tasks))
    }
}

/// Normalize an error message into a stable signature.
fn error_signature(error: Option<&str>) -> String {
    let Some(error) = error else {
        return "no_error".to_string();
    };
    let lowered = error.to_lowercase();
    for known in KNOWN_SIGNATURES {
        if lowered.contains(known) {
            return known.replace(' ', "_");
        }
    }
    let prefix: String = lowered.chars().take(SIGNATURE_PREFIX_LEN).collect();
    if prefix.is_empty() {
        "no_error".to_string()
    } else {
        prefix
    }
}

fn root_cause_hypothesis(category: &str, key: &str) -> String {
    if key.contains("connection_refused") || key.contains("timed_out") || key.contains("timeout") {
        "Automation endpoint unavailable or too slow to respond".to_string()
    } else if key.contains("tab_not_found")
        || key.contains("page_not_loaded")
        || key.contains("cannot_access")
    {
        "Browser state desynchronized from the agent's view".to_string()
    } else if key.contains("element_index") || key.contains("no_element_at") {
        "Stale element references between snapshot and interaction".to_string()
    } else if category == "verification_failure" {
        "Agent completed without reaching the expected end state".to_string()
    } else {
        "Agent behavior diverged from the scenario intent".to_string()
    }
}

/// Pick a title, category, and concrete change list for a pattern.
fn task_plan(pattern: &FailurePattern) -> (String, TaskCategory, Vec<String>) {
    let key = pattern.pattern_name.as_str();
    if key.contains("connection_refused") || key.contains("timed_out") || key.contains("timeout") {
        (
            "Stabilize automation server connectivity".to_string(),
            TaskCategory::TestInfra,
            vec![
                "Add a readiness probe before starting a suite".to_string(),
                "Raise or tune per-command timeouts".to_string(),
                "Restart the automation endpoint between suites".to_string(),
            ],
        )
    } else if key.contains("tab_not_found")
        || key.contains("page_not_loaded")
        || key.contains("cannot_access")
    {
        (
            "Harden tab and page lifecycle handling".to_string(),
            TaskCategory::AutomationServer,
            vec![
                "Wait for page load events before reporting tab state".to_string(),
                "Return structured errors when a tab disappears mid-command".to_string(),
            ],
        )
    } else if key.contains("element_index") || key.contains("no_element_at") {
        (
            "Make element references survive page updates".to_string(),
            TaskCategory::ToolDesign,
            vec![
                "Re-resolve element indices after DOM mutations".to_string(),
                "Expose a fresh-snapshot hint in interaction tool output".to_string(),
            ],
        )
    } else if key.starts_with("verification_failure") {
        (
            "Clarify scenario goals in the agent prompt".to_string(),
            TaskCategory::PromptEngineering,
            vec![
                "State the expected end state explicitly in the prompt".to_string(),
                "Ask the agent to confirm the final page before finishing".to_string(),
            ],
        )
    } else {
        (
            format!("Investigate recurring failure `{key}`"),
            TaskCategory::AgentBehavior,
            vec!["Review tool traces for the affected scenarios".to_string()],
        )
    }
}

/// Render mined patterns and tasks as Markdown.
pub fn to_markdown(patterns: &[FailurePattern], tasks: &[ImprovementTask]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Improvement Analysis");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Failure Patterns ({})", patterns.len());
    let _ = writeln!(out);
    for pattern in patterns {
        let _ = writeln!(
            out,
            "- `{}` x{} ({} scenario(s)): {}",
            pattern.pattern_name,
            pattern.frequency,
            pattern.affected_scenarios.len(),
            pattern.root_cause_hypothesis
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## Tasks ({})", tasks.len());
    for task in tasks {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "### [{}] {} ({})",
            task.priority, task.title, task.category
        );
        let _ = writeln!(out, "{}", task.description);
        for change in &task.suggested_changes {
            let _ = writeln!(out, "- {change}");
        }
        let _ = writeln!(out, "_{}_", task.estimated_impact);
    }
    out
}
