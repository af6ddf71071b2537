//! Scenario execution state machine.
//!
//! Drives one scenario through the external agent runtime: applies the
//! attempt/retry policy, captures every tool invocation from the agent
//! stream, verifies the resulting browser state, classifies the outcome,
//! and persists one `RunResult` per attempt that actually executes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentConfig, FailureCategory, RunResult, Scenario, ScenarioRun, ScenarioSuite, SuiteRunRecord,
    ToolCallRecord, ToolCallTraceEntry,
};
use crate::domain::ports::{
    AgentEvent, AgentInvocationOptions, AgentRuntime, MetricsRepository, StateVerifier,
};

/// Delay between retryable attempts. Fixed rather than adaptive: scenario
/// costs are capped and retries are rare.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Runs benchmark scenarios against a live browser via the agent runtime.
pub struct ScenarioExecutor {
    runtime: Arc<dyn AgentRuntime>,
    verifier: Mutex<Box<dyn StateVerifier>>,
    store: Arc<dyn MetricsRepository>,
    agent_config: AgentConfig,
    allowed_tools: Vec<String>,
    run_group: Option<String>,
    retry_delay: Duration,
}

impl ScenarioExecutor {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        verifier: Box<dyn StateVerifier>,
        store: Arc<dyn MetricsRepository>,
        agent_config: AgentConfig,
        allowed_tools: Vec<String>,
    ) -> Self {
        Self {
            runtime,
            verifier: Mutex::new(verifier),
            store,
            agent_config,
            allowed_tools,
            run_group: None,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Tag persisted results with a run group.
    #[must_use]
    pub fn with_run_group(mut self, group: impl Into<String>) -> Self {
        self.run_group = Some(group.into());
        self
    }

    /// Override the inter-attempt delay (tests).
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Run a single scenario with up to `max_attempts` tries.
    ///
    /// Only `infrastructure` failures are retried; `agent_error` and
    /// `verification_failure` are terminal. Returns the result of the last
    /// attempt made; every attempt's result is persisted.
    pub async fn run(&self, scenario: &Scenario) -> DomainResult<RunResult> {
        let max_attempts = scenario.max_attempts.max(1);
        let mut last_result: Option<RunResult> = None;

        for attempt in 1..=max_attempts {
            info!(
                scenario_id = %scenario.id,
                attempt,
                max_attempts,
                "Starting scenario attempt"
            );

            let mut run = ScenarioRun::start(&scenario.id, attempt);

            match timeout(scenario.timeout, self.execute_attempt(scenario, &mut run)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    run.fail(classify_error(&e), e.to_string());
                }
                Err(_) => {
                    run.fail(
                        FailureCategory::Infrastructure,
                        format!("Scenario timed out after {}s", scenario.timeout.as_secs()),
                    );
                }
            }
            run.ended_at = Some(Utc::now());

            // Teardown always runs; its errors never mask the attempt outcome.
            if let Some(teardown) = &scenario.teardown {
                if let Err(e) = teardown().await {
                    warn!(scenario_id = %scenario.id, error = %e, "Teardown failed");
                }
            }

            let result = build_result(scenario, &run);
            self.store.store(&result, self.run_group.as_deref()).await?;

            let retryable = run
                .failure_category
                .is_some_and(|c| c.is_retryable());

            info!(
                scenario_id = %scenario.id,
                attempt,
                passed = result.passed,
                failure_category = ?run.failure_category,
                "Attempt finished"
            );

            last_result = Some(result);

            if !retryable {
                break;
            }
            if attempt < max_attempts {
                sleep(self.retry_delay).await;
            }
        }

        last_result.ok_or_else(|| DomainError::AgentRuntime("no attempt executed".to_string()))
    }

    /// Run all scenarios in a suite sequentially, cleaning residual tabs
    /// between scenarios, and persist one suite summary record.
    pub async fn run_suite(&self, suite: &ScenarioSuite) -> DomainResult<Vec<RunResult>> {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(suite.scenarios.len());

        for scenario in &suite.scenarios {
            {
                let mut verifier = self.verifier.lock().await;
                if let Err(e) = verifier.cleanup_tabs().await {
                    warn!(error = %e, "Tab cleanup between scenarios failed");
                }
            }
            results.push(self.run(scenario).await?);
        }

        let passed = results.iter().filter(|r| r.passed).count() as u32;
        let record = SuiteRunRecord {
            id: Uuid::new_v4(),
            suite_name: suite.name.clone(),
            total_scenarios: results.len() as u32,
            passed,
            failed: results.len() as u32 - passed,
            total_cost_usd: results.iter().filter_map(|r| r.total_cost_usd).sum(),
            total_duration_ms: results.iter().map(|r| r.duration_ms).sum(),
            started_at,
            ended_at: Utc::now(),
        };
        self.store.store_suite(&record).await?;

        Ok(results)
    }

    /// Close the verification connection.
    pub async fn shutdown(&self) {
        self.verifier.lock().await.close().await;
    }

    async fn execute_attempt(&self, scenario: &Scenario, run: &mut ScenarioRun) -> DomainResult<()> {
        if let Some(setup) = &scenario.setup {
            setup()
                .await
                .map_err(|e| DomainError::AgentRuntime(format!("setup failed: {e}")))?;
        }

        let options = AgentInvocationOptions {
            allowed_tools: self.allowed_tools.clone(),
            max_turns: scenario.max_turns,
            max_budget_usd: scenario.max_budget_usd,
            permission_mode: self.agent_config.permission_mode.clone(),
            working_dir: self.agent_config.working_dir.clone(),
            append_system_prompt: scenario.append_system_prompt.clone(),
        };

        let mut events = self.runtime.invoke(&scenario.prompt, &options).await?;

        // Pending tool calls indexed by the agent-issued call id.
        let mut pending: HashMap<String, usize> = HashMap::new();

        while let Some(event) = events.recv().await {
            match event {
                AgentEvent::ToolUse { id, name, input } => {
                    debug!(scenario_id = %scenario.id, tool = %name, "Tool invocation");
                    run.tool_calls.push(ToolCallRecord::new(name, input));
                    pending.insert(id, run.tool_calls.len() - 1);
                }
                AgentEvent::ToolResult { id, output } => {
                    // Unknown call ids are ignored, never an error.
                    if let Some(&index) = pending.get(&id) {
                        run.tool_calls[index].tool_result = Some(output);
                    }
                }
                AgentEvent::Completed(summary) => {
                    run.summary = Some(summary);
                }
            }
        }

        let summary = match run.summary.as_ref() {
            None => {
                run.fail(FailureCategory::AgentError, "No result message");
                return Ok(());
            }
            Some(s) if s.is_error => {
                let message = s
                    .result
                    .clone()
                    .unwrap_or_else(|| "Agent reported an error".to_string());
                run.fail(FailureCategory::AgentError, message);
                return Ok(());
            }
            Some(s) => s.clone(),
        };
        debug!(
            scenario_id = %scenario.id,
            num_turns = summary.num_turns,
            cost = ?summary.total_cost_usd,
            "Agent completed, verifying browser state"
        );

        let snapshot = {
            let mut verifier = self.verifier.lock().await;
            verifier.capture_state().await?
        };

        for check in &scenario.verifications {
            let passed = (check.check)(snapshot.clone()).await;
            run.verification_results
                .insert(check.description.clone(), passed);
        }

        if run.verification_results.values().any(|passed| !passed) {
            run.failure_category = Some(FailureCategory::VerificationFailure);
        }

        Ok(())
    }
}

/// Map an attempt-level error onto the failure taxonomy: timeouts and
/// connection refusals are infrastructure; everything else is an agent error.
fn classify_error(error: &DomainError) -> FailureCategory {
    match error {
        DomainError::ScenarioTimeout(_)
        | DomainError::CommandTimeout(_)
        | DomainError::ConnectionRefused(_) => FailureCategory::Infrastructure,
        _ => FailureCategory::AgentError,
    }
}

/// Fold a finished attempt into the persisted summary form.
fn build_result(scenario: &Scenario, run: &ScenarioRun) -> RunResult {
    let summary = run.summary.as_ref();

    // Deduplicate tool names preserving first-seen order.
    let mut tool_names_used: Vec<String> = Vec::new();
    for call in &run.tool_calls {
        if !tool_names_used.contains(&call.tool_name) {
            tool_names_used.push(call.tool_name.clone());
        }
    }

    RunResult {
        scenario_id: scenario.id.clone(),
        scenario_name: scenario.name.clone(),
        category: scenario.category.as_str().to_string(),
        passed: run.failure_category.is_none(),
        attempt: run.attempt,
        total_cost_usd: summary.and_then(|s| s.total_cost_usd),
        duration_ms: run.duration_ms(),
        num_turns: summary.map_or(0, |s| s.num_turns),
        tool_call_count: run.tool_calls.len() as u32,
        tool_names_used,
        verification_results: run.verification_results.clone(),
        error: run.error.clone(),
        failure_category: run.failure_category,
        timestamp: run.started_at,
        tool_call_trace: run.tool_calls.iter().map(ToolCallTraceEntry::from).collect(),
        agent_response: summary.and_then(|s| s.result.clone()),
    }
}
