//! SQLite implementation of the MetricsRepository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    FailureCategory, RunResult, SuiteRunRecord, ToolCallTraceEntry,
};
use crate::domain::ports::MetricsRepository;

#[derive(Clone)]
pub struct SqliteMetricsStore {
    pool: SqlitePool,
}

impl SqliteMetricsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetricsRepository for SqliteMetricsStore {
    async fn store(&self, result: &RunResult, run_group: Option<&str>) -> DomainResult<()> {
        let tool_names_json = serde_json::to_string(&result.tool_names_used)?;
        let verifications_json = serde_json::to_string(&result.verification_results)?;
        let trace_json = serde_json::to_string(&result.tool_call_trace)?;

        sqlx::query(
            r#"INSERT INTO runs (
                run_group, scenario_id, scenario_name, category, passed, attempt,
                total_cost_usd, duration_ms, num_turns, tool_call_count,
                tool_names_used, verification_results, error, failure_category,
                timestamp, tool_call_trace, agent_response
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(run_group)
        .bind(&result.scenario_id)
        .bind(&result.scenario_name)
        .bind(&result.category)
        .bind(result.passed)
        .bind(i64::from(result.attempt))
        .bind(result.total_cost_usd)
        .bind(result.duration_ms)
        .bind(i64::from(result.num_turns))
        .bind(i64::from(result.tool_call_count))
        .bind(&tool_names_json)
        .bind(&verifications_json)
        .bind(&result.error)
        .bind(result.failure_category.map(|c| c.as_str()))
        .bind(result.timestamp.to_rfc3339())
        .bind(&trace_json)
        .bind(&result.agent_response)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn store_suite(&self, record: &SuiteRunRecord) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO suite_runs (
                id, suite_name, total_scenarios, passed, failed,
                total_cost_usd, total_duration_ms, started_at, ended_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(&record.suite_name)
        .bind(i64::from(record.total_scenarios))
        .bind(i64::from(record.passed))
        .bind(i64::from(record.failed))
        .bind(record.total_cost_usd)
        .bind(record.total_duration_ms)
        .bind(record.started_at.to_rfc3339())
        .bind(record.ended_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent_runs(
        &self,
        scenario_id: Option<&str>,
        last_n: u32,
    ) -> DomainResult<Vec<RunResult>> {
        let rows: Vec<RunRow> = match scenario_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT * FROM runs WHERE scenario_id = ? ORDER BY timestamp DESC LIMIT ?",
                )
                .bind(id)
                .bind(i64::from(last_n))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM runs ORDER BY timestamp DESC LIMIT ?")
                    .bind(i64::from(last_n))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn pass_rate(&self, scenario_id: &str, last_n: u32) -> DomainResult<f64> {
        let rows: Vec<(bool,)> = sqlx::query_as(
            "SELECT passed FROM runs WHERE scenario_id = ? ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(scenario_id)
        .bind(i64::from(last_n))
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(0.0);
        }
        let passed = rows.iter().filter(|(p,)| *p).count();
        Ok(passed as f64 / rows.len() as f64)
    }

    async fn cost_trend(&self, scenario_id: &str, last_n: u32) -> DomainResult<Vec<f64>> {
        let rows: Vec<(f64,)> = sqlx::query_as(
            "SELECT total_cost_usd FROM runs WHERE scenario_id = ? \
             AND total_cost_usd IS NOT NULL ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(scenario_id)
        .bind(i64::from(last_n))
        .fetch_all(&self.pool)
        .await?;

        // Query fetches newest-first; callers expect a left-to-right trend line.
        Ok(rows.into_iter().rev().map(|(c,)| c).collect())
    }
}

#[derive(sqlx::FromRow)]
struct RunRow {
    #[allow(dead_code)]
    id: i64,
    #[allow(dead_code)]
    run_group: Option<String>,
    scenario_id: String,
    scenario_name: Option<String>,
    category: Option<String>,
    passed: bool,
    attempt: Option<i64>,
    total_cost_usd: Option<f64>,
    duration_ms: Option<i64>,
    num_turns: Option<i64>,
    tool_call_count: Option<i64>,
    tool_names_used: Option<String>,
    verification_results: Option<String>,
    error: Option<String>,
    failure_category: Option<String>,
    timestamp: String,
    tool_call_trace: Option<String>,
    agent_response: Option<String>,
    #[allow(dead_code)]
    created_at: Option<String>,
}

impl TryFrom<RunRow> for RunResult {
    type Error = DomainError;

    fn try_from(row: RunRow) -> Result<Self, Self::Error> {
        let tool_names_used: Vec<String> = row
            .tool_names_used
            .map(|s| serde_json::from_str(&s))
            .transpose()?
            .unwrap_or_default();

        let verification_results: BTreeMap<String, bool> = row
            .verification_results
            .map(|s| serde_json::from_str(&s))
            .transpose()?
            .unwrap_or_default();

        let tool_call_trace: Vec<ToolCallTraceEntry> = row
            .tool_call_trace
            .map(|s| serde_json::from_str(&s))
            .transpose()?
            .unwrap_or_default();

        let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?
            .with_timezone(&Utc);

        Ok(RunResult {
            scenario_id: row.scenario_id,
            scenario_name: row.scenario_name.unwrap_or_default(),
            category: row.category.unwrap_or_default(),
            passed: row.passed,
            attempt: row.attempt.unwrap_or(1) as u32,
            total_cost_usd: row.total_cost_usd,
            duration_ms: row.duration_ms.unwrap_or(0),
            num_turns: row.num_turns.unwrap_or(0) as u32,
            tool_call_count: row.tool_call_count.unwrap_or(0) as u32,
            tool_names_used,
            verification_results,
            error: row.error,
            failure_category: row.failure_category.as_deref().and_then(FailureCategory::from_str),
            timestamp,
            tool_call_trace,
            agent_response: row.agent_response,
        })
    }
}
