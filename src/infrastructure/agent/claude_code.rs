//! Agent runtime backed by the Claude Code CLI.
//!
//! Spawns the CLI in `--print --output-format stream-json` mode and maps its
//! line-delimited event stream onto the `AgentRuntime` port. Turn and budget
//! guardrails are passed through as flags; the CLI enforces them.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentConfig, AgentSummary};
use crate::domain::ports::{AgentEvent, AgentInvocationOptions, AgentRuntime};

pub struct ClaudeCodeRuntime {
    config: AgentConfig,
}

impl ClaudeCodeRuntime {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, prompt: &str, options: &AgentInvocationOptions) -> Vec<String> {
        let mut args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
            "--max-turns".to_string(),
            options.max_turns.to_string(),
            "--max-budget-usd".to_string(),
            options.max_budget_usd.to_string(),
            "--permission-mode".to_string(),
            options.permission_mode.clone(),
        ];

        if !options.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(options.allowed_tools.join(","));
        }

        if let Some(ref append) = options.append_system_prompt {
            args.push("--append-system-prompt".to_string());
            args.push(append.clone());
        }

        args.push(prompt.to_string());
        args
    }
}

#[async_trait]
impl AgentRuntime for ClaudeCodeRuntime {
    async fn invoke(
        &self,
        prompt: &str,
        options: &AgentInvocationOptions,
    ) -> DomainResult<mpsc::Receiver<AgentEvent>> {
        let args = self.build_args(prompt, options);

        let mut command = Command::new(&self.config.binary_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if let Some(dir) = options
            .working_dir
            .as_ref()
            .or(self.config.working_dir.as_ref())
        {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| DomainError::AgentRuntime(format!("failed to spawn agent CLI: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DomainError::AgentRuntime("agent CLI stdout unavailable".to_string()))?;

        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            'read: while let Ok(Some(line)) = lines.next_line().await {
                let Ok(value) = serde_json::from_str::<Value>(&line) else {
                    debug!("Skipping non-JSON agent output line");
                    continue;
                };
                for event in parse_stream_event(&value) {
                    if tx.send(event).await.is_err() {
                        // Consumer dropped; stop reading.
                        break 'read;
                    }
                }
            }
            if let Err(e) = child.wait().await {
                warn!(error = %e, "Failed to reap agent CLI process");
            }
        });

        Ok(rx)
    }
}

/// Map one stream-json line onto zero or more agent events.
fn parse_stream_event(value: &Value) -> Vec<AgentEvent> {
    match value.get("type").and_then(Value::as_str) {
        Some("assistant") => content_blocks(value)
            .iter()
            .filter_map(|block| {
                if block.get("type").and_then(Value::as_str) != Some("tool_use") {
                    return None;
                }
                Some(AgentEvent::ToolUse {
                    id: block.get("id")?.as_str()?.to_string(),
                    name: block.get("name")?.as_str()?.to_string(),
                    input: block.get("input").cloned().unwrap_or_default(),
                })
            })
            .collect(),
        Some("user") => content_blocks(value)
            .iter()
            .filter_map(|block| {
                if block.get("type").and_then(Value::as_str) != Some("tool_result") {
                    return None;
                }
                Some(AgentEvent::ToolResult {
                    id: block.get("tool_use_id")?.as_str()?.to_string(),
                    output: block.get("content").cloned().unwrap_or_default(),
                })
            })
            .collect(),
        Some("result") => vec![AgentEvent::Completed(AgentSummary {
            duration_ms: value.get("duration_ms").and_then(Value::as_i64).unwrap_or(0),
            num_turns: value
                .get("num_turns")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32,
            total_cost_usd: value.get("total_cost_usd").and_then(Value::as_f64),
            is_error: value.get("is_error").and_then(Value::as_bool).unwrap_or(false),
            result: value
                .get("result")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            session_id: value
                .get("session_id")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        })],
        _ => Vec::new(),
    }
}

fn content_blocks(value: &Value) -> Vec<Value> {
    value
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tool_use_blocks() {
        let line = json!({
            "type": "assistant",
            "message": { "content": [
                { "type": "text", "text": "navigating" },
                { "type": "tool_use", "id": "tu_1", "name": "browser_navigate",
                  "input": { "url": "https://example.com" } }
            ]}
        });
        let events = parse_stream_event(&line);
        assert_eq!(events.len(), 1);
        match &events[0] {
            AgentEvent::ToolUse { id, name, .. } => {
                assert_eq!(id, "tu_1");
                assert_eq!(name, "browser_navigate");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parses_result_summary() {
        let line = json!({
            "type": "result",
            "duration_ms": 5000,
            "num_turns": 7,
            "total_cost_usd": 0.042,
            "is_error": false,
            "result": "Task complete",
            "session_id": "sess-1"
        });
        let events = parse_stream_event(&line);
        match &events[0] {
            AgentEvent::Completed(summary) => {
                assert_eq!(summary.num_turns, 7);
                assert!(!summary.is_error);
                assert_eq!(summary.total_cost_usd, Some(0.042));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn ignores_unknown_event_types() {
        assert!(parse_stream_event(&json!({ "type": "system" })).is_empty());
    }

    #[test]
    fn build_args_forwards_budget_and_guardrails() {
        let runtime = ClaudeCodeRuntime::new(AgentConfig::default());
        let options = AgentInvocationOptions {
            allowed_tools: vec!["browser_navigate".to_string()],
            max_turns: 12,
            max_budget_usd: 0.25,
            permission_mode: "bypassPermissions".to_string(),
            working_dir: None,
            append_system_prompt: None,
        };

        let args = runtime.build_args("open the page", &options);

        let budget_flag = args
            .iter()
            .position(|a| a == "--max-budget-usd")
            .expect("budget flag missing");
        assert_eq!(args[budget_flag + 1], "0.25");

        let turns_flag = args.iter().position(|a| a == "--max-turns").unwrap();
        assert_eq!(args[turns_flag + 1], "12");
        assert!(args.contains(&"--allowedTools".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("open the page"));
    }
}
