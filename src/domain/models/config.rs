//! Configuration tree for the benchmark orchestrator.

use serde::{Deserialize, Serialize};

/// Main configuration structure for agentbench.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Automation endpoint (browser WebSocket) configuration
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Agent runtime configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the SQLite results database
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum pool connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".agentbench/benchmarks.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Automation endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrowserConfig {
    /// WebSocket URL of the browser automation endpoint
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Per-command response timeout in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_ws_url() -> String {
    "ws://localhost:9876".to_string()
}

const fn default_command_timeout_secs() -> u64 {
    15
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

/// Agent runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentConfig {
    /// Path to the agent CLI binary
    #[serde(default = "default_agent_binary")]
    pub binary_path: String,

    /// Permission mode passed to the agent runtime
    #[serde(default = "default_permission_mode")]
    pub permission_mode: String,

    /// Working directory for agent invocations
    #[serde(default)]
    pub working_dir: Option<String>,
}

fn default_agent_binary() -> String {
    "claude".to_string()
}

fn default_permission_mode() -> String {
    "bypassPermissions".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            binary_path: default_agent_binary(),
            permission_mode: default_permission_mode(),
            working_dir: None,
        }
    }
}
