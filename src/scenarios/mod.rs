//! Built-in scenario catalog.
//!
//! Scenarios are static configuration assembled once at startup. The catalog
//! also defines the fixed allow-list of automation tool names handed to the
//! agent runtime for every invocation.

mod navigation;
mod workflows;

use crate::domain::models::{Scenario, ScenarioSuite};

/// Automation tools the agent is allowed to call during a scenario.
pub const ALLOWED_TOOLS: &[&str] = &[
    "mcp__agentbench-browser__browser_create_tab",
    "mcp__agentbench-browser__browser_close_tab",
    "mcp__agentbench-browser__browser_switch_tab",
    "mcp__agentbench-browser__browser_list_tabs",
    "mcp__agentbench-browser__browser_navigate",
    "mcp__agentbench-browser__browser_go_back",
    "mcp__agentbench-browser__browser_go_forward",
    "mcp__agentbench-browser__browser_reload",
    "mcp__agentbench-browser__browser_get_page_info",
    "mcp__agentbench-browser__browser_screenshot",
    "mcp__agentbench-browser__browser_get_dom",
    "mcp__agentbench-browser__browser_get_page_text",
    "mcp__agentbench-browser__browser_click",
    "mcp__agentbench-browser__browser_fill",
    "mcp__agentbench-browser__browser_select_option",
    "mcp__agentbench-browser__browser_type",
    "mcp__agentbench-browser__browser_press_key",
    "mcp__agentbench-browser__browser_scroll",
    "mcp__agentbench-browser__browser_hover",
    "mcp__agentbench-browser__browser_wait",
    "mcp__agentbench-browser__browser_wait_for_load",
    "mcp__agentbench-browser__browser_wait_for_element",
    "mcp__agentbench-browser__browser_wait_for_text",
];

/// Owned copy of the tool allow-list for executor construction.
pub fn allowed_tools() -> Vec<String> {
    ALLOWED_TOOLS.iter().map(|t| (*t).to_string()).collect()
}

/// Every built-in scenario, in catalog order.
pub fn all_scenarios() -> Vec<Scenario> {
    let mut scenarios = navigation::scenarios();
    scenarios.extend(workflows::scenarios());
    scenarios
}

/// Look up one scenario by id.
pub fn find_scenario(id: &str) -> Option<Scenario> {
    all_scenarios().into_iter().find(|s| s.id == id)
}

/// All scenarios carrying the given tag, in catalog order.
pub fn scenarios_with_tag(tag: &str) -> Vec<Scenario> {
    all_scenarios()
        .into_iter()
        .filter(|s| s.has_tag(tag))
        .collect()
}

/// Named suite, one of `smoke`, `regression`, or `full`.
pub fn suite(name: &str) -> Option<ScenarioSuite> {
    let scenarios = match name {
        "smoke" => scenarios_with_tag("smoke"),
        "regression" => scenarios_with_tag("regression"),
        "full" => all_scenarios(),
        _ => return None,
    };
    let description = match name {
        "smoke" => "Quick confidence checks over basic navigation",
        "regression" => "Multi-step workflow regression tests",
        _ => "Every built-in scenario",
    };
    Some(ScenarioSuite {
        name: name.to_string(),
        description: description.to_string(),
        scenarios,
    })
}
