//! Navigation and extraction scenarios.

use futures::FutureExt;

use crate::domain::models::{
    Difficulty, Scenario, ScenarioCategory, StateSnapshot, VerificationCheck,
};

fn tab_with_url(state: &StateSnapshot, fragment: &str) -> bool {
    state.tabs.iter().any(|tab| {
        tab.get("url")
            .and_then(|u| u.as_str())
            .is_some_and(|url| url.contains(fragment))
    })
}

fn check_tab_with_url(description: &str, fragment: &'static str) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { tab_with_url(&state, fragment) }.boxed()
    })
}

fn check_title_contains(description: &str, needle: &'static str) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { state.active_title().is_some_and(|t| t.contains(needle)) }.boxed()
    })
}

fn check_page_text_contains(description: &str, needle: &'static str) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { state.page_text_contains(needle) }.boxed()
    })
}

fn check_tab_count_at_least(description: &str, count: usize) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { state.tabs.len() >= count }.boxed()
    })
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "nav-001",
            "Navigate to example.com",
            ScenarioCategory::Navigation,
            "Open example.com in a new browser tab and verify the page has loaded. \
             Use browser_wait_for_load to ensure it's fully loaded.",
        )
        .with_verification(check_tab_with_url("example.com tab exists", "example.com"))
        .with_verification(check_title_contains("page title contains 'Example'", "Example"))
        .with_max_turns(10)
        .with_budget(0.15)
        .with_difficulty(Difficulty::Easy)
        .with_tag("smoke")
        .with_tag("navigation"),
        Scenario::new(
            "nav-002",
            "Navigate and go back",
            ScenarioCategory::Navigation,
            "Open example.com in a new tab, wait for it to load. \
             Then navigate the same tab to httpbin.org/html and wait for it to load. \
             Then go back to example.com. \
             Confirm you're back on example.com by checking the page info.",
        )
        .with_verification(check_tab_with_url("current page is example.com", "example.com"))
        .with_max_turns(15)
        .with_budget(0.25)
        .with_difficulty(Difficulty::Easy)
        .with_tag("smoke")
        .with_tag("navigation")
        .with_tag("history"),
        Scenario::new(
            "nav-003",
            "Open two tabs and switch",
            ScenarioCategory::TabManagement,
            "Open two new tabs: one to example.com and one to httpbin.org/get. \
             Wait for both to load. Then switch to the example.com tab. \
             List all open tabs to confirm both exist.",
        )
        .with_verification(check_tab_with_url("example.com tab exists", "example.com"))
        .with_verification(check_tab_with_url("httpbin tab exists", "httpbin.org"))
        .with_verification(check_tab_count_at_least("at least 2 tabs", 2))
        .with_max_turns(15)
        .with_budget(0.25)
        .with_difficulty(Difficulty::Easy)
        .with_tag("smoke")
        .with_tag("tabs"),
        Scenario::new(
            "nav-004",
            "Take a screenshot of a page",
            ScenarioCategory::Navigation,
            "Open example.com in a new tab, wait for it to load, \
             and take a screenshot. Tell me the dimensions of the screenshot.",
        )
        .with_verification(check_tab_with_url("example.com loaded", "example.com"))
        .with_max_turns(10)
        .with_budget(0.15)
        .with_difficulty(Difficulty::Easy)
        .with_tag("smoke")
        .with_tag("observation"),
        Scenario::new(
            "nav-005",
            "Read page text content",
            ScenarioCategory::InfoExtraction,
            "Open example.com, wait for it to load, and get the page text. \
             Tell me what the page says.",
        )
        .with_verification(check_page_text_contains("page has text content", "Example Domain"))
        .with_max_turns(10)
        .with_budget(0.15)
        .with_difficulty(Difficulty::Easy)
        .with_tag("smoke")
        .with_tag("extraction"),
    ]
}
