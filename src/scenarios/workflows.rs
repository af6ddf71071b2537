//! Multi-step workflow scenarios used by the regression suite.

use std::time::Duration;

use futures::FutureExt;

use crate::domain::models::{
    Difficulty, Scenario, ScenarioCategory, StateSnapshot, VerificationCheck,
};

fn check_page_text_contains(description: &str, needle: &'static str) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { state.page_text_contains(needle) }.boxed()
    })
}

fn check_active_url_contains(description: &str, fragment: &'static str) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { state.active_url().is_some_and(|url| url.contains(fragment)) }.boxed()
    })
}

fn check_dom_has_elements(description: &str) -> VerificationCheck {
    VerificationCheck::new(description, move |state: StateSnapshot| {
        async move { !state.dom_elements.is_empty() }.boxed()
    })
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "form-001",
            "Fill and submit a form",
            ScenarioCategory::FormFilling,
            "Open httpbin.org/forms/post in a new tab and wait for it to load. \
             Fill in the customer name field with 'Benchmark Bot' and the telephone \
             field with '555-0100', then submit the form. Wait for the response page.",
        )
        .with_verification(check_active_url_contains("submitted to /post", "/post"))
        .with_verification(check_page_text_contains(
            "response echoes the name",
            "Benchmark Bot",
        ))
        .with_max_turns(20)
        .with_budget(0.35)
        .with_timeout(Duration::from_secs(180))
        .with_difficulty(Difficulty::Medium)
        .with_tag("regression")
        .with_tag("forms"),
        Scenario::new(
            "multi-001",
            "Extract data across two pages",
            ScenarioCategory::MultiStep,
            "Open httpbin.org/html in a new tab and read its page text. \
             Then navigate the same tab to example.com and read that page too. \
             Tell me one fact from each page.",
        )
        .with_verification(check_active_url_contains(
            "ended on example.com",
            "example.com",
        ))
        .with_verification(check_dom_has_elements("final page has DOM elements"))
        .with_max_turns(20)
        .with_budget(0.35)
        .with_timeout(Duration::from_secs(180))
        .with_difficulty(Difficulty::Medium)
        .with_tag("regression")
        .with_tag("extraction"),
        Scenario::new(
            "recover-001",
            "Recover from a dead link",
            ScenarioCategory::ErrorRecovery,
            "Open httpbin.org/status/404 in a new tab. The page will fail to render \
             useful content. Recover by navigating the same tab to example.com and \
             confirm it loaded.",
        )
        .with_verification(check_active_url_contains(
            "recovered to example.com",
            "example.com",
        ))
        .with_max_turns(15)
        .with_budget(0.25)
        .with_difficulty(Difficulty::Medium)
        .with_tag("regression")
        .with_tag("recovery"),
    ]
}
