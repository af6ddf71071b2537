//! `run` command: execute scenarios and print a summary.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use crate::application::ScenarioExecutor;
use crate::cli::output;
use crate::cli::{OutputFormat, RunArgs};
use crate::domain::errors::DomainError;
use crate::domain::models::ScenarioSuite;
use crate::infrastructure::agent::ClaudeCodeRuntime;
use crate::infrastructure::browser::BrowserStateClient;
use crate::infrastructure::config::ConfigLoader;
use crate::scenarios;
use crate::services::report::{self, ReportAggregator};

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let store = Arc::new(super::open_store(&config).await?);

    let (suite_name, selected) = if let Some(id) = &args.scenario {
        let scenario = scenarios::find_scenario(id)
            .ok_or_else(|| DomainError::ScenarioNotFound(id.clone()))
            .with_context(|| {
                let available: Vec<String> = scenarios::all_scenarios()
                    .into_iter()
                    .map(|s| s.id)
                    .collect();
                format!("Available scenarios: {}", available.join(", "))
            })?;
        (format!("single:{id}"), vec![scenario])
    } else if let Some(tag) = &args.tag {
        let tagged = scenarios::scenarios_with_tag(tag);
        if tagged.is_empty() {
            bail!("No scenarios with tag '{tag}'");
        }
        (format!("tag:{tag}"), tagged)
    } else {
        let Some(suite) = scenarios::suite(&args.suite) else {
            bail!("Unknown suite '{}'. Available: smoke, regression, full", args.suite);
        };
        (suite.name.clone(), suite.scenarios)
    };

    println!("Running {} scenario(s) [{suite_name}]...\n", selected.len());

    let runtime = Arc::new(ClaudeCodeRuntime::new(config.agent.clone()));
    let verifier = Box::new(BrowserStateClient::new(&config.browser));
    let executor = ScenarioExecutor::new(
        runtime,
        verifier,
        store.clone(),
        config.agent.clone(),
        scenarios::allowed_tools(),
    )
    .with_run_group(Uuid::new_v4().to_string());

    let suite = ScenarioSuite {
        name: suite_name.clone(),
        description: String::new(),
        scenarios: selected,
    };
    let results = executor.run_suite(&suite).await?;
    executor.shutdown().await;

    for result in &results {
        println!("--- {}: {} ---", result.scenario_id, result.scenario_name);
        output::print_result_line(result);
        if args.trace {
            output::print_trace(result);
        }
        println!();
    }

    let aggregator = ReportAggregator::new(store.as_ref());
    let suite_report = aggregator.generate(&results, &suite_name).await?;

    match args.format {
        OutputFormat::Markdown => println!("{}", report::to_markdown(&suite_report)),
        OutputFormat::Json => println!("{}", report::to_json(&suite_report)?),
        OutputFormat::Text => output::print_summary(&suite_report),
    }

    Ok(())
}
