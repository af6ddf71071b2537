//! `report` command: aggregate stored results.

use anyhow::Result;

use crate::cli::{OutputFormat, ReportArgs};
use crate::domain::ports::MetricsRepository;
use crate::infrastructure::config::ConfigLoader;
use crate::services::report::{self, ReportAggregator};

pub async fn execute(args: ReportArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let store = super::open_store(&config).await?;

    let results = store.recent_runs(None, args.last_n).await?;
    if results.is_empty() {
        println!("No benchmark results found. Run benchmarks first.");
        return Ok(());
    }

    let aggregator = ReportAggregator::new(&store);
    let suite_report = aggregator.generate(&results, "stored").await?;

    match args.format {
        OutputFormat::Json => println!("{}", report::to_json(&suite_report)?),
        _ => println!("{}", report::to_markdown(&suite_report)),
    }

    Ok(())
}
