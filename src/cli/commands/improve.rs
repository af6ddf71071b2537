//! `improve` command: mine failures into remediation tasks.

use anyhow::Result;

use crate::cli::{output, ImproveArgs};
use crate::infrastructure::config::ConfigLoader;
use crate::services::FailureMiner;

pub async fn execute(args: ImproveArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let store = super::open_store(&config).await?;

    let (patterns, tasks) = FailureMiner::run_improvement_cycle(&store, args.last_n).await?;

    if patterns.is_empty() {
        println!("No improvement tasks generated (all scenarios passing!).");
        return Ok(());
    }

    output::print_tasks(&tasks);
    Ok(())
}
