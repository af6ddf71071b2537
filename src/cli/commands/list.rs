//! `list` command: print the scenario catalog.

use anyhow::Result;

use crate::cli::output::format_scenario_table;
use crate::scenarios;

pub fn execute() -> Result<()> {
    let all = scenarios::all_scenarios();
    println!("{}", format_scenario_table(&all));
    println!("\n{} scenario(s)", all.len());
    Ok(())
}
