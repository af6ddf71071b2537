//! Command handlers.

pub mod improve;
pub mod list;
pub mod report;
pub mod run;

use anyhow::{Context, Result};

use crate::adapters::sqlite::{all_embedded_migrations, create_pool, Migrator, SqliteMetricsStore};
use crate::domain::models::Config;

/// Open the results database, applying pending migrations.
pub(crate) async fn open_store(config: &Config) -> Result<SqliteMetricsStore> {
    let url = format!("sqlite:{}", config.database.path);
    let pool = create_pool(&url, config.database.max_connections)
        .await
        .context("Failed to open results database")?;
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("Failed to apply database migrations")?;
    Ok(SqliteMetricsStore::new(pool))
}
