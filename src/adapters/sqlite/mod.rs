//! SQLite adapters for metrics persistence.

pub mod connection;
pub mod metrics_repository;
pub mod migrations;

pub use connection::{create_pool, create_test_pool, ConnectionError};
pub use metrics_repository::SqliteMetricsStore;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
