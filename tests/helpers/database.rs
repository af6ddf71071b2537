use sqlx::SqlitePool;

use agentbench::adapters::sqlite::{
    all_embedded_migrations, create_test_pool, Migrator, SqliteMetricsStore,
};

/// Create an in-memory SQLite database with migrations applied.
///
/// Each call creates a completely isolated database instance.
pub async fn setup_test_db() -> SqlitePool {
    let pool = create_test_pool()
        .await
        .expect("failed to create test database");
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("failed to run migrations");
    pool
}

/// Metrics store over a fresh in-memory database.
pub async fn setup_test_store() -> (SqliteMetricsStore, SqlitePool) {
    let pool = setup_test_db().await;
    (SqliteMetricsStore::new(pool.clone()), pool)
}

pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}
