use agentbench::adapters::sqlite::{all_embedded_migrations, create_pool, Migrator};

#[tokio::test]
async fn create_pool_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join("nested").join("benchmarks.db");
    let url = format!("sqlite:{}", db_path.display());

    let pool = create_pool(&url, 2).await.expect("pool creation failed");
    assert!(db_path.parent().unwrap().exists());

    let applied = Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("migrations failed");
    assert_eq!(applied, 1);

    // Re-running is a no-op.
    let applied = Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("migrations failed");
    assert_eq!(applied, 0);

    pool.close().await;
}

#[tokio::test]
async fn create_pool_rejects_malformed_url() {
    let result = create_pool("sqlite:\0bad", 1).await;
    assert!(result.is_err());
}
