use sqlx::SqlitePool;

/// In-memory SQLite pool with migrations applied
pub async fn create_test_pool() -> SqlitePool {
    let pool = wp_db::open_in_memory_pool()
        .await
        .expect("Failed to create test pool");

    wp_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
