use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Pool that only connects on first use, for router tests that never touch the database.
#[cfg(test)]
pub fn lazy_pool(database_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(database_url)
        .expect("valid test database url")
}

/// Migrated pool for persistence tests. `None` when `DATABASE_URL` is unset, so those tests skip.
#[cfg(test)]
pub async fn test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let pool = create_pool(&database_url)
        .await
        .expect("DATABASE_URL is set but the database is unreachable");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    Some(pool)
}
