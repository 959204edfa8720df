use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::OnceLock;

pub mod models;
pub mod repositories;
pub mod transaction;

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Connect to Postgres, run pending migrations, and install the global pool.
pub async fn init_database(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed");

    let _ = POOL.set(pool.clone());
    Ok(pool)
}

/// Global connection pool. `init_database` must have run first.
pub fn get_pool() -> &'static PgPool {
    POOL.get().expect("database pool not initialized")
}
