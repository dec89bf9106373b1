use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    FromRow, PgExecutor, Pool, Postgres,
};

use crate::config::Config;

pub type Database = Pool<Postgres>;

pub async fn create_database_pool(config: &Config) -> Result<Database, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

    log::info!("Connected to database successfully");
    Ok(pool)
}

/// Runs `sql` with a single `$1` key and maps every row.
pub async fn select_many<'e, T, E>(executor: E, sql: &str, key: i64) -> Result<Vec<T>, sqlx::Error>
where
    E: PgExecutor<'e>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    sqlx::query_as::<_, T>(sql).bind(key).fetch_all(executor).await
}

/// Runs `sql` with a single `$1` key and returns the id column of the first row, if any.
pub async fn select_id<'e, E>(executor: E, sql: &str, key: i64) -> Result<Option<i64>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(sql)
        .bind(key)
        .fetch_optional(executor)
        .await
}
