use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates a PostgreSQL connection pool
///
/// Shared by the catalog and watch-history providers. The pool size comes
/// from `DATABASE_MAX_CONNECTIONS`.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections, "Connected to PostgreSQL");

    Ok(pool)
}
