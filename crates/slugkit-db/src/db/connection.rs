//! Postgres connection pool backing [`PgCollection`](crate::db::postgres::PgCollection).

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

use slugkit_core::config::DatabaseConfig;

use crate::db::DbProvider;
use crate::error::DbResult;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

/// ## Summary
/// Opens a pool for duplicate-count queries.
///
/// A save runs at most one count per hook, so a small pool is enough;
/// connections are not tested on checkout and a dead one surfaces as a
/// query error from the hook.
///
/// ## Errors
/// Returns an error if the pool cannot be built for `database_url`.
#[tracing::instrument(skip(database_url), fields(pool_size = size))]
pub async fn create_pool(database_url: &str, size: u32) -> anyhow::Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(size)
        .test_on_check_out(false)
        .build(manager)
        .await?;

    tracing::info!(pool_size = size, "Slug count pool ready");
    Ok(pool)
}

/// ## Summary
/// Opens a pool sized by the `[database]` settings section.
///
/// ## Errors
/// Returns an error if the pool cannot be built.
pub async fn create_pool_from_config(config: &DatabaseConfig) -> anyhow::Result<DbPool> {
    create_pool(&config.url, u32::from(config.max_connections)).await
}

impl DbProvider for DbPool {
    fn get_connection<'a>(
        &'a self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = DbResult<DbConnection<'a>>> + Send + 'a>>
    {
        Box::pin(async move {
            self.get().await.map_err(|e| {
                tracing::warn!(error = %e, "No pooled connection for slug count");
                e.into()
            })
        })
    }
}
