use diesel_async::{
    pooled_connection::{bb8::Pool, AsyncDieselConnectionManager, PoolError},
    AsyncPgConnection,
};

use crate::config::Config;

pub type PgAsyncPool = Pool<AsyncPgConnection>;

pub async fn async_pool(config: &Config) -> Result<PgAsyncPool, PoolError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url());

    Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connection_timeout())
        .build(manager)
        .await
}
