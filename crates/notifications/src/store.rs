//! Postgres-backed token store

use database::{pool::PgAsyncPool, user};
use diesel_async::{scoped_futures::ScopedFutureExt as _, AsyncConnection};

use model::user::UserToken;

use crate::{cleanup::TokenStore, error::Error};

pub struct PgTokenStore {
    pool: PgAsyncPool,
    users: user::Repo,
}

impl PgTokenStore {
    pub fn new(pool: PgAsyncPool, users: user::Repo) -> Self {
        PgTokenStore { pool, users }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn users_with_tokens(&self) -> Result<Vec<UserToken>, Error> {
        let mut conn = self.pool.get().await?;
        let tokens = self.users.users_with_tokens(&mut conn).await?;
        Ok(tokens)
    }

    async fn clear_tokens(&self, tokens: &[UserToken]) -> Result<usize, Error> {
        let users = &self.users;
        let cleared = self
            .pool
            .get()
            .await?
            .transaction(|conn| {
                async move {
                    // All deletions commit together or not at all
                    users.clear_tokens(tokens, conn).await
                }
                .scope_boxed()
            })
            .await?;
        Ok(cleared)
    }
}
