use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use model::user::{FcmToken, UserToken, UserUid};

use crate::{error::Error, schema::users};

/// Push tokens stored on user records, at most one per user.
#[derive(Clone)]
pub struct Repo {}

impl Repo {
    pub async fn users_with_tokens(
        &self,
        conn: &mut AsyncPgConnection,
    ) -> Result<Vec<UserToken>, Error> {
        let rows = users::table
            .select((users::uid, users::fcm_token))
            .filter(users::fcm_token.is_not_null())
            .order(users::uid)
            .load::<(String, Option<String>)>(conn)
            .await?;

        let tokens = rows
            .into_iter()
            .filter_map(|(user_uid, fcm_token)| {
                fcm_token.map(|fcm_token| UserToken {
                    user_uid,
                    fcm_token,
                })
            })
            .collect();

        Ok(tokens)
    }

    /// `None` both for users without a token and for unknown users.
    pub async fn token(
        &self,
        user_uid: &UserUid,
        conn: &mut AsyncPgConnection,
    ) -> Result<Option<FcmToken>, Error> {
        let token = users::table
            .select(users::fcm_token)
            .filter(users::uid.eq(user_uid))
            .first::<Option<String>>(conn)
            .await;

        match token {
            Ok(token) => Ok(token),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores the token, creating the user record if there is none yet.
    pub async fn set_token(
        &self,
        user_uid: &UserUid,
        fcm_token: &FcmToken,
        conn: &mut AsyncPgConnection,
    ) -> Result<(), Error> {
        let now = Utc::now();

        diesel::insert_into(users::table)
            .values((
                users::uid.eq(user_uid),
                users::created_at.eq(now),
                users::updated_at.eq(now),
                users::fcm_token.eq(fcm_token),
                users::fcm_token_updated_at.eq(now),
            ))
            .on_conflict(users::uid)
            .do_update()
            .set((
                users::updated_at.eq(now),
                users::fcm_token.eq(fcm_token),
                users::fcm_token_updated_at.eq(now),
            ))
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Returns `false` if the user had no token.
    pub async fn clear_token(
        &self,
        user_uid: &UserUid,
        conn: &mut AsyncPgConnection,
    ) -> Result<bool, Error> {
        let now = Utc::now();

        let num_rows = diesel::update(
            users::table
                .filter(users::uid.eq(user_uid))
                .filter(users::fcm_token.is_not_null()),
        )
        .set((
            users::updated_at.eq(now),
            users::fcm_token.eq(None::<String>),
            users::fcm_token_updated_at.eq(now),
        ))
        .execute(conn)
        .await?;

        Ok(num_rows > 0)
    }

    /// Clears each listed token, but only where the user still holds that
    /// same token. Run it inside a transaction to apply all or nothing.
    pub async fn clear_tokens(
        &self,
        tokens: &[UserToken],
        conn: &mut AsyncPgConnection,
    ) -> Result<usize, Error> {
        let now = Utc::now();
        let mut cleared = 0;

        for token in tokens {
            cleared += diesel::update(
                users::table
                    .filter(users::uid.eq(&token.user_uid))
                    .filter(users::fcm_token.eq(&token.fcm_token)),
            )
            .set((
                users::updated_at.eq(now),
                users::fcm_token.eq(None::<String>),
                users::fcm_token_updated_at.eq(now),
            ))
            .execute(conn)
            .await?;
        }

        Ok(cleared)
    }
}
