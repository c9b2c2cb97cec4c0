use std::{convert::Infallible, sync::Arc};

use database::{pool::PgAsyncPool, user};
use model::user::{FcmToken, UserUid};
use notifications::{
    dispatcher::Dispatcher, fcm_gateway::FcmRemoteGateway, gateway::PushGateway, DispatchError,
};
use warp::{http::StatusCode, reply::Json, Filter, Rejection, Reply};
use wavesexchange_warp::{log::access, MetricsWarpBuilder};

use crate::error::Error;

type Pool = Arc<PgAsyncPool>;

/// Uid of the authenticated caller, set by the auth proxy in front of the service.
const CALLER_HEADER: &str = "X-User-Uid";
const FCM_TOKEN_HEADER: &str = "X-Fcm-Uid";

pub async fn start(
    port: u16,
    metrics_port: u16,
    dispatcher: Arc<Dispatcher<FcmRemoteGateway>>,
    users: user::Repo,
    pool: PgAsyncPool,
) {
    let pool = Arc::new(pool);

    let log = warp::log::custom(access);

    log::info!("Starting push-notifications API server at 0.0.0.0:{}", port);

    let routes = notifications_send(dispatcher)
        .or(device_register(users.clone(), pool.clone()))
        .or(device_unregister(users, pool))
        .recover(handle_rejection)
        .with(log);

    MetricsWarpBuilder::new()
        .with_main_routes(routes)
        .with_main_routes_port(port)
        .with_metrics_port(metrics_port)
        .run_async()
        .await;
}

/// Rejects as `unauthenticated` before any other input of the route is read.
fn caller() -> impl Filter<Extract = (UserUid,), Error = Rejection> + Clone {
    warp::header::optional::<UserUid>(CALLER_HEADER).and_then(
        |caller: Option<UserUid>| async move {
            caller.ok_or_else(|| warp::reject::custom(Error::from(DispatchError::Unauthenticated)))
        },
    )
}

fn notifications_send<G: PushGateway + 'static>(
    dispatcher: Arc<Dispatcher<G>>,
) -> impl Filter<Extract = (Json,), Error = Rejection> + Clone {
    let with_dispatcher = warp::any().map(move || dispatcher.clone());

    warp::post()
        .and(warp::path!("notifications" / "send"))
        .and(caller())
        .and(with_dispatcher)
        .and(warp::body::json::<serde_json::Value>())
        .and_then(controllers::send_notifications::<G>)
}

fn device_register(
    users: user::Repo,
    pool: Pool,
) -> impl Filter<Extract = (StatusCode,), Error = Rejection> + Clone {
    let with_users = warp::any().map(move || users.clone());
    let with_pool = warp::any().map(move || pool.clone());

    warp::put()
        .and(warp::path!("device"))
        .and(caller())
        .and(warp::header::<FcmToken>(FCM_TOKEN_HEADER))
        .and(with_users)
        .and(with_pool)
        .and_then(controllers::register_device)
}

fn device_unregister(
    users: user::Repo,
    pool: Pool,
) -> impl Filter<Extract = (StatusCode,), Error = Rejection> + Clone {
    let with_users = warp::any().map(move || users.clone());
    let with_pool = warp::any().map(move || pool.clone());

    warp::delete()
        .and(warp::path!("device"))
        .and(caller())
        .and(with_users)
        .and(with_pool)
        .and_then(controllers::unregister_device)
}

async fn handle_rejection(rej: Rejection) -> Result<impl Reply, Infallible> {
    let (status, code, message) = if let Some(err) = rej.find::<Error>() {
        if err.status().is_server_error() {
            log::error!("{}", err);
        }
        (err.status(), err.code(), err.public_message())
    } else if rej.is_not_found() {
        (StatusCode::NOT_FOUND, "not-found", "Not found".to_string())
    } else if let Some(e) = rej.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "invalid-argument", e.to_string())
    } else if let Some(e) = rej.find::<warp::reject::MissingHeader>() {
        (StatusCode::BAD_REQUEST, "invalid-argument", e.to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method-not-allowed",
            "Method not allowed".to_string(),
        )
    } else {
        log::error!("Unhandled rejection: {:?}", rej);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "Internal server error".to_string(),
        )
    };

    let body = dto::ErrorResponse {
        error: dto::ErrorBody {
            status: code,
            message,
        },
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

mod controllers {
    use super::Pool;
    use database::user;
    use diesel_async::{scoped_futures::ScopedFutureExt as _, AsyncConnection};
    use model::user::{FcmToken, UserUid};
    use notifications::{dispatcher::Dispatcher, gateway::PushGateway};
    use std::sync::Arc;
    use warp::{http::StatusCode, reply::Json, Rejection};

    use crate::error::Error;

    pub async fn send_notifications<G: PushGateway>(
        caller: UserUid,
        dispatcher: Arc<Dispatcher<G>>,
        body: serde_json::Value,
    ) -> Result<Json, Rejection> {
        let response = dispatcher
            .dispatch(Some(&caller), &body)
            .await
            .map_err(Error::from)?;

        Ok(warp::reply::json(&response))
    }

    pub async fn register_device(
        user_uid: UserUid,
        fcm_token: FcmToken,
        users: user::Repo,
        pool: Pool,
    ) -> Result<StatusCode, Rejection> {
        pool.get()
            .await
            .map_err(Error::from)?
            .transaction(|conn| {
                async move {
                    // All work only within db transaction
                    let stored = users.token(&user_uid, conn).await?;
                    let status = registration_status(stored.as_ref(), &fcm_token);
                    if status == StatusCode::CREATED {
                        users.set_token(&user_uid, &fcm_token, conn).await?;
                    }

                    Ok::<StatusCode, Error>(status)
                }
                .scope_boxed()
            })
            .await
            .map_err(Into::into)
    }

    pub async fn unregister_device(
        user_uid: UserUid,
        users: user::Repo,
        pool: Pool,
    ) -> Result<StatusCode, Rejection> {
        let mut conn = pool.get().await.map_err(Error::from)?;
        users
            .clear_token(&user_uid, &mut conn)
            .await
            .map_err(Error::from)?;

        Ok(StatusCode::NO_CONTENT)
    }

    /// `204` when the device already holds this token, `201` when it gets stored.
    pub fn registration_status(stored: Option<&FcmToken>, token: &FcmToken) -> StatusCode {
        if stored == Some(token) {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::CREATED
        }
    }
}

mod dto {
    use serde::Serialize;

    #[derive(Serialize)]
    pub struct ErrorResponse {
        pub error: ErrorBody,
    }

    #[derive(Serialize)]
    pub struct ErrorBody {
        pub status: &'static str,
        pub message: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel_async::{pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection};
    use notifications::gateway::{PushMessage, SendError};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Accepts every token and records it.
    #[derive(Clone, Default)]
    struct RecordingGateway {
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl PushGateway for RecordingGateway {
        async fn send(&self, token: &str, _message: &PushMessage) -> Result<(), SendError> {
            self.sent.lock().unwrap().push(token.to_string());
            Ok(())
        }

        async fn validate(&self, _token: &str) -> Result<(), SendError> {
            Ok(())
        }
    }

    /// Pool that never connects; only usable by requests rejected before the handler.
    fn unconnected_pool() -> Pool {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new("postgres://localhost/unused");
        Arc::new(bb8::Pool::builder().build_unchecked(manager))
    }

    fn body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn error_body(status: &str, message: &str) -> Value {
        json!({ "error": { "status": status, "message": message } })
    }

    async fn rejection_reply(rej: Rejection) -> (StatusCode, Value) {
        let response = handle_rejection(rej).await.unwrap().into_response();
        let status = response.status();
        let bytes = warp::hyper::body::to_bytes(response.into_body())
            .await
            .unwrap();
        (status, body(&bytes))
    }

    #[tokio::test]
    async fn send_without_caller_is_unauthenticated_before_body_is_read() {
        let gateway = RecordingGateway::default();
        let routes = notifications_send(Arc::new(Dispatcher::new(gateway.clone())))
            .recover(handle_rejection);

        let res = warp::test::request()
            .method("POST")
            .path("/notifications/send")
            .body("not json")
            .reply(&routes)
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body(res.body()),
            error_body(
                "unauthenticated",
                "The function must be called while authenticated."
            )
        );
        assert!(gateway.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_with_caller_and_malformed_body() {
        let gateway = RecordingGateway::default();
        let routes = notifications_send(Arc::new(Dispatcher::new(gateway.clone())))
            .recover(handle_rejection);

        let res = warp::test::request()
            .method("POST")
            .path("/notifications/send")
            .header(CALLER_HEADER, "parent-1")
            .json(&json!({ "tokens": [], "notification": {} }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body(res.body()),
            error_body(
                "invalid-argument",
                "tokens must be a non-empty array of strings"
            )
        );

        let res = warp::test::request()
            .method("POST")
            .path("/notifications/send")
            .header(CALLER_HEADER, "parent-1")
            .body("not json")
            .reply(&routes)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(res.body())["error"]["status"], "invalid-argument");
        assert!(gateway.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_reports_counts() {
        let gateway = RecordingGateway::default();
        let routes = notifications_send(Arc::new(Dispatcher::new(gateway.clone())))
            .recover(handle_rejection);

        let res = warp::test::request()
            .method("POST")
            .path("/notifications/send")
            .header(CALLER_HEADER, "parent-1")
            .json(&json!({
                "tokens": ["t1", "t2"],
                "notification": { "title": "Sleep", "body": "Mia fell asleep" },
            }))
            .reply(&routes)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body(res.body()),
            json!({
                "success": true,
                "sent": 2,
                "failed": 0,
                "message": "Notifications sent: 2 of 2, failed: 0",
            })
        );
        assert_eq!(gateway.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn device_routes_check_caller_first() {
        let pool = unconnected_pool();
        let routes = device_register(user::Repo {}, pool.clone())
            .or(device_unregister(user::Repo {}, pool))
            .recover(handle_rejection);

        // Neither header set
        let res = warp::test::request()
            .method("PUT")
            .path("/device")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body(res.body())["error"]["status"], "unauthenticated");

        let res = warp::test::request()
            .method("DELETE")
            .path("/device")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = warp::test::request()
            .method("PUT")
            .path("/device")
            .header(CALLER_HEADER, "parent-1")
            .reply(&routes)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(res.body())["error"]["status"], "invalid-argument");
    }

    #[tokio::test]
    async fn rejection_bodies() {
        let (status, body) =
            rejection_reply(warp::reject::custom(Error::from(DispatchError::Unauthenticated)))
                .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            error_body(
                "unauthenticated",
                "The function must be called while authenticated."
            )
        );

        let invalid = DispatchError::InvalidArgument("notification must be an object".to_string());
        let (status, body) = rejection_reply(warp::reject::custom(Error::from(invalid))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            error_body("invalid-argument", "notification must be an object")
        );

        let internal = DispatchError::Internal("key must be a string".to_string());
        let (status, body) = rejection_reply(warp::reject::custom(Error::from(internal))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, error_body("internal", "Failed to send notifications"));

        let db = Error::from(diesel::result::Error::NotFound);
        let (status, body) = rejection_reply(warp::reject::custom(db)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, error_body("internal", "Internal server error"));

        let (status, body) = rejection_reply(warp::reject::not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, error_body("not-found", "Not found"));
    }

    #[test]
    fn registration_statuses() {
        let token = "token-1".to_string();
        assert_eq!(
            controllers::registration_status(Some(&token), &token),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            controllers::registration_status(Some(&"token-0".to_string()), &token),
            StatusCode::CREATED
        );
        assert_eq!(
            controllers::registration_status(None, &token),
            StatusCode::CREATED
        );
    }
}
