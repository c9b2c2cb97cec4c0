//! Callable fan-out of one notification to many devices.
//!
//! A failed send to one token is counted and logged but never fails the call.
//! The call itself is rejected only for a missing caller, malformed input or
//! a failure outside of the per-token sends.

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

use model::{
    notification::{DispatchResult, NotificationPayload},
    time::DateTimeUtc,
    user::{FcmToken, UserUid},
};

use crate::{
    error::DispatchError,
    gateway::{PushGateway, PushMessage},
};

#[derive(Clone, PartialEq, Eq, Serialize, Debug)]
pub struct DispatchResponse {
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
    pub message: String,
}

impl From<DispatchResult> for DispatchResponse {
    fn from(result: DispatchResult) -> Self {
        DispatchResponse {
            success: true,
            sent: result.sent,
            failed: result.failed,
            message: result.summary(),
        }
    }
}

/// Validated dispatch request.
#[derive(Clone, PartialEq, Debug)]
pub struct DispatchRequest {
    pub caller: UserUid,
    pub tokens: Vec<FcmToken>,
    pub payload: NotificationPayload,
}

impl DispatchRequest {
    /// Checks the caller and the raw `{ tokens, notification }` body,
    /// in that order, before anything is sent.
    pub fn parse(
        caller: Option<&UserUid>,
        body: &Value,
        now: DateTimeUtc,
    ) -> Result<Self, DispatchError> {
        let caller = caller.ok_or(DispatchError::Unauthenticated)?.clone();

        let tokens = body
            .get("tokens")
            .and_then(Value::as_array)
            .filter(|tokens| !tokens.is_empty())
            .and_then(|tokens| {
                tokens
                    .iter()
                    .map(|t| t.as_str().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or_else(|| {
                DispatchError::InvalidArgument(
                    "tokens must be a non-empty array of strings".to_string(),
                )
            })?;

        let payload = body
            .get("notification")
            .and_then(|n| NotificationPayload::from_json(n, now))
            .ok_or_else(|| {
                DispatchError::InvalidArgument("notification must be an object".to_string())
            })?;

        Ok(DispatchRequest {
            caller,
            tokens,
            payload,
        })
    }
}

pub struct Dispatcher<G> {
    gateway: G,
}

impl<G: PushGateway> Dispatcher<G> {
    pub fn new(gateway: G) -> Self {
        Dispatcher { gateway }
    }

    pub async fn dispatch(
        &self,
        caller: Option<&UserUid>,
        body: &Value,
    ) -> Result<DispatchResponse, DispatchError> {
        let request = DispatchRequest::parse(caller, body, Utc::now())?;

        let message = PushMessage::from_payload(&request.payload).map_err(|e| {
            log::error!("Failed to build push message: {}", e);
            DispatchError::Internal(e.to_string())
        })?;

        let result = self.fan_out(&request.tokens, &message).await;

        log::info!(
            "Dispatched '{}' for baby {} by {}: sent {}, failed {}",
            request.payload.data.activity_type,
            request.payload.data.baby_id,
            request.caller,
            result.sent,
            result.failed
        );

        Ok(result.into())
    }

    /// Sends to all tokens concurrently and waits for every send to settle.
    pub async fn fan_out(&self, tokens: &[FcmToken], message: &PushMessage) -> DispatchResult {
        let sends = tokens.iter().enumerate().map(|(index, token)| async move {
            (index, self.gateway.send(token, message).await)
        });

        let outcomes = join_all(sends).await;

        let mut result = DispatchResult::default();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(()) => result.sent += 1,
                Err(err) => {
                    result.failed += 1;
                    log::warn!("Failed to send notification to token #{}: {}", index, err);
                }
            }
        }
        result
    }
}
