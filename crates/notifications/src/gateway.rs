//! Push provider seam

use std::fmt;

use model::notification::NotificationPayload;
use thiserror::Error;

/// Message shared by every device of one dispatch.
#[derive(Clone, PartialEq, Debug)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// JSON object, delivered unchanged
    pub data: serde_json::Value,
}

impl PushMessage {
    pub fn from_payload(payload: &NotificationPayload) -> Result<Self, serde_json::Error> {
        Ok(PushMessage {
            title: payload.title.clone(),
            body: payload.body.clone(),
            data: serde_json::to_value(&payload.data)?,
        })
    }
}

/// Error codes reported by the push provider for a single token.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ProviderError {
    InvalidRegistration,
    NotRegistered,
    MissingRegistration,
    MismatchSenderId,
    MessageTooBig,
    Unavailable,
    InternalServerError,
    DeviceMessageRateExceeded,
    Other(String),
}

impl ProviderError {
    /// Only these two codes prove that a token will never work again.
    /// Anything else, including codes added later, leaves the token alone.
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            ProviderError::InvalidRegistration | ProviderError::NotRegistered
        )
    }

    pub fn code(&self) -> &str {
        match self {
            ProviderError::InvalidRegistration => "InvalidRegistration",
            ProviderError::NotRegistered => "NotRegistered",
            ProviderError::MissingRegistration => "MissingRegistration",
            ProviderError::MismatchSenderId => "MismatchSenderId",
            ProviderError::MessageTooBig => "MessageTooBig",
            ProviderError::Unavailable => "Unavailable",
            ProviderError::InternalServerError => "InternalServerError",
            ProviderError::DeviceMessageRateExceeded => "DeviceMessageRateExceeded",
            ProviderError::Other(code) => code,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("rejected by push provider: {0}")]
    Rejected(ProviderError),

    #[error("push provider request failed: {0}")]
    Transport(String),
}

impl SendError {
    pub fn is_invalid_token(&self) -> bool {
        match self {
            SendError::Rejected(e) => e.is_invalid_token(),
            SendError::Transport(_) => false,
        }
    }
}

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Delivers the message to one device.
    async fn send(&self, token: &str, message: &PushMessage) -> Result<(), SendError>;

    /// Dry-run send: asks the provider to check the token without delivering anything.
    async fn validate(&self, token: &str) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::notification::ActivityData;
    use serde_json::json;

    #[test]
    fn invalid_token_codes() {
        assert!(ProviderError::InvalidRegistration.is_invalid_token());
        assert!(ProviderError::NotRegistered.is_invalid_token());
        assert!(!ProviderError::Unavailable.is_invalid_token());
        assert!(!ProviderError::MismatchSenderId.is_invalid_token());
        assert!(!ProviderError::Other("SomethingNew".to_string()).is_invalid_token());
        assert!(!SendError::Transport("timeout".to_string()).is_invalid_token());
        assert!(SendError::Rejected(ProviderError::NotRegistered).is_invalid_token());
    }

    #[test]
    fn error_messages_carry_provider_code() {
        let err = SendError::Rejected(ProviderError::Other("QuotaExceeded".to_string()));
        assert_eq!(err.to_string(), "rejected by push provider: QuotaExceeded");
    }

    #[test]
    fn message_from_payload() {
        let payload = NotificationPayload {
            title: "Diaper".to_string(),
            body: "Changed at 10:00".to_string(),
            data: ActivityData {
                baby_id: "b1".to_string(),
                activity_type: "diaper".to_string(),
                ..Default::default()
            },
        };
        let message = PushMessage::from_payload(&payload).expect("serialize");
        assert_eq!(message.title, "Diaper");
        assert_eq!(message.data["babyId"], json!("b1"));
        assert_eq!(message.data["activityType"], json!("diaper"));
        assert_eq!(message.data["partnerName"], json!(""));
    }
}
