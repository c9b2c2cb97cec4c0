//! Firebase Cloud Messaging implementation of the push gateway

use std::fmt;

use serde::Deserialize;

use crate::{
    error::Error,
    gateway::{ProviderError, PushGateway, PushMessage, SendError},
};

#[derive(Deserialize, Clone)]
pub struct FcmConfig {
    pub api_key: String,
    #[serde(default)]
    pub click_action: Option<String>,
    /// Turns every send into a dry run, nothing gets delivered.
    #[serde(default)]
    pub dry_run: bool,
}

impl FcmConfig {
    pub fn load() -> Result<Self, envy::Error> {
        envy::prefixed("FCM_").from_env::<FcmConfig>()
    }
}

impl fmt::Debug for FcmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally avoid printing FCM API Key for security reasons
        f.debug_struct("FcmConfig")
            .field("api_key", &"****")
            .field("click_action", &self.click_action)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

pub struct FcmRemoteGateway {
    client: fcm::Client,
    api_key: String,
    click_action: Option<String>,
    dry_run: bool,
}

impl FcmRemoteGateway {
    pub fn new(config: FcmConfig) -> Result<Self, Error> {
        if config.api_key.trim().is_empty() {
            return Err(Error::GatewayError("FCM API key is empty".to_string()));
        }
        Ok(FcmRemoteGateway {
            client: fcm::Client::new(),
            api_key: config.api_key,
            click_action: config.click_action,
            dry_run: config.dry_run,
        })
    }

    fn fcm_message<'a>(
        &'a self,
        token: &'a str,
        message: Option<&'a PushMessage>,
        dry_run: bool,
    ) -> Result<fcm::Message<'a>, SendError> {
        let mut builder = fcm::MessageBuilder::new(&self.api_key, token);
        builder.dry_run(dry_run);

        if let Some(message) = message {
            let notification = {
                let mut builder = fcm::NotificationBuilder::new();
                builder.title(&message.title);
                builder.body(&message.body);
                if let Some(click_action) = &self.click_action {
                    builder.click_action(click_action);
                }
                builder.finalize()
            };
            builder.notification(notification);
            builder
                .data(&message.data)
                .map_err(|e| SendError::Transport(e.to_string()))?;
        }

        Ok(builder.finalize())
    }

    async fn deliver(&self, fcm_msg: fcm::Message<'_>) -> Result<(), SendError> {
        let response = self
            .client
            .send(fcm_msg)
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let reason = match response.error {
            Some(reason) => Some(reason),
            None => response
                .results
                .unwrap_or_default()
                .into_iter()
                .find_map(|result| result.error),
        };

        match reason {
            Some(reason) => Err(SendError::Rejected(provider_error(reason))),
            None => Ok(()),
        }
    }
}

fn provider_error(reason: fcm::ErrorReason) -> ProviderError {
    use fcm::ErrorReason as R;
    match reason {
        R::InvalidRegistration => ProviderError::InvalidRegistration,
        R::NotRegistered => ProviderError::NotRegistered,
        R::MissingRegistration => ProviderError::MissingRegistration,
        R::MismatchSenderId => ProviderError::MismatchSenderId,
        R::MessageTooBig => ProviderError::MessageTooBig,
        R::Unavailable => ProviderError::Unavailable,
        R::InternalServerError => ProviderError::InternalServerError,
        R::DeviceMessageRateExceeded => ProviderError::DeviceMessageRateExceeded,
        other => ProviderError::Other(format!("{:?}", other)),
    }
}

#[async_trait]
impl PushGateway for FcmRemoteGateway {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<(), SendError> {
        let fcm_msg = self.fcm_message(token, Some(message), self.dry_run)?;
        self.deliver(fcm_msg).await
    }

    async fn validate(&self, token: &str) -> Result<(), SendError> {
        let fcm_msg = self.fcm_message(token, None, true)?;
        self.deliver(fcm_msg).await
    }
}
