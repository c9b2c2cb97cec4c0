//! Sweep of stored push tokens that the provider no longer accepts.
//!
//! Every stored token is probed with a dry-run send. Tokens reported as
//! invalid or unregistered are cleared in one batch at the end. Any other
//! probe error keeps the token. A store failure aborts the run, and the
//! next scheduled run starts over.

use futures::{stream, StreamExt};

use model::user::UserToken;

use crate::{error::Error, gateway::PushGateway};

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Every user whose token field is set.
    async fn users_with_tokens(&self) -> Result<Vec<UserToken>, Error>;

    /// Clears all given tokens in a single atomic write, returns the number cleared.
    async fn clear_tokens(&self, tokens: &[UserToken]) -> Result<usize, Error>;
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct CleanupReport {
    pub checked: usize,
    pub invalid: usize,
    pub cleared: usize,
    pub kept_on_error: usize,
}

pub struct TokenCleanup<S, G> {
    store: S,
    gateway: G,
    probe_concurrency: usize,
}

impl<S: TokenStore, G: PushGateway> TokenCleanup<S, G> {
    pub fn new(store: S, gateway: G, probe_concurrency: usize) -> Self {
        TokenCleanup {
            store,
            gateway,
            probe_concurrency: probe_concurrency.max(1),
        }
    }

    pub async fn run(&self) -> Result<CleanupReport, Error> {
        let users = self.store.users_with_tokens().await?;
        log::info!("Checking {} stored push token(s)", users.len());

        let mut report = CleanupReport::default();
        let mut invalid = Vec::new();

        let mut probes = stream::iter(&users)
            .map(|user| async move { (user, self.gateway.validate(&user.fcm_token).await) })
            .buffer_unordered(self.probe_concurrency);

        while let Some((user, outcome)) = probes.next().await {
            report.checked += 1;
            match outcome {
                Ok(()) => {}
                Err(err) if err.is_invalid_token() => {
                    log::info!("Token of user {} is invalid: {}", user.user_uid, err);
                    invalid.push(user.clone());
                }
                Err(err) => {
                    report.kept_on_error += 1;
                    log::warn!(
                        "Could not check token of user {}, keeping it: {}",
                        user.user_uid,
                        err
                    );
                }
            }
        }

        report.invalid = invalid.len();

        if invalid.is_empty() {
            log::info!("No invalid tokens found");
            return Ok(report);
        }

        report.cleared = self.store.clear_tokens(&invalid).await?;
        log::info!(
            "Cleared {} invalid token(s) out of {} checked",
            report.cleared,
            report.checked
        );

        Ok(report)
    }
}
