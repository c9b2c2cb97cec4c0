//! Daily sweep of push tokens the provider reports as invalid

extern crate wavesexchange_log as log;

mod config;
mod schedule;

use chrono::Utc;
use tokio::task;
use wavesexchange_warp::MetricsWarpBuilder;

use database::{pool, user};
use notifications::{
    cleanup::{TokenCleanup, TokenStore},
    fcm_gateway::FcmRemoteGateway,
    gateway::PushGateway,
    store::PgTokenStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configs
    let pg_config = database::config::Config::load()?;
    let config = config::Config::load()?;
    log::info!(
        "Starting push-notifications token cleanup service with {:?}",
        config
    );

    log::info!("Connecting to postgres database: {:?}", pg_config);
    let pool = pool::async_pool(&pg_config).await?;

    let store = PgTokenStore::new(pool, user::Repo {});
    let gateway = FcmRemoteGateway::new(config.fcm)?;
    let cleanup = TokenCleanup::new(store, gateway, config.probe_concurrency);

    // Stats & liveness endpoints
    task::spawn(
        MetricsWarpBuilder::new()
            .with_metrics_port(config.metrics_port)
            .run_async(),
    );

    if config.run_on_start {
        run_once(&cleanup).await;
    }

    loop {
        let now = Utc::now();
        let next_run = config.schedule.next_run(now);
        log::info!("Next token cleanup at {}", next_run);

        // Negative only if the clock jumped, then run right away
        tokio::time::sleep((next_run - now).to_std().unwrap_or_default()).await;

        run_once(&cleanup).await;
    }
}

/// A failed run is only logged, the next tick starts from scratch.
async fn run_once<S: TokenStore, G: PushGateway>(cleanup: &TokenCleanup<S, G>) {
    match cleanup.run().await {
        Ok(report) => {
            log::info!(
                "Token cleanup finished: checked {}, invalid {}, cleared {}, kept on error {}",
                report.checked,
                report.invalid,
                report.cleared,
                report.kept_on_error
            );
        }
        Err(err) => {
            log::error!(
                "Token cleanup failed, will retry at next scheduled run: {}",
                err
            );
        }
    }
}
