//! Push notifications API service executable

extern crate wavesexchange_log as log;

mod api;
mod config;
mod error;

use std::sync::Arc;

use database::{pool, user};
use notifications::{dispatcher::Dispatcher, fcm_gateway::FcmRemoteGateway};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let pg_config = database::config::Config::load()?;
    let config = config::Config::load()?;
    log::info!("Starting push-notifications api service with {:?}", config);

    log::info!("Connecting to postgres database: {:?}", pg_config);
    let pool = pool::async_pool(&pg_config).await?;

    let gateway = FcmRemoteGateway::new(config.fcm)?;
    let dispatcher = Arc::new(Dispatcher::new(gateway));
    let users = user::Repo {};

    api::start(config.port, config.metrics_port, dispatcher, users, pool).await;

    Ok(())
}
