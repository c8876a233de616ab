use std::sync::Arc;

use anyhow::{Error, Result};
use messaging_console::{
    api::{AppState, run_api_server},
    clients::{backend::BackendClient, poller::MessagePoller},
    config::Config,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    info!(base_url = %config.api_base_url, "Configuration validated");

    let client = BackendClient::new(&config)?;
    let poller = MessagePoller::spawn(client.clone(), config.poll_interval());
    let state = Arc::new(AppState::new(client, poller.subscribe()));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    let served = run_api_server(&config, state, shutdown).await;

    poller.shutdown().await;
    info!("Console stopped");

    served
}
