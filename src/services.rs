use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::repositories::{beacon::StaticBeaconRules, SystemClock};
use crate::settings::Settings;

pub mod beacon;
pub mod hives;
mod http;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Not authorized: {0}")]
    NotAuthorized(String),
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Cancelled: {0}")]
    Cancelled(String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(
    pool: PgPool,
    settings: Settings,
    listen: &str,
) -> Result<(), anyhow::Error> {
    let (hive_tx, mut hive_rx) = mpsc::channel(512);

    let tier_table = settings.tier_table()?;
    beacon::parse_beacon_rules(&settings.beacon.rules)?;
    let repositories = hives::HiveRepositories::new(pool, &settings);
    let handler = hives::HiveRequestHandler::new(
        repositories,
        Arc::new(SystemClock),
        Arc::new(StaticBeaconRules::new(settings.beacon.rules.clone())),
        tier_table,
        settings.beacon.products.clone(),
        Duration::from_secs(settings.request_timeout_secs),
    );
    let mut hive_service = hives::HiveService::new();

    log::info!("Starting hive service.");
    tokio::spawn(async move {
        hive_service.run(handler, &mut hive_rx).await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(listen, hive_tx).await
}
