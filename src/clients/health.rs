use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::backend::BackendClient,
    models::{
        health::{HealthCheckResponse, PollerHealth, ServiceHealth},
        message::MessagesSnapshot,
    },
};

pub struct HealthChecker {
    client: BackendClient,
}

impl HealthChecker {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn check_all(&self, snapshot: &MessagesSnapshot) -> HealthCheckResponse {
        let backend = self.check_backend().await;

        HealthCheckResponse {
            status: backend.status.clone(),
            timestamp: Utc::now(),
            backend,
            poller: PollerHealth {
                last_fetched_at: snapshot.fetched_at,
                last_error: snapshot.error.clone(),
            },
        }
    }

    async fn check_backend(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.client.ping().await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Backend health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Backend health check failed");
                ServiceHealth::unhealthy(e.to_string())
            }
        }
    }
}
