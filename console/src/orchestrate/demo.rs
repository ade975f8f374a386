//! Demo application controller
//!
//! One extra entity outside both groups. Lifecycle operations mirror the
//! group entities; its actions are only offered while the top-level combined
//! status is fully healthy.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::ConsoleError;
use crate::http::api::OrchestratorApi;
use crate::models::entity::{CombinedStatus, EntityStatus};
use crate::orchestrate::{OrchestratorOptions, Origin};
use crate::store::StateStore;

pub struct DemoController {
    api: Arc<dyn OrchestratorApi>,
    store: Arc<StateStore>,
    options: OrchestratorOptions,
    enabled: RwLock<bool>,
}

impl DemoController {
    pub fn new(
        api: Arc<dyn OrchestratorApi>,
        store: Arc<StateStore>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            api,
            store,
            options,
            enabled: RwLock::new(false),
        }
    }

    /// Whether demo actions are currently offered
    pub async fn enabled(&self) -> bool {
        *self.enabled.read().await
    }

    /// Re-evaluate the visibility gate: enabled iff every other entity is
    /// up. Called after every demo state change and after each top-level
    /// status run.
    pub async fn refresh_gate(&self) {
        tokio::time::sleep(self.options.settle_delay).await;

        let enabled = self.store.combined().await == CombinedStatus::Healthy;
        *self.enabled.write().await = enabled;
    }

    pub async fn start(&self, origin: Origin) -> Result<EntityStatus, ConsoleError> {
        let demo = self.store.demo().await;
        if origin.is_user() && demo.status == EntityStatus::Progress {
            return Err(ConsoleError::Busy);
        }

        self.store.set_demo_status(EntityStatus::Progress).await;

        match self.api.startup(&demo.target()).await {
            Ok(()) => info!("Demo started"),
            Err(e) => warn!("Failed to start demo: {}", e),
        }

        self.health_check(Origin::Orchestrated).await
    }

    pub async fn stop(&self, origin: Origin) -> Result<EntityStatus, ConsoleError> {
        let demo = self.store.demo().await;
        if origin.is_user() && demo.status == EntityStatus::Progress {
            return Err(ConsoleError::Busy);
        }

        self.store.set_demo_status(EntityStatus::Progress).await;

        match self.api.shutdown(&demo.target()).await {
            Ok(()) => info!("Demo stopped"),
            Err(e) => warn!("Failed to stop demo: {}", e),
        }

        self.health_check(Origin::Orchestrated).await
    }

    pub async fn health_check(&self, origin: Origin) -> Result<EntityStatus, ConsoleError> {
        let demo = self.store.demo().await;
        if origin.is_user() && demo.status == EntityStatus::Progress {
            return Err(ConsoleError::Busy);
        }

        let status = match self.api.healthcheck(&demo.target()).await {
            Ok(health) if health.is_up() => EntityStatus::Up,
            Ok(_) => EntityStatus::Down,
            Err(e) => {
                warn!("Health check failed for demo: {}", e);
                EntityStatus::Down
            }
        };

        self.store.set_demo_status(status).await;
        self.refresh_gate().await;
        Ok(status)
    }
}
