//! Per-group orchestrator
//!
//! Drives the entities of one group (repositories or servers) through the
//! lifecycle operations, strictly sequentially: start order is registry
//! order, stop order is its reverse, matching the dependency direction
//! between servers and repositories.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::errors::ConsoleError;
use crate::http::api::OrchestratorApi;
use crate::models::entity::{Entity, EntityStatus, GroupKind, GroupStatus};
use crate::orchestrate::{OrchestratorOptions, Origin};
use crate::store::StateStore;

/// Shared lifecycle contract of the per-group orchestrators
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Start every entity in defined order
    async fn start_all(&self) -> Result<(), ConsoleError>;

    /// Stop every entity in reverse defined order
    async fn stop_all(&self) -> Result<(), ConsoleError>;

    /// Health-check every entity and return the aggregate status
    async fn status_all(&self) -> Result<GroupStatus, ConsoleError>;

    /// Classify current in-memory statuses without touching the backend
    async fn overall_status(&self) -> GroupStatus;
}

pub struct GroupOrchestrator {
    kind: GroupKind,
    api: Arc<dyn OrchestratorApi>,
    store: Arc<StateStore>,
    options: OrchestratorOptions,
}

impl GroupOrchestrator {
    pub fn new(
        kind: GroupKind,
        api: Arc<dyn OrchestratorApi>,
        store: Arc<StateStore>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            kind,
            api,
            store,
            options,
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Whether this group manages the given entity
    pub async fn contains(&self, id: &str) -> bool {
        self.store.entity(self.kind, id).await.is_some()
    }

    async fn require_entity(&self, id: &str) -> Result<Entity, ConsoleError> {
        self.store
            .entity(self.kind, id)
            .await
            .ok_or_else(|| ConsoleError::NotFound(format!("Unknown entity: {}", id)))
    }

    /// Start one entity. Always resolves to `Up` or `Down` via the terminal
    /// health check, regardless of how the startup call itself went.
    pub async fn start_entity(&self, id: &str, origin: Origin) -> Result<EntityStatus, ConsoleError> {
        let entity = self.require_entity(id).await?;
        if origin.is_user() && entity.status == EntityStatus::Progress {
            return Err(ConsoleError::Busy);
        }

        self.store
            .set_entity_status(self.kind, id, EntityStatus::Progress)
            .await;

        match self.api.startup(&entity.target()).await {
            Ok(()) => info!("{} {} started", self.kind.title(), id),
            Err(e) => warn!("Failed to start {}: {}", id, e),
        }

        self.health_check(id, Origin::Orchestrated).await
    }

    /// Stop one entity; same terminal health-check contract as start
    pub async fn stop_entity(&self, id: &str, origin: Origin) -> Result<EntityStatus, ConsoleError> {
        let entity = self.require_entity(id).await?;
        if origin.is_user() && entity.status == EntityStatus::Progress {
            return Err(ConsoleError::Busy);
        }

        self.store
            .set_entity_status(self.kind, id, EntityStatus::Progress)
            .await;

        match self.api.shutdown(&entity.target()).await {
            Ok(()) => info!("{} {} stopped", self.kind.title(), id),
            Err(e) => warn!("Failed to stop {}: {}", id, e),
        }

        self.health_check(id, Origin::Orchestrated).await
    }

    /// Health-check one entity. Resolves the status to `Up` or `Down`, never
    /// anything else; does not itself pass through `Progress`.
    pub async fn health_check(&self, id: &str, origin: Origin) -> Result<EntityStatus, ConsoleError> {
        let entity = self.require_entity(id).await?;
        if origin.is_user() && entity.status == EntityStatus::Progress {
            return Err(ConsoleError::Busy);
        }

        let status = match self.api.healthcheck(&entity.target()).await {
            Ok(health) if health.is_up() => EntityStatus::Up,
            Ok(_) => EntityStatus::Down,
            Err(e) => {
                warn!("Health check failed for {}: {}", id, e);
                EntityStatus::Down
            }
        };

        self.store.set_entity_status(self.kind, id, status).await;
        Ok(status)
    }
}

#[async_trait]
impl Lifecycle for GroupOrchestrator {
    async fn start_all(&self) -> Result<(), ConsoleError> {
        for entity in self.store.entities(self.kind).await {
            self.start_entity(&entity.id, Origin::Orchestrated).await?;
        }
        Ok(())
    }

    async fn stop_all(&self) -> Result<(), ConsoleError> {
        for entity in self.store.entities(self.kind).await.iter().rev() {
            self.stop_entity(&entity.id, Origin::Orchestrated).await?;
        }
        Ok(())
    }

    async fn status_all(&self) -> Result<GroupStatus, ConsoleError> {
        let entities = self.store.entities(self.kind).await;

        for entity in &entities {
            self.health_check(&entity.id, Origin::Orchestrated).await?;
        }

        // Redundant concurrent re-read; health checks are side-effect-free
        let checks = entities
            .iter()
            .map(|entity| self.health_check(&entity.id, Origin::Orchestrated));
        for result in join_all(checks).await {
            result?;
        }

        Ok(self.overall_status().await)
    }

    async fn overall_status(&self) -> GroupStatus {
        // Settling delay so in-flight transitions have landed
        tokio::time::sleep(self.options.settle_delay).await;

        GroupStatus::aggregate(&self.store.statuses(self.kind).await)
    }
}
