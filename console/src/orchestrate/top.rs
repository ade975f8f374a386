//! Top-level orchestrator
//!
//! Composes the two group orchestrators and the demo controller. Bulk
//! operations run the groups in dependency order: repositories before
//! servers on start, the strict reverse on stop. A central run-state
//! machine admits one bulk operation at a time.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::errors::ConsoleError;
use crate::http::api::OrchestratorApi;
use crate::models::entity::{CombinedStatus, EntityStatus, GroupKind};
use crate::orchestrate::demo::DemoController;
use crate::orchestrate::group::{GroupOrchestrator, Lifecycle};
use crate::orchestrate::runstate::RunState;
use crate::orchestrate::{OrchestratorOptions, Origin};
use crate::store::StateStore;

pub struct Orchestrator {
    store: Arc<StateStore>,
    repositories: GroupOrchestrator,
    servers: GroupOrchestrator,
    demo: DemoController,
    run_state: Mutex<RunState>,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn OrchestratorApi>,
        store: Arc<StateStore>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            repositories: GroupOrchestrator::new(
                GroupKind::Repositories,
                api.clone(),
                store.clone(),
                options.clone(),
            ),
            servers: GroupOrchestrator::new(
                GroupKind::Servers,
                api.clone(),
                store.clone(),
                options.clone(),
            ),
            demo: DemoController::new(api, store.clone(), options),
            store,
            run_state: Mutex::new(RunState::default()),
        }
    }

    pub fn demo(&self) -> &DemoController {
        &self.demo
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    async fn begin(&self) -> Result<(), ConsoleError> {
        self.run_state.lock().await.begin()
    }

    async fn finish(&self) {
        self.run_state.lock().await.finish();
    }

    /// Start every entity: repositories first, then servers, then resolve
    /// the combined status.
    pub async fn start_all(&self) -> Result<CombinedStatus, ConsoleError> {
        self.begin().await?;
        let result = self.start_all_inner().await;
        self.finish().await;
        result
    }

    async fn start_all_inner(&self) -> Result<CombinedStatus, ConsoleError> {
        self.store.set_combined(CombinedStatus::Progress).await;

        self.repositories.start_all().await?;
        self.servers.start_all().await?;

        self.resolve_status().await
    }

    /// Stop every entity in strict reverse of start order: servers are torn
    /// down before the repositories they depend on.
    pub async fn stop_all(&self) -> Result<CombinedStatus, ConsoleError> {
        self.begin().await?;
        let result = self.stop_all_inner().await;
        self.finish().await;
        result
    }

    async fn stop_all_inner(&self) -> Result<CombinedStatus, ConsoleError> {
        self.store.set_combined(CombinedStatus::Progress).await;

        self.servers.stop_all().await?;
        self.repositories.stop_all().await?;

        self.resolve_status().await
    }

    /// Health-check every entity and reclassify the combined status
    pub async fn status_all(&self) -> Result<CombinedStatus, ConsoleError> {
        self.begin().await?;
        let result = self.resolve_status().await;
        self.finish().await;
        result
    }

    async fn resolve_status(&self) -> Result<CombinedStatus, ConsoleError> {
        self.store.set_combined(CombinedStatus::Progress).await;

        // Order is not load-bearing here; health checks are independent reads
        let server_status = self.servers.status_all().await?;
        let repo_status = self.repositories.status_all().await?;

        let combined = CombinedStatus::combine(repo_status, server_status);
        self.store.set_combined(combined).await;

        self.demo.refresh_gate().await;
        Ok(combined)
    }

    /// Route a user-initiated start to the owning group or the demo
    pub async fn start_entity(&self, id: &str) -> Result<EntityStatus, ConsoleError> {
        match self.find_group(id).await {
            Some(group) => group.start_entity(id, Origin::UserInitiated).await,
            None if id == self.store.demo().await.id => {
                self.demo.start(Origin::UserInitiated).await
            }
            None => Err(ConsoleError::NotFound(format!("Unknown entity: {}", id))),
        }
    }

    /// Route a user-initiated stop
    pub async fn stop_entity(&self, id: &str) -> Result<EntityStatus, ConsoleError> {
        match self.find_group(id).await {
            Some(group) => group.stop_entity(id, Origin::UserInitiated).await,
            None if id == self.store.demo().await.id => {
                self.demo.stop(Origin::UserInitiated).await
            }
            None => Err(ConsoleError::NotFound(format!("Unknown entity: {}", id))),
        }
    }

    /// Route a user-initiated health check
    pub async fn check_entity(&self, id: &str) -> Result<EntityStatus, ConsoleError> {
        match self.find_group(id).await {
            Some(group) => group.health_check(id, Origin::UserInitiated).await,
            None if id == self.store.demo().await.id => {
                self.demo.health_check(Origin::UserInitiated).await
            }
            None => Err(ConsoleError::NotFound(format!("Unknown entity: {}", id))),
        }
    }

    async fn find_group(&self, id: &str) -> Option<&GroupOrchestrator> {
        if self.repositories.contains(id).await {
            Some(&self.repositories)
        } else if self.servers.contains(id).await {
            Some(&self.servers)
        } else {
            None
        }
    }
}
