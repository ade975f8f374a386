//! Injected state store
//!
//! Owns the dashboard snapshot: read once at startup, mutated only by the
//! orchestration operations, written back after every transition. Group
//! orchestrators and the demo controller receive the store explicitly
//! instead of reaching for shared globals; `subscribe` exposes a watch
//! channel for anything that wants to observe transitions.

use tokio::sync::{watch, RwLock};
use tracing::{error, warn};

use crate::filesys::file::File;
use crate::models::entity::{CombinedStatus, Entity, EntityStatus, GroupKind};
use crate::storage::state::DashboardState;

pub struct StateStore {
    file: File,
    state: RwLock<DashboardState>,
    tx: watch::Sender<DashboardState>,
}

impl StateStore {
    /// Load the snapshot from disk, merging it onto the static registry.
    /// A missing or malformed file falls back to defaults.
    pub async fn load(file: File) -> Self {
        let state = if file.exists().await {
            match file.read_json::<DashboardState>().await {
                Ok(stored) => DashboardState::merged_onto_defaults(stored),
                Err(e) => {
                    warn!("Discarding malformed snapshot {:?}: {}", file.path(), e);
                    DashboardState::default()
                }
            }
        } else {
            DashboardState::default()
        };

        let (tx, _) = watch::channel(state.clone());
        Self {
            file,
            state: RwLock::new(state),
            tx,
        }
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Watch snapshot transitions
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.tx.subscribe()
    }

    /// Entities of one group, in registry order
    pub async fn entities(&self, group: GroupKind) -> Vec<Entity> {
        let state = self.state.read().await;
        match group {
            GroupKind::Repositories => state.repositories.clone(),
            GroupKind::Servers => state.servers.clone(),
        }
    }

    /// One entity of a group by id
    pub async fn entity(&self, group: GroupKind, id: &str) -> Option<Entity> {
        self.entities(group).await.into_iter().find(|e| e.id == id)
    }

    /// Statuses of one group, in registry order
    pub async fn statuses(&self, group: GroupKind) -> Vec<EntityStatus> {
        self.entities(group).await.iter().map(|e| e.status).collect()
    }

    pub async fn set_entity_status(&self, group: GroupKind, id: &str, status: EntityStatus) {
        self.mutate(|state| {
            let entities = match group {
                GroupKind::Repositories => &mut state.repositories,
                GroupKind::Servers => &mut state.servers,
            };
            if let Some(entity) = entities.iter_mut().find(|e| e.id == id) {
                entity.status = status;
            }
        })
        .await;
    }

    pub async fn combined(&self) -> CombinedStatus {
        self.state.read().await.all_status
    }

    pub async fn set_combined(&self, status: CombinedStatus) {
        self.mutate(|state| state.all_status = status).await;
    }

    pub async fn demo(&self) -> Entity {
        self.state.read().await.demo.clone()
    }

    pub async fn set_demo_status(&self, status: EntityStatus) {
        self.mutate(|state| state.demo.status = status).await;
    }

    pub async fn did_controller(&self) -> Option<String> {
        self.state.read().await.did_controller.clone()
    }

    /// Record the provisioning continuity fields after a successful DID
    /// document creation. The controller reference is only replaced for the
    /// root identity.
    pub async fn set_did_continuity(&self, controller: Option<String>, did_type: &str) {
        self.mutate(|state| {
            if controller.is_some() {
                state.did_controller = controller;
            }
            state.did_type = Some(did_type.to_string());
        })
        .await;
    }

    /// Apply a mutation, persist the snapshot and notify watchers. A write
    /// failure is logged but does not abort the orchestration chain.
    async fn mutate(&self, apply: impl FnOnce(&mut DashboardState)) {
        let snapshot = {
            let mut state = self.state.write().await;
            apply(&mut state);
            state.saved_at = chrono::Utc::now();
            state.clone()
        };

        if let Err(e) = self.file.write_json_atomic(&snapshot).await {
            error!("Failed to persist snapshot {:?}: {}", self.file.path(), e);
        }
        let _ = self.tx.send(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_file(dir: &tempfile::TempDir) -> File {
        File::new(dir.path().join("state.json"))
    }

    #[tokio::test]
    async fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::load(temp_store_file(&dir)).await;
        assert_eq!(store.combined().await, CombinedStatus::Idle);
        assert_eq!(store.entities(GroupKind::Servers).await.len(), 6);
    }

    #[tokio::test]
    async fn test_load_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_store_file(&dir);
        file.write_string("not json{").await.unwrap();

        let store = StateStore::load(file).await;
        assert_eq!(store.combined().await, CombinedStatus::Idle);
    }

    #[tokio::test]
    async fn test_mutations_persist_and_notify() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_store_file(&dir);
        let store = StateStore::load(file.clone()).await;
        let mut rx = store.subscribe();

        store
            .set_entity_status(GroupKind::Servers, "tas", EntityStatus::Up)
            .await;

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().servers[0].status;
        assert_eq!(seen, EntityStatus::Up);

        // A fresh store sees the persisted status
        let reloaded = StateStore::load(file).await;
        let tas = reloaded.entity(GroupKind::Servers, "tas").await.unwrap();
        assert_eq!(tas.status, EntityStatus::Up);
    }
}
