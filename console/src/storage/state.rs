//! Persisted dashboard snapshot
//!
//! The field names match the keys the browser dashboard used in
//! localStorage, so an exported snapshot reads the same either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::entity::{
    default_demo, default_repositories, default_servers, CombinedStatus, Entity,
};

/// Everything the console persists between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Top-level combined status
    #[serde(rename = "allStatus")]
    pub all_status: CombinedStatus,

    /// Repositories in start order
    pub repositories: Vec<Entity>,

    /// Servers in start order
    pub servers: Vec<Entity>,

    /// The demo application record
    pub demo: Entity,

    /// Last root-identity DID registered as `controller`
    #[serde(rename = "didController", default, skip_serializing_if = "Option::is_none")]
    pub did_controller: Option<String>,

    /// Last-used entity-type marker ("TAS" or "ENTITY")
    #[serde(rename = "didType", default, skip_serializing_if = "Option::is_none")]
    pub did_type: Option<String>,

    /// When this snapshot was written
    #[serde(rename = "savedAt", default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            all_status: CombinedStatus::Idle,
            repositories: default_repositories(),
            servers: default_servers(),
            demo: default_demo(),
            did_controller: None,
            did_type: None,
            saved_at: Utc::now(),
        }
    }
}

impl DashboardState {
    /// Rebuild the fixed entity set from the static registry, keeping only
    /// the statuses and continuity fields of a previously stored snapshot.
    /// The registry is the source of truth for ids, names and ports.
    pub fn merged_onto_defaults(stored: DashboardState) -> DashboardState {
        let mut state = DashboardState {
            all_status: stored.all_status,
            did_controller: stored.did_controller,
            did_type: stored.did_type,
            saved_at: stored.saved_at,
            ..DashboardState::default()
        };

        overlay_statuses(&mut state.repositories, &stored.repositories);
        overlay_statuses(&mut state.servers, &stored.servers);
        if stored.demo.id == state.demo.id {
            state.demo.status = stored.demo.status;
        }

        state
    }
}

fn overlay_statuses(defaults: &mut [Entity], stored: &[Entity]) {
    for entity in defaults.iter_mut() {
        if let Some(previous) = stored.iter().find(|e| e.id == entity.id) {
            entity.status = previous.status;
        }
    }
}
