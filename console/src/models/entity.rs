//! Managed entities and status classification
//!
//! The entity set is fixed: two repositories (ledger node, database), six
//! identity/credential servers, and one demo application. Statuses are
//! serialized with the glyph strings the dashboard has always persisted, so
//! an existing snapshot file stays readable.

use serde::{Deserialize, Serialize};

/// Status of a single managed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityStatus {
    /// Not yet checked
    #[serde(rename = "⚪")]
    Unknown,

    /// An operation is in flight for this entity
    #[serde(rename = "PROGRESS")]
    Progress,

    /// Last health check reported "UP"
    #[serde(rename = "🟢")]
    Up,

    /// Last health check failed or reported anything else
    #[serde(rename = "🔴")]
    Down,
}

impl EntityStatus {
    /// Glyph used when rendering the dashboard
    pub fn glyph(&self) -> &'static str {
        match self {
            EntityStatus::Unknown => "⚪",
            EntityStatus::Progress => "⏳",
            EntityStatus::Up => "🟢",
            EntityStatus::Down => "🔴",
        }
    }
}

/// One managed unit (repository, server, or the demo app)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Network port; absent for repositories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub status: EntityStatus,
}

impl Entity {
    /// Path segment used against the backend: servers and the demo are
    /// addressed by port, repositories by id.
    pub fn target(&self) -> String {
        match self.port {
            Some(port) => port.to_string(),
            None => self.id.clone(),
        }
    }

    /// Backend log file name for this entity
    pub fn log_name(&self) -> String {
        match self.port {
            Some(port) => format!("server_{}", port),
            None => self.id.clone(),
        }
    }
}

fn entity(id: &str, name: &str, port: Option<u16>) -> Entity {
    Entity {
        id: id.to_string(),
        name: name.to_string(),
        port,
        status: EntityStatus::Unknown,
    }
}

/// Repositories in start order; services depend on these
pub fn default_repositories() -> Vec<Entity> {
    vec![
        entity("fabric", "Hyperledger Fabric", None),
        entity("postgre", "PostgreSQL", None),
    ]
}

/// Servers in start order
pub fn default_servers() -> Vec<Entity> {
    vec![
        entity("tas", "TAS", Some(8090)),
        entity("issuer", "Issuer", Some(8091)),
        entity("verifier", "Verifier", Some(8092)),
        entity("cas", "CAS", Some(8094)),
        entity("wallet", "Wallet Service", Some(8095)),
        entity("api", "API Server", Some(8093)),
    ]
}

/// The demo application
pub fn default_demo() -> Entity {
    entity("demo", "DEMO", Some(8099))
}

/// The two entity groups sharing one lifecycle contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Repositories,
    Servers,
}

impl GroupKind {
    /// Key used in the persisted snapshot
    pub fn key(&self) -> &'static str {
        match self {
            GroupKind::Repositories => "repositories",
            GroupKind::Servers => "servers",
        }
    }

    /// Section heading on the dashboard
    pub fn title(&self) -> &'static str {
        match self {
            GroupKind::Repositories => "Repositories",
            GroupKind::Servers => "Servers",
        }
    }
}

/// Aggregate classification of a group's entity statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// Every entity is up
    Success,
    /// Every entity is down, or the group is empty
    Fail,
    /// At least one entity is up, but not all
    Partial,
}

impl GroupStatus {
    /// Classify a collection of entity statuses.
    ///
    /// Mixed statuses with no `Up` among them (all unknown, or unknown plus
    /// down) fall through to `Fail` rather than a distinct bucket.
    pub fn aggregate(statuses: &[EntityStatus]) -> GroupStatus {
        if statuses.is_empty() {
            return GroupStatus::Fail;
        }

        let all_up = statuses.iter().all(|s| *s == EntityStatus::Up);
        let all_down = statuses.iter().all(|s| *s == EntityStatus::Down);

        if all_up {
            GroupStatus::Success
        } else if all_down {
            GroupStatus::Fail
        } else if statuses.iter().any(|s| *s == EntityStatus::Up) {
            GroupStatus::Partial
        } else {
            GroupStatus::Fail
        }
    }
}

/// Top-level status blending both group aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinedStatus {
    /// No orchestration has run yet
    #[serde(rename = "⚪")]
    Idle,

    /// An orchestration operation is running
    #[serde(rename = "PROGRESS")]
    Progress,

    /// Both groups report success
    #[serde(rename = "🟢")]
    Healthy,

    /// Both groups report failure
    #[serde(rename = "🔴")]
    Unhealthy,

    /// Anything in between
    #[serde(rename = "🟡")]
    Mixed,
}

impl CombinedStatus {
    /// Blend the two group aggregates into the top-level indicator
    pub fn combine(repositories: GroupStatus, servers: GroupStatus) -> CombinedStatus {
        match (repositories, servers) {
            (GroupStatus::Success, GroupStatus::Success) => CombinedStatus::Healthy,
            (GroupStatus::Fail, GroupStatus::Fail) => CombinedStatus::Unhealthy,
            _ => CombinedStatus::Mixed,
        }
    }

    /// Glyph used when rendering the dashboard
    pub fn glyph(&self) -> &'static str {
        match self {
            CombinedStatus::Idle => "⚪",
            CombinedStatus::Progress => "⏳",
            CombinedStatus::Healthy => "🟢",
            CombinedStatus::Unhealthy => "🔴",
            CombinedStatus::Mixed => "🟡",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EntityStatus::{Down, Progress, Unknown, Up};

    #[test]
    fn test_aggregate_all_up() {
        assert_eq!(
            GroupStatus::aggregate(&[Up, Up, Up, Up, Up]),
            GroupStatus::Success
        );
    }

    #[test]
    fn test_aggregate_all_down() {
        assert_eq!(GroupStatus::aggregate(&[Down, Down]), GroupStatus::Fail);
    }

    #[test]
    fn test_aggregate_mixed() {
        assert_eq!(GroupStatus::aggregate(&[Up, Down]), GroupStatus::Partial);
    }

    #[test]
    fn test_aggregate_mixed_without_up_falls_through_to_fail() {
        assert_eq!(
            GroupStatus::aggregate(&[Unknown, Unknown]),
            GroupStatus::Fail
        );
        assert_eq!(
            GroupStatus::aggregate(&[Unknown, Down, Progress]),
            GroupStatus::Fail
        );
    }

    #[test]
    fn test_aggregate_empty_is_fail() {
        assert_eq!(GroupStatus::aggregate(&[]), GroupStatus::Fail);
    }

    #[test]
    fn test_combine_requires_both_groups_green() {
        assert_eq!(
            CombinedStatus::combine(GroupStatus::Success, GroupStatus::Success),
            CombinedStatus::Healthy
        );
        assert_eq!(
            CombinedStatus::combine(GroupStatus::Fail, GroupStatus::Fail),
            CombinedStatus::Unhealthy
        );
        assert_eq!(
            CombinedStatus::combine(GroupStatus::Success, GroupStatus::Partial),
            CombinedStatus::Mixed
        );
        assert_eq!(
            CombinedStatus::combine(GroupStatus::Fail, GroupStatus::Success),
            CombinedStatus::Mixed
        );
    }

    #[test]
    fn test_status_glyph_round_trip() {
        let json = serde_json::to_string(&EntityStatus::Up).unwrap();
        assert_eq!(json, "\"🟢\"");
        let back: EntityStatus = serde_json::from_str("\"⚪\"").unwrap();
        assert_eq!(back, Unknown);
    }

    #[test]
    fn test_entity_target() {
        let servers = default_servers();
        assert_eq!(servers[0].target(), "8090");
        let repos = default_repositories();
        assert_eq!(repos[0].target(), "fabric");
        assert_eq!(repos[1].log_name(), "postgre");
        assert_eq!(servers[0].log_name(), "server_8090");
    }
}
