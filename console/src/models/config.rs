//! Orchestrator configuration document
//!
//! Shape owned by the backend: key/value sections for the ledger and the
//! database, plus a service map with arbitrary extra path entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The configuration document served by `GET /configs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Ledger parameters (channel, chaincode name, ...)
    #[serde(default)]
    pub blockchain: BTreeMap<String, String>,

    /// Database parameters (port, user, password, ...)
    #[serde(default)]
    pub database: BTreeMap<String, String>,

    /// Service map plus additional path entries
    #[serde(default)]
    pub services: ServicesConfig,
}

/// The `services` section: a `server` map keyed by service id, and any
/// number of flat path entries next to it (jar/wallet/log directories)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub server: BTreeMap<String, ServerConfig>,

    /// Everything in `services` that is not the server map
    #[serde(flatten)]
    pub paths: BTreeMap<String, String>,
}

/// One service entry in the `services.server` map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub port: u16,
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_document_round_trip() {
        let raw = r#"{
            "blockchain": { "channel": "mychannel" },
            "database": { "port": "5430" },
            "services": {
                "jarPath": "/opt/did",
                "server": {
                    "tas": { "name": "TAS", "port": 8090, "file": "tas.jar" }
                }
            }
        }"#;

        let config: OrchestratorConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.blockchain["channel"], "mychannel");
        assert_eq!(config.services.server["tas"].port, 8090);
        assert_eq!(config.services.paths["jarPath"], "/opt/did");

        // The flattened path entries survive re-serialization
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["services"]["jarPath"], "/opt/did");
    }
}
