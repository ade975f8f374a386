//! Wallet, key and DID document provisioning
//!
//! The TAS server is the root identity: its DID document is self-controlled
//! and becomes the `controller` reference embedded in every other entity's
//! document, and it gets the extra `invoke` key purpose.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use uuid::Uuid;

use crate::errors::ConsoleError;
use crate::http::api::{DidDocRequest, KeysRequest, OrchestratorApi, WalletRequest};
use crate::models::entity::GroupKind;
use crate::store::StateStore;

/// Id of the distinguished root identity among the servers
pub const ROOT_SERVER_ID: &str = "tas";

/// DID method prefix used for all generated identifiers
pub const DID_PREFIX: &str = "did:omn:";

const BASE_KEY_IDS: [&str; 3] = ["assert", "auth", "keyagree"];
const ROOT_EXTRA_KEY_ID: &str = "invoke";

const ROOT_DOC_TYPE: &str = "TAS";
const ENTITY_DOC_TYPE: &str = "ENTITY";

/// Key purposes generated for an entity's wallet
pub fn key_ids_for(entity_id: &str) -> Vec<String> {
    let mut key_ids: Vec<String> = BASE_KEY_IDS.iter().map(|s| s.to_string()).collect();
    if entity_id == ROOT_SERVER_ID {
        key_ids.push(ROOT_EXTRA_KEY_ID.to_string());
    }
    key_ids
}

/// DID document type marker for an entity
pub fn doc_type_for(entity_id: &str) -> &'static str {
    if entity_id == ROOT_SERVER_ID {
        ROOT_DOC_TYPE
    } else {
        ENTITY_DOC_TYPE
    }
}

/// A random `did:omn:0x…` identifier
pub fn random_did() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}0x{}", DID_PREFIX, &hex[..25])
}

pub struct Provisioner {
    api: Arc<dyn OrchestratorApi>,
    store: Arc<StateStore>,
}

impl Provisioner {
    pub fn new(api: Arc<dyn OrchestratorApi>, store: Arc<StateStore>) -> Self {
        Self { api, store }
    }

    /// Provision wallet, keys and DID document for every configured server,
    /// in registry order. Aborts the remaining entities on the first failed
    /// request; nothing already created is rolled back.
    pub async fn generate_all(&self, password: &SecretString) -> Result<(), ConsoleError> {
        let servers = self.store.entities(GroupKind::Servers).await;

        for server in &servers {
            self.create_wallet_and_keys(&server.id, password).await?;

            self.api
                .create_diddoc(&DidDocRequest {
                    filename: server.id.clone(),
                    password: password.expose_secret().to_string(),
                    did: format!("{}{}", DID_PREFIX, server.id),
                    controller: format!("{}{}", DID_PREFIX, ROOT_SERVER_ID),
                    doc_type: doc_type_for(&server.id).to_string(),
                })
                .await?;

            info!("Provisioned wallet, keys and DID document for {}", server.id);
        }

        Ok(())
    }

    /// Create one wallet plus its keys
    pub async fn create_wallet_and_keys(
        &self,
        name: &str,
        password: &SecretString,
    ) -> Result<(), ConsoleError> {
        self.api
            .create_wallet(&WalletRequest {
                filename: name.to_string(),
                password: password.expose_secret().to_string(),
            })
            .await?;

        self.api
            .create_keys(&KeysRequest {
                filename: name.to_string(),
                password: password.expose_secret().to_string(),
                key_ids: key_ids_for(name),
            })
            .await?;

        Ok(())
    }

    /// Create one DID document for an existing wallet. The root identity is
    /// self-controlled and, on success, becomes the persisted `controller`
    /// reference for subsequent documents; every other entity points at the
    /// last registered root DID.
    pub async fn create_diddoc(
        &self,
        wallet_name: &str,
        password: &SecretString,
        did: Option<String>,
    ) -> Result<String, ConsoleError> {
        let did = did.unwrap_or_else(random_did);
        let doc_type = doc_type_for(wallet_name);

        let controller = if doc_type == ROOT_DOC_TYPE {
            did.clone()
        } else {
            self.store
                .did_controller()
                .await
                .unwrap_or_else(|| format!("{}{}", DID_PREFIX, ROOT_SERVER_ID))
        };

        self.api
            .create_diddoc(&DidDocRequest {
                filename: wallet_name.to_string(),
                password: password.expose_secret().to_string(),
                did: did.clone(),
                controller,
                doc_type: doc_type.to_string(),
            })
            .await?;

        let new_controller = (doc_type == ROOT_DOC_TYPE).then(|| did.clone());
        self.store.set_did_continuity(new_controller, doc_type).await;

        info!("Created DID document {} for {}", did, wallet_name);
        Ok(did)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ids_root_gets_invoke() {
        assert_eq!(key_ids_for("issuer"), vec!["assert", "auth", "keyagree"]);
        assert_eq!(
            key_ids_for("tas"),
            vec!["assert", "auth", "keyagree", "invoke"]
        );
    }

    #[test]
    fn test_doc_type() {
        assert_eq!(doc_type_for("tas"), "TAS");
        assert_eq!(doc_type_for("verifier"), "ENTITY");
    }

    #[test]
    fn test_random_did_shape() {
        let did = random_did();
        assert!(did.starts_with("did:omn:0x"));
        let hex = &did["did:omn:0x".len()..];
        assert_eq!(hex.len(), 25);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(did, random_did());
    }
}
