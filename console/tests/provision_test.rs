//! Provisioning and configuration tests against the in-memory backend

mod common;

use std::time::Duration;

use common::{test_store, MockBackend};
use didctl::confs::ConfigOps;
use didctl::errors::ConsoleError;
use didctl::models::config::OrchestratorConfig;
use didctl::provision::Provisioner;
use secrecy::SecretString;

fn password() -> SecretString {
    SecretString::from("secret".to_string())
}

#[tokio::test]
async fn test_generate_all_provisions_every_server_in_order() {
    let backend = MockBackend::new();
    let (_dir, store) = test_store().await;
    let provisioner = Provisioner::new(backend.clone(), store);

    provisioner.generate_all(&password()).await.unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "wallet:tas",
            "keys:tas:assert,auth,keyagree,invoke",
            "diddoc:tas:did:omn:tas:did:omn:tas:TAS",
            "wallet:issuer",
            "keys:issuer:assert,auth,keyagree",
            "diddoc:issuer:did:omn:issuer:did:omn:tas:ENTITY",
            "wallet:verifier",
            "keys:verifier:assert,auth,keyagree",
            "diddoc:verifier:did:omn:verifier:did:omn:tas:ENTITY",
            "wallet:cas",
            "keys:cas:assert,auth,keyagree",
            "diddoc:cas:did:omn:cas:did:omn:tas:ENTITY",
            "wallet:wallet",
            "keys:wallet:assert,auth,keyagree",
            "diddoc:wallet:did:omn:wallet:did:omn:tas:ENTITY",
            "wallet:api",
            "keys:api:assert,auth,keyagree",
            "diddoc:api:did:omn:api:did:omn:tas:ENTITY",
        ]
    );
}

#[tokio::test]
async fn test_generate_all_aborts_on_first_failure_without_rollback() {
    let backend = MockBackend::new();
    let (_dir, store) = test_store().await;
    let provisioner = Provisioner::new(backend.clone(), store);

    backend.reject_wallet("issuer");

    let result = provisioner.generate_all(&password()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, ConsoleError::BackendError(_)));
    assert!(err.to_string().contains("issuer"));

    // tas was fully provisioned, the issuer wallet was attempted, and
    // nothing after issuer ran
    assert_eq!(
        backend.calls(),
        vec![
            "wallet:tas",
            "keys:tas:assert,auth,keyagree,invoke",
            "diddoc:tas:did:omn:tas:did:omn:tas:TAS",
            "wallet:issuer",
        ]
    );
}

#[tokio::test]
async fn test_single_diddoc_controller_continuity() {
    let backend = MockBackend::new();
    let (_dir, store) = test_store().await;
    let provisioner = Provisioner::new(backend.clone(), store.clone());

    // Root document is self-controlled and registers the controller
    let root_did = provisioner
        .create_diddoc("tas", &password(), Some("did:omn:0xroot".to_string()))
        .await
        .unwrap();
    assert_eq!(root_did, "did:omn:0xroot");
    assert_eq!(store.did_controller().await.as_deref(), Some("did:omn:0xroot"));

    // Subsequent documents point at the registered root DID
    provisioner
        .create_diddoc("issuer", &password(), Some("did:omn:0xissuer".to_string()))
        .await
        .unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "diddoc:tas:did:omn:0xroot:did:omn:0xroot:TAS",
            "diddoc:issuer:did:omn:0xissuer:did:omn:0xroot:ENTITY",
        ]
    );

    // A non-root document never replaces the controller reference
    assert_eq!(store.did_controller().await.as_deref(), Some("did:omn:0xroot"));
}

#[tokio::test]
async fn test_diddoc_without_explicit_did_generates_one() {
    let backend = MockBackend::new();
    let (_dir, store) = test_store().await;
    let provisioner = Provisioner::new(backend.clone(), store);

    let did = provisioner
        .create_diddoc("verifier", &password(), None)
        .await
        .unwrap();
    assert!(did.starts_with("did:omn:0x"));
}

#[tokio::test]
async fn test_config_set_saves_and_refreshes() {
    let backend = MockBackend::new();

    let mut seeded = OrchestratorConfig::default();
    seeded
        .database
        .insert("port".to_string(), "5430".to_string());
    backend.seed_config(seeded);

    let configs = ConfigOps::with_refresh_delay(backend.clone(), Duration::ZERO);
    configs.set("database", "port", "5433").await.unwrap();

    assert_eq!(backend.stored_config().database["port"], "5433");
    assert_eq!(
        backend.calls(),
        vec!["get_configs", "save_configs", "refresh_configs"]
    );
}

#[tokio::test]
async fn test_config_set_rejects_unknown_section() {
    let backend = MockBackend::new();
    let configs = ConfigOps::with_refresh_delay(backend.clone(), Duration::ZERO);

    let result = configs.set("nonsense", "key", "value").await;
    assert!(matches!(result, Err(ConsoleError::UsageError(_))));
    assert_eq!(backend.calls(), vec!["get_configs"]);
}
