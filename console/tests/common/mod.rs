//! Shared test fixtures: an in-memory orchestrator backend
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use didctl::errors::ConsoleError;
use didctl::filesys::file::File;
use didctl::http::api::{
    DidDocRequest, HealthResponse, KeysRequest, OrchestratorApi, WalletRequest,
};
use didctl::models::config::OrchestratorConfig;
use didctl::store::StateStore;

/// Scripted backend recording every call in order
#[derive(Default)]
pub struct MockBackend {
    calls: Mutex<Vec<String>>,
    /// Reported health per target; anything absent reports "DOWN"
    health: Mutex<HashMap<String, String>>,
    /// Targets whose startup call fails at transport level
    fail_startup: Mutex<HashSet<String>>,
    /// Targets whose health check fails at transport level
    unreachable: Mutex<HashSet<String>>,
    /// Wallet filenames whose creation the backend rejects
    reject_wallets: Mutex<HashSet<String>>,
    config: Mutex<OrchestratorConfig>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose entry starts with the given prefix, in order
    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn set_health(&self, target: &str, status: &str) {
        self.health
            .lock()
            .unwrap()
            .insert(target.to_string(), status.to_string());
    }

    pub fn fail_startup_of(&self, target: &str) {
        self.fail_startup.lock().unwrap().insert(target.to_string());
    }

    pub fn make_unreachable(&self, target: &str) {
        self.unreachable.lock().unwrap().insert(target.to_string());
    }

    pub fn reject_wallet(&self, filename: &str) {
        self.reject_wallets
            .lock()
            .unwrap()
            .insert(filename.to_string());
    }

    pub fn stored_config(&self) -> OrchestratorConfig {
        self.config.lock().unwrap().clone()
    }

    pub fn seed_config(&self, config: OrchestratorConfig) {
        *self.config.lock().unwrap() = config;
    }
}

#[async_trait]
impl OrchestratorApi for MockBackend {
    async fn startup(&self, target: &str) -> Result<(), ConsoleError> {
        self.record(format!("startup:{}", target));
        if self.fail_startup.lock().unwrap().contains(target) {
            return Err(ConsoleError::BackendError("startup failed".to_string()));
        }
        self.set_health(target, "UP");
        Ok(())
    }

    async fn shutdown(&self, target: &str) -> Result<(), ConsoleError> {
        self.record(format!("shutdown:{}", target));
        self.set_health(target, "DOWN");
        Ok(())
    }

    async fn healthcheck(&self, target: &str) -> Result<HealthResponse, ConsoleError> {
        self.record(format!("healthcheck:{}", target));
        if self.unreachable.lock().unwrap().contains(target) {
            return Err(ConsoleError::BackendError("unreachable".to_string()));
        }
        let status = self
            .health
            .lock()
            .unwrap()
            .get(target)
            .cloned()
            .unwrap_or_else(|| "DOWN".to_string());
        Ok(HealthResponse { status })
    }

    async fn create_wallet(&self, request: &WalletRequest) -> Result<(), ConsoleError> {
        self.record(format!("wallet:{}", request.filename));
        if self.reject_wallets.lock().unwrap().contains(&request.filename) {
            return Err(ConsoleError::BackendError(format!(
                "wallet creation rejected for {}",
                request.filename
            )));
        }
        Ok(())
    }

    async fn create_keys(&self, request: &KeysRequest) -> Result<(), ConsoleError> {
        self.record(format!(
            "keys:{}:{}",
            request.filename,
            request.key_ids.join(",")
        ));
        Ok(())
    }

    async fn create_diddoc(&self, request: &DidDocRequest) -> Result<(), ConsoleError> {
        self.record(format!(
            "diddoc:{}:{}:{}:{}",
            request.filename, request.did, request.controller, request.doc_type
        ));
        Ok(())
    }

    async fn get_configs(&self) -> Result<OrchestratorConfig, ConsoleError> {
        self.record("get_configs".to_string());
        Ok(self.stored_config())
    }

    async fn save_configs(&self, config: &OrchestratorConfig) -> Result<(), ConsoleError> {
        self.record("save_configs".to_string());
        *self.config.lock().unwrap() = config.clone();
        Ok(())
    }

    async fn refresh_configs(&self) -> Result<(), ConsoleError> {
        self.record("refresh_configs".to_string());
        Ok(())
    }

    async fn fetch_log(&self, name: &str) -> Result<String, ConsoleError> {
        self.record(format!("log:{}", name));
        Ok(format!("contents of {}.log", name))
    }
}

/// Fresh state store backed by a temp directory
pub async fn test_store() -> (tempfile::TempDir, Arc<StateStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::load(File::new(dir.path().join("state.json"))).await;
    (dir, Arc::new(store))
}
