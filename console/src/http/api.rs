//! Typed surface of the orchestrator backend API
//!
//! Everything the console does against the backend goes through the
//! [`OrchestratorApi`] trait so orchestration logic can be exercised against
//! an in-memory backend in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::models::config::OrchestratorConfig;

/// Marker the backend reports for a healthy service
pub const HEALTH_UP: &str = "UP";

/// Response of `GET /healthcheck/{idOrPort}`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_up(&self) -> bool {
        self.status == HEALTH_UP
    }
}

/// Body of `POST /create/wallet`
#[derive(Debug, Clone, Serialize)]
pub struct WalletRequest {
    pub filename: String,
    pub password: String,
}

/// Body of `POST /create/keys`
#[derive(Debug, Clone, Serialize)]
pub struct KeysRequest {
    pub filename: String,
    pub password: String,
    #[serde(rename = "keyIds")]
    pub key_ids: Vec<String>,
}

/// Body of `POST /create/diddoc`
#[derive(Debug, Clone, Serialize)]
pub struct DidDocRequest {
    pub filename: String,
    pub password: String,
    pub did: String,
    pub controller: String,
    #[serde(rename = "type")]
    pub doc_type: String,
}

/// Operations the orchestrator backend exposes
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// Start one entity; `target` is an id for repositories, a port for servers
    async fn startup(&self, target: &str) -> Result<(), ConsoleError>;

    /// Stop one entity
    async fn shutdown(&self, target: &str) -> Result<(), ConsoleError>;

    /// Query one entity's health
    async fn healthcheck(&self, target: &str) -> Result<HealthResponse, ConsoleError>;

    async fn create_wallet(&self, request: &WalletRequest) -> Result<(), ConsoleError>;

    async fn create_keys(&self, request: &KeysRequest) -> Result<(), ConsoleError>;

    async fn create_diddoc(&self, request: &DidDocRequest) -> Result<(), ConsoleError>;

    /// Fetch the shared configuration document
    async fn get_configs(&self) -> Result<OrchestratorConfig, ConsoleError>;

    /// Replace the shared configuration document
    async fn save_configs(&self, config: &OrchestratorConfig) -> Result<(), ConsoleError>;

    /// Ask the backend to reload its configuration
    async fn refresh_configs(&self) -> Result<(), ConsoleError>;

    /// Fetch a service log file
    async fn fetch_log(&self, name: &str) -> Result<String, ConsoleError>;
}

/// HTTP implementation of [`OrchestratorApi`]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ConsoleError> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl OrchestratorApi for ApiClient {
    async fn startup(&self, target: &str) -> Result<(), ConsoleError> {
        self.http.get_ok(&format!("/startup/{}", target)).await
    }

    async fn shutdown(&self, target: &str) -> Result<(), ConsoleError> {
        self.http.get_ok(&format!("/shutdown/{}", target)).await
    }

    async fn healthcheck(&self, target: &str) -> Result<HealthResponse, ConsoleError> {
        self.http.get(&format!("/healthcheck/{}", target)).await
    }

    async fn create_wallet(&self, request: &WalletRequest) -> Result<(), ConsoleError> {
        self.http.post("/create/wallet", request).await
    }

    async fn create_keys(&self, request: &KeysRequest) -> Result<(), ConsoleError> {
        self.http.post("/create/keys", request).await
    }

    async fn create_diddoc(&self, request: &DidDocRequest) -> Result<(), ConsoleError> {
        self.http.post("/create/diddoc", request).await
    }

    async fn get_configs(&self) -> Result<OrchestratorConfig, ConsoleError> {
        self.http.get("/configs").await
    }

    async fn save_configs(&self, config: &OrchestratorConfig) -> Result<(), ConsoleError> {
        self.http.post("/configs", config).await
    }

    async fn refresh_configs(&self) -> Result<(), ConsoleError> {
        self.http.post_empty("/actuator/refresh").await
    }

    async fn fetch_log(&self, name: &str) -> Result<String, ConsoleError> {
        self.http.get_text(&format!("/logs/{}.log", name)).await
    }
}
