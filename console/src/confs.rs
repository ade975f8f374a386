//! Shared configuration document operations
//!
//! Every save is followed by a backend configuration reload, after a short
//! delay so the write has landed before the refresh runs.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::errors::ConsoleError;
use crate::http::api::OrchestratorApi;
use crate::models::config::OrchestratorConfig;

/// Delay between saving the document and triggering the backend reload
const REFRESH_DELAY: Duration = Duration::from_secs(1);

pub struct ConfigOps {
    api: Arc<dyn OrchestratorApi>,
    refresh_delay: Duration,
}

impl ConfigOps {
    pub fn new(api: Arc<dyn OrchestratorApi>) -> Self {
        Self {
            api,
            refresh_delay: REFRESH_DELAY,
        }
    }

    /// Override the refresh delay, mainly for tests
    pub fn with_refresh_delay(api: Arc<dyn OrchestratorApi>, delay: Duration) -> Self {
        Self {
            api,
            refresh_delay: delay,
        }
    }

    /// Fetch the current document
    pub async fn fetch(&self) -> Result<OrchestratorConfig, ConsoleError> {
        self.api.get_configs().await
    }

    /// Save a document and trigger the backend reload
    pub async fn save(&self, config: &OrchestratorConfig) -> Result<(), ConsoleError> {
        self.api.save_configs(config).await?;

        tokio::time::sleep(self.refresh_delay).await;
        self.api.refresh_configs().await?;

        info!("Configuration saved and backend refreshed");
        Ok(())
    }

    /// Update a single value in one of the key/value sections and save
    pub async fn set(&self, section: &str, key: &str, value: &str) -> Result<(), ConsoleError> {
        let mut config = self.fetch().await?;

        match section {
            "blockchain" => {
                config
                    .blockchain
                    .insert(key.to_string(), value.to_string());
            }
            "database" => {
                config.database.insert(key.to_string(), value.to_string());
            }
            "services" => {
                config
                    .services
                    .paths
                    .insert(key.to_string(), value.to_string());
            }
            other => {
                return Err(ConsoleError::UsageError(format!(
                    "Unknown config section: {} (expected blockchain, database or services)",
                    other
                )));
            }
        }

        self.save(&config).await
    }
}
