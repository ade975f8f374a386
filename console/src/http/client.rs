//! HTTP client implementation

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::ConsoleError;

/// Failure body shape used by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for backend communication
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str) -> Result<Self, ConsoleError> {
        Url::parse(base_url)
            .map_err(|e| ConsoleError::ConfigError(format!("Invalid backend URL: {}", e)))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and decode a JSON response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(backend_error("GET", &url, response).await);
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a GET request, keeping only the success/failure outcome
    pub async fn get_ok(&self, path: &str) -> Result<(), ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(backend_error("GET", &url, response).await);
        }

        Ok(())
    }

    /// Make a GET request and return the raw response body
    pub async fn get_text(&self, path: &str) -> Result<String, ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(backend_error("GET", &url, response).await);
        }

        let body = response.text().await?;
        Ok(body)
    }

    /// Make a POST request with a JSON body
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            return Err(backend_error("POST", &url, response).await);
        }

        Ok(())
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> Result<(), ConsoleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(backend_error("POST", &url, response).await);
        }

        Ok(())
    }
}

/// Turn a non-success response into a backend error, surfacing the
/// structured `message` field when the body carries one.
async fn backend_error(method: &str, url: &str, response: reqwest::Response) -> ConsoleError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!("HTTP {} failed: {} {} - {}", method, url, status, body);

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("{}: {}", status, body));
    ConsoleError::BackendError(message)
}
