use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub churn_label: bool,
    pub probability: f64,
    pub model_version: String,
}

/// `/health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_name: String,
    pub model_version: String,
    pub persistence_enabled: bool,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub detail: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Error)]
pub enum ChurnApiError {
    #[error("failed to reach churn API: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("churn API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid JSON response from churn API: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ChurnApiError {
    /// Status code for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ChurnApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body for `Status` errors, when it is JSON.
    pub fn body(&self) -> Option<ApiErrorBody> {
        match self {
            ChurnApiError::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

pub struct ChurnClient {
    client: Client,
    base_url: String,
}

impl ChurnClient {
    pub fn new(base_url: &str) -> Result<Self, ChurnApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ChurnApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(ChurnApiError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Score one customer. `payload` must carry every contract field.
    pub async fn predict(&self, payload: &Value) -> Result<PredictionResponse, ChurnApiError> {
        let res = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(ChurnApiError::Connect)?;
        decode(res).await
    }

    pub async fn health(&self) -> Result<HealthResponse, ChurnApiError> {
        let res = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(ChurnApiError::Connect)?;
        decode(res).await
    }

    /// Raw feature contract (`feature_count`, `features`, `groups`).
    pub async fn contract(&self) -> Result<Value, ChurnApiError> {
        let res = self
            .client
            .get(format!("{}/contract", self.base_url))
            .send()
            .await
            .map_err(ChurnApiError::Connect)?;
        decode(res).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, ChurnApiError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ChurnApiError::Status { status, body });
    }
    res.json().await.map_err(ChurnApiError::Decode)
}
