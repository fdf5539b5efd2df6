use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::models::{BoardAbout, BoardHealth, BoardStatus, DiagReport, SystemConfig};

// ============================================================================
// BOARD API CLIENT
// ============================================================================

/// Decoded response payload, classified by the declared content type.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Json(Value),
    Text(String),
}

impl Reply {
    /// Deserialize the payload into a typed model.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Reply::Json(value) => Ok(serde_json::from_value(value)?),
            Reply::Text(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

/// Blocking client for a pixel-display board's HTTP API.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            agent: ureq::agent(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one request against the board and decode the response by its
    /// declared content type.
    ///
    /// A JSON body gets a matching content-type header; without a body the
    /// request carries neither. A non-success status fails with the
    /// response text, falling back to the status reason phrase when the
    /// body is empty. No retries.
    pub fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Reply, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.agent.request(method, &url);
        let result = match body {
            Some(value) => request
                .set("Content-Type", "application/json")
                .send_json(value),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                if response.content_type().contains("application/json") {
                    Ok(Reply::Json(response.into_json()?))
                } else {
                    Ok(Reply::Text(response.into_string()?))
                }
            }
            Err(ureq::Error::Status(status, response)) => {
                let reason = response.status_text().to_string();
                let text = response.into_string().unwrap_or_default();
                let message = if text.is_empty() { reason } else { text };
                Err(ApiError::RequestFailed { status, message })
            }
            Err(e) => Err(ApiError::Transport(Box::new(e))),
        }
    }

    pub fn get(&self, path: &str) -> Result<Reply, ApiError> {
        self.request("GET", path, None)
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Reply, ApiError> {
        self.request("POST", path, Some(body))
    }

    // ========================================================================
    // BOARD ENDPOINTS
    // ========================================================================

    pub fn status(&self) -> Result<BoardStatus, ApiError> {
        self.get("/api/status")?.decode()
    }

    pub fn health(&self) -> Result<BoardHealth, ApiError> {
        self.get("/api/health")?.decode()
    }

    pub fn about(&self) -> Result<BoardAbout, ApiError> {
        self.get("/api/about")?.decode()
    }

    pub fn diag(&self) -> Result<DiagReport, ApiError> {
        self.get("/api/diag")?.decode()
    }

    pub fn system_config(&self) -> Result<SystemConfig, ApiError> {
        self.get("/api/system/config")?.decode()
    }

    /// Apply a partial system-config update; the board accepts any subset
    /// of the config fields.
    pub fn set_system_config(&self, config: &Value) -> Result<Reply, ApiError> {
        self.post("/api/system/config", config)
    }

    /// Timezone database passthrough; shape is owned by the firmware.
    pub fn zonedb(&self) -> Result<Reply, ApiError> {
        self.get("/api/time/zonedb")
    }
}
