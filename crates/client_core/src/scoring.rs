//! HTTP client for the external scoring service.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    error::ErrorCode,
    protocol::{CalculateRequest, ScoreReport, ScoringErrorBody},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("failed to reach scoring service: {0}")]
    Transport(String),
    #[error("scoring service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid scoring response payload: {0}")]
    Decode(String),
}

impl ScoringError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ScoringError::Transport(_) => ErrorCode::Transport,
            ScoringError::Status { .. } => ErrorCode::Rejected,
            ScoringError::Decode(_) => ErrorCode::Decode,
        }
    }
}

/// Remote collaborator that turns concentrations into pollution indices.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    async fn calculate(&self, request: &CalculateRequest) -> Result<ScoreReport, ScoringError>;
}

pub struct HttpScoringClient {
    http: Client,
    endpoint: Url,
}

impl HttpScoringClient {
    /// `endpoint` is the full calculate URL, see
    /// [`ClientSettings::calculate_endpoint`](crate::config::ClientSettings::calculate_endpoint).
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringBackend for HttpScoringClient {
    async fn calculate(&self, request: &CalculateRequest) -> Result<ScoreReport, ScoringError> {
        debug!(
            endpoint = %self.endpoint,
            metals = request.heavy_metal_concentrations.len(),
            "posting concentrations to scoring service"
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| ScoringError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ScoringError::Transport(err.to_string()))?;

        // Any JSON body is the result, whatever the status. Bad input is
        // answered with a 4xx carrying `{ "error": ... }`.
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => {
                if !status.is_success() {
                    let message = serde_json::from_value::<ScoringErrorBody>(value.clone())
                        .map(|body| body.error)
                        .unwrap_or_default();
                    warn!(
                        status = status.as_u16(),
                        "scoring service answered with an error body: {message}"
                    );
                }
                Ok(ScoreReport::from_value(value))
            }
            Err(err) if status.is_success() => Err(ScoringError::Decode(err.to_string())),
            Err(_) => {
                let text = String::from_utf8_lossy(&body).trim().to_string();
                let message = if text.is_empty() {
                    status.canonical_reason().unwrap_or("no reason").to_string()
                } else {
                    text
                };
                Err(ScoringError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
