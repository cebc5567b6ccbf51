//! REST client for the CRM backend.
//!
//! Every call carries the bearer token currently held by the injected
//! [`TokenStore`]. Responses are decoded into [`ApiEnvelope`]; anything that does
//! not fit that shape is a [`GatewayError::Decode`].

use crate::common::{GatewayError, GatewayResult};
use crate::domains::assignment::{AssignmentGateway, CreateAssignmentRequest, Worker, WorkerSource};
use crate::domains::reminders::{Reminder, ReminderSource};
use crate::domains::session::TokenStore;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Response body used by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Turn a decoded envelope into its payload, treating `success: false` as a rejection.
    pub fn into_result(self, status: u16) -> GatewayResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(GatewayError::Rejected {
                status,
                message: self.message.unwrap_or_else(|| "request was not accepted".to_string()),
            })
        }
    }
}

/// Decode a raw response body for an endpoint that must return data.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> GatewayResult<T> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_slice(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    envelope
        .into_result(status)?
        .ok_or_else(|| GatewayError::Decode("response has no data field".to_string()))
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    tokens: Arc<dyn TokenStore>,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> GatewayResult<String> {
        self.tokens.get().ok_or(GatewayError::Unauthorized)
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            GatewayError::Transport(e.to_string())
        }
    }

    async fn read(&self, response: reqwest::Response) -> GatewayResult<(u16, Vec<u8>)> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?
            .to_vec();
        if !status.is_success() {
            let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok((status.as_u16(), body))
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let token = self.bearer()?;
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let (status, body) = self.read(response).await?;
        decode_envelope(status, &body)
    }
}

#[async_trait]
impl AssignmentGateway for HttpBackend {
    async fn create_assignment(&self, request: &CreateAssignmentRequest) -> GatewayResult<()> {
        let token = self.bearer()?;
        let url = format!("{}/assignments", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let (status, body) = self.read(response).await?;
        let envelope: ApiEnvelope<serde_json::Value> =
            serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        envelope.into_result(status)?;
        tracing::debug!(worker_id = %request.worker_id, count = request.entity_ids.len(), "assignment created");
        Ok(())
    }
}

#[async_trait]
impl WorkerSource for HttpBackend {
    async fn list_workers(&self) -> GatewayResult<Vec<Worker>> {
        self.get_data("employees").await
    }
}

#[async_trait]
impl ReminderSource for HttpBackend {
    async fn fetch_reminders(&self) -> GatewayResult<Vec<Reminder>> {
        self.get_data("reminders").await
    }
}
