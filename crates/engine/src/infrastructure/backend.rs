//! HTTP client for the game-tracking backend

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use fatebot_shared::{
    CommandEnvelope, CommandPayload, CommandRequest, EnvelopeError, GameEnvelope, GameSnapshot,
};

use crate::infrastructure::ports::{BackendError, BackendPort};

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default per-request timeout.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the backend's `/game` and `/commands` endpoints
#[derive(Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl Default for HttpBackendClient {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL, DEFAULT_BACKEND_TIMEOUT)
    }
}

#[async_trait]
impl BackendPort for HttpBackendClient {
    async fn game(&self) -> Result<GameSnapshot, BackendError> {
        let response = self
            .client
            .get(self.url("game"))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let envelope: GameEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(envelope.into_snapshot())
    }

    async fn command(&self, request: CommandRequest) -> Result<CommandPayload, BackendError> {
        tracing::debug!(command = %request.command, entity = ?request.entity, "Sending backend command");

        let response = self
            .client
            .post(self.url("commands"))
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope = read_command_envelope(response).await?;
        unwrap_envelope(envelope)
    }
}

/// Only a rejection carries text meant for players; a broken nested
/// envelope is a bad response like any other.
fn unwrap_envelope(envelope: CommandEnvelope) -> Result<CommandPayload, BackendError> {
    envelope.into_payload().map_err(|error| match error {
        EnvelopeError::Rejected(description) => BackendError::Rejected(description),
        EnvelopeError::Malformed(detail) => BackendError::InvalidResponse(detail),
    })
}

/// Decode a command envelope. Error statuses that still carry a rejection
/// envelope are treated as rejections so the description reaches the user.
async fn read_command_envelope(response: Response) -> Result<CommandEnvelope, BackendError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    match serde_json::from_str::<CommandEnvelope>(&body) {
        Ok(envelope) if status.is_success() => Ok(envelope),
        Ok(envelope) if status.is_client_error() && !envelope.ok => Ok(envelope),
        Ok(_) => Err(BackendError::Status(status.as_u16())),
        Err(e) if status == StatusCode::OK => Err(BackendError::InvalidResponse(e.to_string())),
        Err(_) => Err(BackendError::Status(status.as_u16())),
    }
}

fn transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Unavailable(error.to_string())
    }
}
