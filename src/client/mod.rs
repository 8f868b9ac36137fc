//! HTTP transport for the analyzer service.
//!
//! The client uploads the project archive as multipart form data and hands
//! the decoded JSON body back untouched; normalization is the caller's job
//! and is never invoked on a failed request. Failures surface as a single
//! human-readable [`ClientError`].

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Delay between retry attempts.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Errors surfaced by the analyzer transport.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot connect to analyzer at {0}")]
    Connect(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status. The message is taken from the server's error
    /// envelope when one is present.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("analyzer response was not valid JSON")]
    Decode(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),
}

impl ClientError {
    /// Connection-level failures are worth retrying; anything the server
    /// actually answered is not.
    fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Connect(_) | ClientError::Timeout(_))
    }
}

/// Configuration for the analyzer client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the analyzer API, e.g. `http://localhost:8080/api/explain`.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries on connection failure.
    pub retries: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/explain".to_string(),
            timeout_seconds: 120,
            retries: 3,
        }
    }
}

/// Client for the analyzer service.
pub struct AnalyzeClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl AnalyzeClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { config, http })
    }

    /// Upload an archive and return the decoded JSON body of a successful
    /// analyze response. The body is returned as-is for the normalizer;
    /// retried attempts are independent and accumulate no state.
    pub async fn submit(&self, archive: &Path) -> Result<Value, ClientError> {
        let bytes = tokio::fs::read(archive)
            .await
            .map_err(|source| ClientError::Archive {
                path: archive.display().to_string(),
                source,
            })?;

        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project.zip".to_string());

        info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            bytes.len(),
            self.config.base_url
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.post_archive(bytes.clone(), file_name.clone()).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt <= self.config.retries => {
                    warn!("Attempt {} failed ({}), retrying", attempt, err);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One upload attempt.
    async fn post_archive(&self, bytes: Vec<u8>, file_name: String) -> Result<Value, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/zip")
            .map_err(ClientError::Http)?;
        let form = Form::new().part("file", part);

        let url = self.endpoint("analyze");
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.classify_send_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response.json::<Value>().await.map_err(ClientError::Decode)
    }

    /// Probe the analyzer health endpoint. Transport errors count as down.
    pub async fn health(&self) -> bool {
        let url = self.endpoint("health");
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!("Health check failed: {}", err);
                false
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn classify_send_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.timeout_seconds)
        } else if err.is_connect() {
            ClientError::Connect(self.config.base_url.clone())
        } else {
            ClientError::Http(err)
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// The analyzer wraps failures as `{"error": ..., "message": ...}`, but older
/// deployments returned plain text or nothing at all.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = envelope.get(key).and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    format!("Server error: {}", status.as_u16())
}
