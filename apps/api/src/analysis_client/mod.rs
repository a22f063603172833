/// Analysis Client: the single point of contact with the remote resume-analysis service.
///
/// The service parses the resume, checks grammar and computes semantic similarity.
/// Its JSON response is returned untouched; score resolution happens in `scoring`.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const ANALYZE_PATH: &str = "/analyze_with_jd";
const MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Analysis service unavailable after {retries} attempts")]
    Exhausted { retries: u32 },
}

/// One resume submission, as received from the browser.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub jd_text: Option<String>,
}

/// Anything that can turn an upload into a raw analysis payload.
///
/// Carried in `AppState` as `Arc<dyn ResumeAnalyzer>`.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, upload: &ResumeUpload) -> Result<Value, AnalysisError>;
}

/// FastAPI error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ServiceError {
    detail: Value,
}

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    endpoint: String,
    backoff: Duration,
}

impl AnalysisClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: analyze_endpoint(base_url),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Overrides the base delay of the exponential backoff.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the upload to the service and returns its JSON body.
    /// Retries on 429, 5xx and transport errors with exponential backoff.
    pub async fn submit(&self, upload: &ResumeUpload) -> Result<Value, AnalysisError> {
        let mut last_error: Option<AnalysisError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.backoff * 2u32.pow(attempt - 1);
                warn!(
                    "Analysis call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .multipart(build_form(upload)?)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AnalysisError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Analysis service returned {}: {}", status, body);
                last_error = Some(AnalysisError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AnalysisError::Api {
                    status: status.as_u16(),
                    message: error_message(body),
                });
            }

            let body = response.bytes().await?;
            let payload: Value = serde_json::from_slice(&body)?;

            debug!(
                "Analysis call succeeded: {} bytes for {}",
                body.len(),
                upload.filename
            );

            return Ok(payload);
        }

        Err(last_error.unwrap_or(AnalysisError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ResumeAnalyzer for AnalysisClient {
    async fn analyze(&self, upload: &ResumeUpload) -> Result<Value, AnalysisError> {
        self.submit(upload).await
    }
}

/// Multipart forms are single-use, so each attempt builds its own.
fn build_form(upload: &ResumeUpload) -> Result<multipart::Form, AnalysisError> {
    let mut file = multipart::Part::bytes(upload.data.to_vec()).file_name(upload.filename.clone());
    if let Some(content_type) = &upload.content_type {
        file = file.mime_str(content_type)?;
    }

    Ok(multipart::Form::new()
        .part("file", file)
        .text("jd_text", upload.jd_text.clone().unwrap_or_default()))
}

fn analyze_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), ANALYZE_PATH)
}

/// Pulls `detail` out of a FastAPI error body, falling back to the raw text.
fn error_message(body: String) -> String {
    match serde_json::from_str::<ServiceError>(&body) {
        Ok(ServiceError {
            detail: Value::String(detail),
        }) => detail,
        Ok(ServiceError { detail }) => detail.to_string(),
        Err(_) => body,
    }
}
