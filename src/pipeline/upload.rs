//! Upload stage: one multipart POST to the extraction service.
//!
//! This is the only stage with network I/O and the only suspension point of
//! an attempt. There is no retry loop: a failed upload is reported to the
//! user, who decides whether to submit again.

use crate::config::ClientConfig;
use crate::error::{DocViewError, UploadError};
use crate::output::ExtractionResult;
use crate::pipeline::select::CandidateFile;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Name of the multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Anything that can turn a candidate file into an extraction result.
///
/// [`UploadClient`] is the HTTP implementation; the coordinator only depends
/// on this trait so it can be driven by a fake in tests.
pub trait Uploader {
    fn upload(
        &self,
        file: &CandidateFile,
    ) -> impl Future<Output = Result<ExtractionResult, UploadError>> + Send;
}

/// HTTP client for `POST {base_url}/upload`.
///
/// Error responses never surface transport text: a non-success status yields
/// the body's `detail` or "Upload failed.", even if the body is cut short.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    upload_url: String,
}

impl UploadClient {
    pub fn new(config: &ClientConfig) -> Result<Self, DocViewError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| DocViewError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            upload_url: config.upload_url(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    async fn send(&self, file: &CandidateFile) -> Result<ExtractionResult, UploadError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| UploadError::new(format!("Invalid MIME type '{}': {}", file.mime_type(), e)))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // A body that cannot be read is as unusable as one that cannot be parsed.
            let body = response.bytes().await.unwrap_or_default();
            debug!("Upload rejected with HTTP {} ({} byte body)", status, body.len());
            return Err(error_from_body(&body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UploadError::new(e.to_string()))?;
        let raw: Value = serde_json::from_slice(&body)
            .map_err(|e| UploadError::new(format!("Invalid JSON in service response: {e}")))?;
        Ok(ExtractionResult::new(raw))
    }
}

impl Uploader for UploadClient {
    async fn upload(&self, file: &CandidateFile) -> Result<ExtractionResult, UploadError> {
        let start = Instant::now();
        info!(
            "Uploading {} ({}, {} bytes) to {}",
            file.name(),
            file.mime_type(),
            file.size(),
            self.upload_url
        );

        let result = self.send(file).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(r) => info!("Extraction complete: {} in {}ms", r.document_type(), elapsed_ms),
            Err(e) => warn!("Upload failed after {}ms: {}", elapsed_ms, e),
        }
        result
    }
}

/// Build the user-facing error for a non-success response body.
///
/// Uses the string `detail` field of a JSON body; anything else yields the
/// generic "Upload failed.".
pub fn error_from_body(body: &[u8]) -> UploadError {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .map(UploadError::new)
        .unwrap_or_else(UploadError::generic)
}
