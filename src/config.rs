//! Configuration types for the upload workflow.
//!
//! Two independent pieces of configuration exist:
//!
//! * [`UploadPolicy`] — what the validator lets through (MIME types, size
//!   ceiling). Fixed once a session starts.
//! * [`ClientConfig`] — where and how the upload client talks to the
//!   extraction service. Built via [`ClientConfigBuilder`].
//!
//! Neither type reads the environment. The CLI resolves
//! `DOCVIEW_API_BASE_URL` and friends through clap and passes plain values in,
//! so library behaviour never depends on ambient process state.

use crate::error::DocViewError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default extraction service location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Default size ceiling: 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types the service knows how to process.
pub const DEFAULT_ACCEPTED_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// Validation rules applied to a candidate file before upload.
///
/// Fields are private so a policy cannot change after construction.
/// Deserialization goes through [`UploadPolicy::new`], so stored types are
/// always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PolicyFields")]
pub struct UploadPolicy {
    accepted_types: BTreeSet<String>,
    max_bytes: u64,
}

#[derive(Deserialize)]
struct PolicyFields {
    accepted_types: Vec<String>,
    max_bytes: u64,
}

impl From<PolicyFields> for UploadPolicy {
    fn from(fields: PolicyFields) -> Self {
        Self::new(fields.accepted_types, fields.max_bytes)
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTED_TYPES, DEFAULT_MAX_BYTES)
    }
}

impl UploadPolicy {
    pub fn new<I, S>(accepted_types: I, max_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted_types: accepted_types
                .into_iter()
                .map(|t| t.into().to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    pub fn accepts_type(&self, mime_type: &str) -> bool {
        self.accepted_types.contains(&mime_type.to_ascii_lowercase())
    }

    pub fn accepted_types(&self) -> impl Iterator<Item = &str> {
        self.accepted_types.iter().map(String::as_str)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Size ceiling in whole megabytes, for user-facing messages.
    pub fn max_megabytes(&self) -> u64 {
        self.max_bytes / (1024 * 1024)
    }
}

/// Configuration for the extraction-service client.
///
/// # Example
/// ```rust
/// use docview::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://extractor.internal:8001/")
///     .request_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.upload_url(), "http://extractor.internal:8001/upload");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root; the client POSTs to `{base_url}/upload`. Default: `http://localhost:8001`.
    pub base_url: String,

    /// Optional whole-request timeout in seconds. Default: none.
    ///
    /// Extraction of a long scanned PDF can take minutes, and the service gives
    /// no progress signal, so by default the client waits as long as the
    /// connection stays open.
    pub request_timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every upload.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            user_agent: concat!("docview/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url.trim_end_matches('/'))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, DocViewError> {
        let c = &self.config;
        let parsed = reqwest::Url::parse(&c.base_url).map_err(|e| {
            DocViewError::InvalidConfig(format!("base URL '{}' is not a valid URL: {}", c.base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DocViewError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(DocViewError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
