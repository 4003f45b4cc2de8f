//! Error types for the docview library.
//!
//! Three kinds of failure exist, and only one of them is an `Err` you can
//! propagate with `?` across the whole library:
//!
//! * [`DocViewError`] — **Fatal** for the operation that returned it: the file
//!   could not be read, the configuration is invalid, the export could not be
//!   written. Never stored in [`crate::state::ViewState`].
//!
//! * [`UploadError`] — **Terminal for one attempt**: the transport failed or
//!   the service rejected the document. The coordinator turns it into the
//!   `error` message of the view state; the session stays usable.
//!
//! * [`RejectReason`] — not an error at all but the negative verdict of
//!   [`crate::pipeline::validate::validate`]. It is surfaced as a transient notice.

use std::path::PathBuf;
use thiserror::Error;

/// Message used when the service reports a failure without a usable `detail`.
pub const UPLOAD_FAILED: &str = "Upload failed.";

/// Message used when the transport fails without any description.
pub const UPLOAD_ERRORED: &str = "An error occurred during upload.";

/// All fatal errors returned by the docview library.
#[derive(Debug, Error)]
pub enum DocViewError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading it failed part-way.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file (export, HTML report).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session preview store could not be created.
    #[error("Failed to create preview store: {0}")]
    PreviewStore(#[source] std::io::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed (TLS backend, bad header).
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// A failed upload attempt.
///
/// `message` is exactly what the user sees: the service's `detail`, the
/// transport error text, or one of the generic fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UploadError {
    pub message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self {
                message: UPLOAD_ERRORED.to_string(),
            }
        } else {
            Self { message }
        }
    }

    /// The service answered with a non-success status but no usable detail.
    pub fn generic() -> Self {
        Self {
            message: UPLOAD_FAILED.to_string(),
        }
    }
}

/// Why a candidate file was turned away before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The declared MIME type is not in the policy's accepted set.
    #[error("unsupported type")]
    UnsupportedType,

    /// The file is larger than the policy's byte ceiling.
    #[error("too large")]
    TooLarge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_display() {
        assert_eq!(RejectReason::UnsupportedType.to_string(), "unsupported type");
        assert_eq!(RejectReason::TooLarge.to_string(), "too large");
    }

    #[test]
    fn upload_error_displays_message_verbatim() {
        let e = UploadError::new("file corrupted");
        assert_eq!(e.to_string(), "file corrupted");
    }

    #[test]
    fn upload_error_blank_message_falls_back() {
        assert_eq!(UploadError::new("  ").message, UPLOAD_ERRORED);
        assert_eq!(UploadError::generic().message, "Upload failed.");
    }

    #[test]
    fn output_write_failed_display() {
        let e = DocViewError::OutputWriteFailed {
            path: PathBuf::from("/ro/out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/ro/out.json"), "got: {msg}");
        assert!(msg.contains("read-only"), "got: {msg}");
    }
}
