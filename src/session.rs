//! Session-scoped preview handles.
//!
//! After a successful upload the view shows the original document next to the
//! results. The bytes are already in memory, so instead of re-fetching them
//! from the service we park them in a per-session temp directory and hand out
//! a [`PreviewSource`] that points at the copy.
//!
//! Lifetimes:
//! * each `PreviewSource` owns its backing file through a shared
//!   [`tempfile::TempPath`]; the file is removed when the last clone drops,
//!   i.e. when a newer result or a failure supersedes it;
//! * the [`PreviewStore`] owns the directory, which is removed when the
//!   session ends even if a handle leaked.

use crate::error::DocViewError;
use crate::pipeline::select::CandidateFile;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{TempDir, TempPath};
use tracing::debug;

/// A locally addressable reference to an uploaded document.
#[derive(Clone)]
pub struct PreviewSource {
    uri: String,
    file_name: String,
    backing: Option<Arc<TempPath>>,
}

impl PreviewSource {
    /// Reference a document that is not owned by a session (remote URL, a
    /// file the caller manages).
    pub fn external(uri: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            file_name: file_name.into(),
            backing: None,
        }
    }

    /// `file://` URI (or the external URI) used to address the document.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Name of the document as the user selected it.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Local path of the session copy, if this handle owns one.
    pub fn local_path(&self) -> Option<&Path> {
        self.backing.as_deref().map(|p| &**p)
    }
}

impl PartialEq for PreviewSource {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.file_name == other.file_name
    }
}

impl fmt::Debug for PreviewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewSource")
            .field("uri", &self.uri)
            .field("file_name", &self.file_name)
            .field("owned", &self.backing.is_some())
            .finish()
    }
}

/// Per-session directory holding preview copies.
#[derive(Debug)]
pub struct PreviewStore {
    dir: TempDir,
}

impl PreviewStore {
    pub fn new() -> Result<Self, DocViewError> {
        let dir = tempfile::Builder::new()
            .prefix("docview-session-")
            .tempdir()
            .map_err(DocViewError::PreviewStore)?;
        debug!("Preview store at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy the file's bytes into the store and return a handle to the copy.
    ///
    /// The copy keeps the original extension so the preview can be classified
    /// from its URI.
    pub fn persist(&self, file: &CandidateFile) -> Result<PreviewSource, DocViewError> {
        let suffix = Path::new(file.name())
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut tmp = tempfile::Builder::new()
            .prefix("preview-")
            .suffix(&suffix)
            .tempfile_in(self.dir.path())
            .map_err(|e| write_failed(self.dir.path().to_path_buf(), e))?;
        let written = tmp.write_all(file.bytes()).and_then(|_| tmp.flush());
        written.map_err(|e| write_failed(tmp.path().to_path_buf(), e))?;

        let path = tmp.into_temp_path();
        let uri = file_uri(&path);
        debug!("Persisted preview of {} at {}", file.name(), uri);
        Ok(PreviewSource {
            uri,
            file_name: file.name().to_string(),
            backing: Some(Arc::new(path)),
        })
    }
}

fn write_failed(path: PathBuf, source: std::io::Error) -> DocViewError {
    DocViewError::OutputWriteFailed { path, source }
}

fn file_uri(path: &Path) -> String {
    reqwest::Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", path.display()))
}
