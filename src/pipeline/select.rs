//! File selection: turn a user-supplied path into a [`CandidateFile`].
//!
//! The declared MIME type comes from the file extension, the same way a
//! browser file picker fills in `File.type`. Content is never sniffed; the
//! validator judges what was *declared*.

use crate::error::DocViewError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fallback MIME type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A document the user picked, not yet uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a local file, deriving the name and MIME type from the path.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DocViewError> {
        let path = path.as_ref();
        let bytes = read_local(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_for_path(path);
        debug!("Selected {} ({}, {} bytes)", name, mime_type, bytes.len());
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Override the declared MIME type (e.g. `--mime` on the CLI).
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Size in megabytes with two decimals, as shown next to the selection.
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// Map a path's extension to the MIME type a browser would declare.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => OCTET_STREAM,
    }
}

/// A drop gesture can carry several files; only the first is selected.
pub fn first_dropped(files: Vec<CandidateFile>) -> Option<CandidateFile> {
    files.into_iter().next()
}

async fn read_local(path: &Path) -> Result<Vec<u8>, DocViewError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => Err(map_read_error(path.to_path_buf(), e)),
    }
}

fn map_read_error(path: PathBuf, e: std::io::Error) -> DocViewError {
    match e.kind() {
        std::io::ErrorKind::NotFound => DocViewError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => DocViewError::PermissionDenied { path },
        _ => DocViewError::ReadFailed { path, source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("scan.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("receipt.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_for_path(Path::new("README")), OCTET_STREAM);
    }

    #[test]
    fn test_display_size() {
        let f = CandidateFile::new("a.pdf", "application/pdf", vec![0; 1024 * 1024 + 512 * 1024]);
        assert_eq!(f.display_size(), "1.50 MB");
    }

    #[test]
    fn test_debug_omits_bytes() {
        let f = CandidateFile::new("a.png", "image/png", vec![7; 64]);
        let dbg = format!("{f:?}");
        assert!(dbg.contains("size: 64"), "got: {dbg}");
        assert!(!dbg.contains("7, 7"), "got: {dbg}");
    }

    #[test]
    fn test_first_dropped() {
        let a = CandidateFile::new("a.pdf", "application/pdf", vec![]);
        let b = CandidateFile::new("b.png", "image/png", vec![]);
        assert_eq!(first_dropped(vec![a.clone(), b]), Some(a));
        assert_eq!(first_dropped(vec![]), None);
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        std::fs::write(&path, b"%PDF-1.7\n").unwrap();

        let f = CandidateFile::from_path(&path).await.unwrap();
        assert_eq!(f.name(), "invoice.pdf");
        assert_eq!(f.mime_type(), "application/pdf");
        assert_eq!(f.size(), 9);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CandidateFile::from_path(dir.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocViewError::FileNotFound { .. }), "got: {err:?}");
    }
}
