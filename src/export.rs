//! The downloadable JSON artifact.
//!
//! The export is the complete extraction result, pretty-printed with two-space
//! indentation and the service's key order, under a date-stamped name:
//! `extraction-result-YYYY-MM-DD.json`.

use crate::error::DocViewError;
use crate::output::ExtractionResult;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Pretty-print any JSON value with two-space indentation.
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Contents of the export file.
pub fn export_json(result: &ExtractionResult) -> String {
    pretty_json(result.raw())
}

/// `extraction-result-<date>.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("extraction-result-{}.json", date.format("%Y-%m-%d"))
}

/// Today's date in UTC, as used for the export name.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Write the export into `dir` and return the written path.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written export behind.
pub async fn export_to_dir(
    result: &ExtractionResult,
    dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf, DocViewError> {
    let dir = dir.as_ref();
    let path = dir.join(export_file_name(date));
    write_atomic(&path, export_json(result).as_bytes()).await?;
    info!("Exported extraction result to {}", path.display());
    Ok(path)
}

/// Write `contents` to `path` via a sibling temp file and rename.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DocViewError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DocViewError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| DocViewError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| DocViewError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
