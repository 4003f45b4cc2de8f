//! Read-only views derived from [`ViewState`].
//!
//! Two panes exist, mirroring the two halves of the screen:
//!
//! * [`PreviewView`] — the original document, classified as PDF, image or
//!   unsupported and drawn through a [`PreviewRenderer`];
//! * [`ResultView`] — classification badges, the structured payload and the
//!   complete raw response, pretty-printed.
//!
//! Both are plain values computed from the state, so rendering the same state
//! twice yields identical output. The concrete drawing technology lives in
//! [`text`] (terminal) and [`html`] (standalone report page).

pub mod html;
pub mod text;

use crate::export::pretty_json;
use crate::session::PreviewSource;
use crate::state::ViewState;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub use html::{HtmlRenderer, PreviewEmbedding};
pub use text::TextRenderer;

pub const EMPTY_PREVIEW_TITLE: &str = "No document selected";
pub const EMPTY_PREVIEW_HINT: &str = "Upload a PDF or image file to preview it here";
pub const UNSUPPORTED_PREVIEW_TITLE: &str = "Preview not available";
pub const UNSUPPORTED_PREVIEW_HINT: &str = "Unsupported file format for preview";
pub const PDF_FALLBACK_NOTICE: &str = "PDF preview not available in this browser";
pub const PDF_FALLBACK_LINK: &str = "Open PDF in new tab";
pub const EMPTY_RESULT_TITLE: &str = "No extraction results";
pub const EMPTY_RESULT_HINT: &str = "Process a document to see structured data extraction results";
pub const BUSY_NOTICE: &str = "Processing document... This may take a few moments.";

static RE_IMAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)$").unwrap());

// ── Preview ──────────────────────────────────────────────────────────────

/// How a preview source will be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Pdf,
    Image,
    Unsupported,
}

/// Classify a preview source by its file name and URI.
///
/// Anything mentioning `.pdf` is a PDF; names ending in a common raster
/// extension are images; everything else is unsupported.
pub fn classify(source: &PreviewSource) -> PreviewKind {
    let names = [source.file_name(), source.uri()];
    if names.iter().any(|n| n.to_ascii_lowercase().contains(".pdf")) {
        PreviewKind::Pdf
    } else if names.iter().any(|n| RE_IMAGE_NAME.is_match(n)) {
        PreviewKind::Image
    } else {
        PreviewKind::Unsupported
    }
}

/// Drawing backend for the preview pane.
pub trait PreviewRenderer {
    /// Embedded document viewer, with a fallback link where unsupported.
    fn render_pdf(&self, source: &PreviewSource) -> String;
    fn render_image(&self, source: &PreviewSource) -> String;
    /// "Preview not available" notice for a document that cannot be shown.
    fn render_unsupported(&self, source: &PreviewSource) -> String;
    /// Placeholder before any document has been uploaded.
    fn render_empty(&self) -> String;
}

/// The preview pane as derived from state.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewView {
    Empty,
    Document {
        kind: PreviewKind,
        source: PreviewSource,
    },
}

impl PreviewView {
    pub fn from_state(state: &ViewState) -> Self {
        match &state.preview {
            None => PreviewView::Empty,
            Some(source) => PreviewView::Document {
                kind: classify(source),
                source: source.clone(),
            },
        }
    }

    pub fn render<R: PreviewRenderer + ?Sized>(&self, renderer: &R) -> String {
        match self {
            PreviewView::Empty => renderer.render_empty(),
            PreviewView::Document { kind, source } => match kind {
                PreviewKind::Pdf => renderer.render_pdf(source),
                PreviewKind::Image => renderer.render_image(source),
                PreviewKind::Unsupported => renderer.render_unsupported(source),
            },
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────────

/// One `keyword_matches` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordBadge {
    pub category: String,
    pub count: String,
}

impl KeywordBadge {
    /// Badge text, e.g. `total: 2 matches`.
    pub fn label(&self) -> String {
        format!("{}: {} matches", self.category, self.count)
    }
}

/// The results pane as derived from state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Empty,
    Loaded {
        document_type: String,
        keyword_badges: Vec<KeywordBadge>,
        structured_json: String,
        raw_json: String,
    },
}

impl ResultView {
    pub fn from_state(state: &ViewState) -> Self {
        let Some(result) = &state.result else {
            return ResultView::Empty;
        };

        let keyword_badges = result
            .keyword_matches()
            .map(|matches| {
                matches
                    .iter()
                    .map(|(category, count)| KeywordBadge {
                        category: category.clone(),
                        count: display_count(count),
                    })
                    .collect()
            })
            .unwrap_or_default();

        ResultView::Loaded {
            document_type: result.document_type(),
            keyword_badges,
            structured_json: pretty_json(result.structured_data()),
            raw_json: pretty_json(result.raw()),
        }
    }
}

/// Counts are numbers when the service behaves; show anything else as text.
fn display_count(count: &Value) -> String {
    match count {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
