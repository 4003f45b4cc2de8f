//! Plain-text rendering for terminals and logs.
//!
//! A terminal cannot embed a PDF viewer or draw an image, so the preview pane
//! describes the document instead and prints its session URI so the user can
//! open it. Output is uncoloured; the CLI adds colour on top.

use super::{
    KeywordBadge, PreviewRenderer, ResultView, EMPTY_PREVIEW_HINT, EMPTY_PREVIEW_TITLE,
    EMPTY_RESULT_HINT, EMPTY_RESULT_TITLE, UNSUPPORTED_PREVIEW_HINT, UNSUPPORTED_PREVIEW_TITLE,
};
use crate::session::PreviewSource;
use std::fmt::Write as _;
use std::path::Path;

/// Renders both panes as plain text.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    /// Omit the raw-response section (the structured payload is still shown).
    pub compact: bool,
}

impl TextRenderer {
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Render the results pane.
    pub fn render_results(&self, view: &ResultView) -> String {
        let ResultView::Loaded {
            document_type,
            keyword_badges,
            structured_json,
            raw_json,
        } = view
        else {
            return format!("{EMPTY_RESULT_TITLE}\n{EMPTY_RESULT_HINT}\n");
        };

        let mut out = String::new();
        out.push_str("Document Classification\n");
        let _ = writeln!(out, "  Detected Type: [{document_type}]");
        if !keyword_badges.is_empty() {
            out.push_str("  Keyword Matches:\n");
            for badge in keyword_badges {
                let _ = writeln!(out, "    [{}]", KeywordBadge::label(badge));
            }
        }

        out.push_str("\nExtracted Data\n");
        out.push_str(structured_json);
        out.push('\n');

        if !self.compact {
            out.push_str("\nComplete Response\n");
            out.push_str(raw_json);
            out.push('\n');
        }
        out
    }
}

impl PreviewRenderer for TextRenderer {
    fn render_pdf(&self, source: &PreviewSource) -> String {
        let size = source
            .local_path()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| format!(", {} bytes", m.len()))
            .unwrap_or_default();
        format!("PDF document: {}{}\n{}\n", source.file_name(), size, source.uri())
    }

    fn render_image(&self, source: &PreviewSource) -> String {
        let dims = source
            .local_path()
            .and_then(image_dimensions)
            .map(|(w, h)| format!(" ({w}×{h} px)"))
            .unwrap_or_default();
        format!("Image: {}{}\n{}\n", source.file_name(), dims, source.uri())
    }

    fn render_unsupported(&self, source: &PreviewSource) -> String {
        format!(
            "{UNSUPPORTED_PREVIEW_TITLE}: {}\n{UNSUPPORTED_PREVIEW_HINT}\n",
            source.file_name()
        )
    }

    fn render_empty(&self) -> String {
        format!("{EMPTY_PREVIEW_TITLE}\n{EMPTY_PREVIEW_HINT}\n")
    }
}

/// Read just enough of an image header to learn its size.
fn image_dimensions(path: &Path) -> Option<(u32, u32)> {
    image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
