//! Standalone HTML report: the same two panes a browser front end shows.
//!
//! The page is self-contained (inline CSS, no scripts). The download control
//! is a plain `<a download>` pointing at a base64 data URI of the export, so
//! the report works from `file://` without a server.
//!
//! ## Why inline previews?
//!
//! Session preview copies are deleted when the session ends, which for the
//! CLI is the moment the report has been written. [`PreviewEmbedding::Inline`]
//! therefore embeds the document bytes in the page; `Link` is for long-lived
//! hosts that keep the session open while the page is displayed.

use super::{
    PreviewRenderer, PreviewView, ResultView, BUSY_NOTICE, EMPTY_PREVIEW_HINT,
    EMPTY_PREVIEW_TITLE, EMPTY_RESULT_HINT, EMPTY_RESULT_TITLE, PDF_FALLBACK_LINK,
    PDF_FALLBACK_NOTICE, UNSUPPORTED_PREVIEW_HINT, UNSUPPORTED_PREVIEW_TITLE,
};
use crate::export::export_file_name;
use crate::pipeline::select::mime_for_path;
use crate::session::PreviewSource;
use crate::state::ViewState;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

const PAGE_TITLE: &str = "OCR Document Processor";
const PAGE_SUBTITLE: &str =
    "Upload PDF or image documents for AI-powered text extraction and structured data analysis";

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;padding:24px;color:#111}\
main{max-width:1280px;margin:0 auto}\
.panes{display:flex;gap:24px;margin-top:32px;flex-wrap:wrap}\
.pane{flex:1;min-width:320px;border:1px solid #ddd;border-radius:8px;padding:24px}\
.empty{height:24rem;display:flex;flex-direction:column;align-items:center;justify-content:center;color:#666}\
.preview{height:24rem;overflow:auto}\
.preview img{max-width:100%;max-height:100%;object-fit:contain}\
.badge{display:inline-block;border:1px solid #999;border-radius:9999px;padding:0 8px;font-size:.8rem}\
.badge.primary{background:#111;color:#fff;border-color:#111}\
pre{background:#f4f4f5;border-radius:8px;padding:16px;overflow:auto;white-space:pre-wrap}\
.error{margin-top:16px;padding:16px;border:1px solid #f5c2c2;background:#fdf0f0;color:#b91c1c;border-radius:8px}\
.busy{margin-top:16px;padding:16px;background:#f4f4f5;border-radius:8px;color:#555}";

/// How the preview pane references the document bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewEmbedding {
    /// Point at the session URI. Valid only while the session lives.
    Link,
    /// Embed the bytes as a base64 `data:` URI. (default)
    #[default]
    Inline,
}

/// Renders panes and whole pages as HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    pub embedding: PreviewEmbedding,
}

impl HtmlRenderer {
    pub fn new(embedding: PreviewEmbedding) -> Self {
        Self { embedding }
    }

    /// The full report page for `state`.
    ///
    /// `export_date` names the download; pass it in so the same state always
    /// renders the same bytes.
    pub fn render_page(&self, state: &ViewState, export_date: NaiveDate) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape(PAGE_TITLE));
        let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>\n<main>");
        let _ = writeln!(
            out,
            "<header><h1>{}</h1><p>{}</p></header>",
            escape(PAGE_TITLE),
            escape(PAGE_SUBTITLE)
        );

        if let Some(error) = &state.error {
            let _ = writeln!(out, "<div class=\"error\"><p>Error: {}</p></div>", escape(error));
        }
        if state.busy {
            let _ = writeln!(out, "<div class=\"busy\"><p>{}</p></div>", escape(BUSY_NOTICE));
        }

        out.push_str("<div class=\"panes\">\n");
        out.push_str("<section class=\"pane\"><h2>Document Preview</h2>\n");
        out.push_str(&PreviewView::from_state(state).render(self));
        out.push_str("</section>\n");
        out.push_str("<section class=\"pane\"><h2>Extraction Results</h2>\n");
        out.push_str(&self.render_results(state, export_date));
        out.push_str("</section>\n</div>\n</main>\n</body>\n</html>\n");
        out
    }

    /// The results pane, including the download control.
    pub fn render_results(&self, state: &ViewState, export_date: NaiveDate) -> String {
        let view = ResultView::from_state(state);
        let ResultView::Loaded {
            document_type,
            keyword_badges,
            structured_json,
            raw_json,
        } = &view
        else {
            return empty_card(EMPTY_RESULT_TITLE, EMPTY_RESULT_HINT);
        };

        let mut out = String::new();
        out.push_str("<div class=\"card\"><h3>Document Classification</h3>\n");
        let _ = writeln!(
            out,
            "<p>Detected Type: <span class=\"badge primary\">{}</span></p>",
            escape(document_type)
        );
        if !keyword_badges.is_empty() {
            out.push_str("<p>Keyword Matches:</p>\n<ul>\n");
            for badge in keyword_badges {
                let _ = writeln!(
                    out,
                    "<li>{}: <span class=\"badge\">{} matches</span></li>",
                    escape(&badge.category),
                    escape(&badge.count)
                );
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</div>\n");

        // The download carries the complete response, which is `raw_json`.
        let _ = writeln!(
            out,
            "<div class=\"card\"><h3>Extracted Data</h3>\n\
             <a download=\"{}\" href=\"data:application/json;base64,{}\">Download JSON</a>\n\
             <pre>{}</pre></div>",
            escape(&export_file_name(export_date)),
            STANDARD.encode(raw_json.as_bytes()),
            escape(structured_json)
        );
        let _ = writeln!(
            out,
            "<div class=\"card\"><h3>Complete Response</h3>\n<pre>{}</pre></div>",
            escape(raw_json)
        );
        out
    }

    /// The URI the page should use for `source`.
    fn source_href(&self, source: &PreviewSource) -> String {
        if self.embedding == PreviewEmbedding::Inline {
            if let Some(uri) = source.local_path().and_then(|p| data_uri(p, source.file_name())) {
                return uri;
            }
            debug!("Falling back to linked preview for {}", source.file_name());
        }
        source.uri().to_string()
    }
}

impl PreviewRenderer for HtmlRenderer {
    fn render_pdf(&self, source: &PreviewSource) -> String {
        let href = escape(&self.source_href(source));
        format!(
            "<div class=\"preview\"><object data=\"{href}\" type=\"application/pdf\" width=\"100%\" height=\"100%\">\n\
             <div class=\"empty\"><p>{}</p><a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div>\n\
             </object></div>\n",
            escape(PDF_FALLBACK_NOTICE),
            escape(PDF_FALLBACK_LINK)
        )
    }

    fn render_image(&self, source: &PreviewSource) -> String {
        format!(
            "<div class=\"preview\"><img src=\"{}\" alt=\"Document preview\"></div>\n",
            escape(&self.source_href(source))
        )
    }

    fn render_unsupported(&self, _source: &PreviewSource) -> String {
        empty_card(UNSUPPORTED_PREVIEW_TITLE, UNSUPPORTED_PREVIEW_HINT)
    }

    fn render_empty(&self) -> String {
        empty_card(EMPTY_PREVIEW_TITLE, EMPTY_PREVIEW_HINT)
    }
}

fn empty_card(title: &str, hint: &str) -> String {
    format!(
        "<div class=\"empty\"><p>{}</p><p><small>{}</small></p></div>\n",
        escape(title),
        escape(hint)
    )
}

fn data_uri(path: &Path, file_name: &str) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let mime = mime_for_path(Path::new(file_name));
    Some(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
