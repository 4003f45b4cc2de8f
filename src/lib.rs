//! # docview
//!
//! Upload a PDF or image to a document-extraction service and review the
//! structured result next to a preview of the original document.
//!
//! ## Workflow
//!
//! ```text
//! path / drop
//!  │
//!  ├─ 1. Select    read bytes, declare MIME type from the extension
//!  ├─ 2. Validate  accepted type? ≤ 10 MiB?  (pure, no I/O)
//!  ├─ 3. Upload    multipart POST {base_url}/upload, field `file`
//!  ├─ 4. Reduce    (ViewState, Event) → ViewState
//!  └─ 5. View      preview pane + results pane, text or HTML; JSON export
//! ```
//!
//! [`Coordinator`] drives steps 1–4 for one session and owns the preview
//! copies it creates; everything it shows is derived from [`ViewState`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docview::{CandidateFile, ClientConfig, Coordinator, TextRenderer, UploadClient, UploadPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = UploadClient::new(&ClientConfig::default())?;
//!     let mut session = Coordinator::new(UploadPolicy::default(), client)?;
//!
//!     session.on_file_selected(CandidateFile::from_path("invoice.pdf").await?);
//!     session.on_submit().await;
//!
//!     let text = TextRenderer::default();
//!     println!("{}", session.render_preview(&text));
//!     println!("{}", text.render_results(&session.result_view()));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docview` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod coordinator;
pub mod error;
pub mod export;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder, UploadPolicy};
pub use coordinator::{Coordinator, SelectionOutcome, SubmitOutcome};
pub use error::{DocViewError, RejectReason, UploadError};
pub use export::{export_file_name, export_json, export_to_dir};
pub use observer::{NoopObserver, Observer, SessionObserver};
pub use output::ExtractionResult;
pub use pipeline::select::CandidateFile;
pub use pipeline::upload::{UploadClient, Uploader};
pub use pipeline::validate::{validate, Verdict};
pub use session::{PreviewSource, PreviewStore};
pub use state::{reduce, Event, Phase, ViewState};
pub use view::{
    HtmlRenderer, PreviewEmbedding, PreviewKind, PreviewRenderer, PreviewView, ResultView,
    TextRenderer,
};
