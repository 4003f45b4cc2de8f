//! CLI binary for docview.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, runs one select → submit cycle and prints the panes.

use anyhow::{Context, Result};
use clap::Parser;
use docview::export::{today, write_atomic};
use docview::{
    export_to_dir, CandidateFile, ClientConfig, Coordinator, HtmlRenderer, Phase,
    SelectionOutcome, SessionObserver, SubmitOutcome, TextRenderer, UploadClient, UploadPolicy,
    ViewState,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Terminal observer: a spinner while the upload is in flight, one line per
/// selection and notice.
struct CliObserver {
    spinner: ProgressBar,
    show_progress: bool,
    quiet: bool,
}

impl CliObserver {
    fn new(show_progress: bool, quiet: bool) -> Arc<Self> {
        let spinner = ProgressBar::hidden();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        Arc::new(Self {
            spinner,
            show_progress,
            quiet,
        })
    }
}

impl SessionObserver for CliObserver {
    fn on_state_changed(&self, state: &ViewState) {
        match state.phase() {
            Phase::Busy if self.show_progress => {
                self.spinner.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                self.spinner.set_prefix("Uploading");
                self.spinner
                    .set_message("Processing document... This may take a few moments.");
                self.spinner.enable_steady_tick(Duration::from_millis(80));
            }
            Phase::Succeeded | Phase::Failed => self.spinner.finish_and_clear(),
            _ => {}
        }
    }

    fn on_notice(&self, message: &str) {
        eprintln!("{} {}", yellow("⚠"), message);
    }

    fn on_selection(&self, name: &str, size: u64) {
        if !self.quiet {
            eprintln!(
                "{} {}  {}",
                cyan("◆"),
                bold(name),
                dim(&format!("{:.2} MB", size as f64 / 1024.0 / 1024.0))
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload a document and print classification + extracted data
  docview invoice.pdf

  # Use a remote extraction service
  docview --api-base-url https://ocr.example.com scan.png

  # Save the JSON download and an HTML report
  docview receipt.jpg -o exports/ --html report.html

  # Raw service response only
  docview --json invoice.pdf > result.json

  # Check a file against the upload policy without uploading
  docview --validate-only big-scan.pdf

ACCEPTED FILES:
  application/pdf (.pdf), image/jpeg (.jpg, .jpeg), image/png (.png); at most 10 MB.
  When several files are given, only the first is used (as with a drag-and-drop).

ENVIRONMENT VARIABLES:
  DOCVIEW_API_BASE_URL    Extraction service root (default http://localhost:8001)
  DOCVIEW_OUTPUT_DIR      Directory for extraction-result-YYYY-MM-DD.json
  DOCVIEW_HTML            Path of the HTML report to write
  DOCVIEW_TIMEOUT         Request timeout in seconds (default: none)
  RUST_LOG                Override log filtering (e.g. docview=debug)
"#;

/// Upload documents to an extraction service and review the results.
#[derive(Parser, Debug)]
#[command(
    name = "docview",
    version,
    about = "Upload PDF and image documents to an extraction service and review the results",
    long_about = "Validate a PDF, JPEG or PNG document locally, upload it to a document \
extraction service, and show the detected document type, keyword matches and extracted \
structured data. Optionally save the full response as JSON and an HTML report with a preview.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document(s) to upload. Only the first is used.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Extraction service root; the upload goes to <URL>/upload.
    #[arg(long, env = "DOCVIEW_API_BASE_URL", default_value = docview::config::DEFAULT_BASE_URL)]
    api_base_url: String,

    /// Request timeout in seconds. Default: wait indefinitely.
    #[arg(long, env = "DOCVIEW_TIMEOUT")]
    timeout: Option<u64>,

    /// Override the MIME type declared for the file.
    #[arg(long)]
    mime: Option<String>,

    /// Write extraction-result-YYYY-MM-DD.json into this directory.
    #[arg(short, long, env = "DOCVIEW_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Write a self-contained HTML report (preview + results) to this path.
    #[arg(long, env = "DOCVIEW_HTML")]
    html: Option<PathBuf>,

    /// Print the raw service response as JSON instead of the text panes.
    #[arg(long)]
    json: bool,

    /// Omit the complete-response section from text output.
    #[arg(long)]
    compact: bool,

    /// Validate the file against the upload policy and stop.
    #[arg(long)]
    validate_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "DOCVIEW_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCVIEW_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result itself.
    #[arg(short, long, env = "DOCVIEW_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback that matters; keep INFO logs out of
    // its way unless the user asked for them.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build session ────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let client = UploadClient::new(&config).context("Failed to set up upload client")?;
    let observer = CliObserver::new(show_progress, cli.quiet);
    let mut session = Coordinator::new(UploadPolicy::default(), client)
        .context("Failed to start session")?
        .with_observer(observer);

    // ── Select ───────────────────────────────────────────────────────────
    let mut files = Vec::new();
    // Later inputs are discarded by the drop rule; only the first is read.
    if let Some(first) = cli.inputs.first() {
        let mut file = CandidateFile::from_path(first)
            .await
            .with_context(|| format!("Failed to read {}", first.display()))?;
        if let Some(ref mime) = cli.mime {
            file = file.with_mime_type(mime.clone());
        }
        files.push(file);
    }
    if cli.inputs.len() > 1 && !cli.quiet {
        eprintln!(
            "{} {} files given; using only the first",
            yellow("⚠"),
            cli.inputs.len()
        );
    }

    match session.on_files_dropped(files) {
        SelectionOutcome::Accepted => {}
        SelectionOutcome::Rejected { reason, notice } => {
            anyhow::bail!("File rejected ({reason}): {notice}");
        }
        SelectionOutcome::IgnoredBusy | SelectionOutcome::NothingDropped => {
            anyhow::bail!("No file selected");
        }
    }

    if cli.validate_only {
        if !cli.quiet {
            eprintln!("{} accepted by upload policy", green("✔"));
        }
        return Ok(());
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let outcome = session.on_submit().await;
    let state = session.state().clone();

    if let Some(ref path) = cli.html {
        let page = HtmlRenderer::default().render_page(&state, today());
        write_atomic(path, page.as_bytes())
            .await
            .with_context(|| format!("Failed to write HTML report to {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} report  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if outcome != SubmitOutcome::Succeeded {
        let message = state.error.as_deref().unwrap_or("Upload failed.");
        if !cli.quiet {
            eprintln!("{} {}", red("✘"), bold("Extraction failed"));
        }
        anyhow::bail!("{message}");
    }

    // ── Output ───────────────────────────────────────────────────────────
    let result = state
        .result
        .as_ref()
        .context("Upload succeeded without a result")?;

    if let Some(ref dir) = cli.output_dir {
        let path = export_to_dir(result, dir, today())
            .await
            .context("Failed to export JSON")?;
        if !cli.quiet {
            eprintln!("{} JSON  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        writeln!(handle, "{}", docview::export_json(result)).context("Failed to write to stdout")?;
    } else {
        let text = if cli.compact {
            TextRenderer::compact()
        } else {
            TextRenderer::default()
        };
        if !cli.quiet {
            writeln!(handle, "{}", bold("Document Preview")).ok();
            writeln!(handle, "{}", session.render_preview(&text)).ok();
            writeln!(handle, "{}", bold("Extraction Results")).ok();
        }
        handle
            .write_all(text.render_results(&session.result_view()).as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder().base_url(cli.api_base_url.clone());
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    builder.build().context("Invalid configuration")
}
