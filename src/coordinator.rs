//! The view coordinator: one session of select → submit → review.
//!
//! [`Coordinator`] owns the current [`ViewState`], the pending selection and
//! the session's [`PreviewStore`]. It runs the validator, drives the uploader
//! and feeds what happened to [`crate::state::reduce`]. It contains no
//! business logic of its own beyond that dispatch.
//!
//! ## Busy policy
//!
//! While an attempt is in flight, new selections and new submits are
//! ignored and reported as [`SelectionOutcome::IgnoredBusy`] /
//! [`SubmitOutcome::IgnoredBusy`]. The in-flight attempt always settles the
//! state it started.
//!
//! For callers on a single task the borrow checker already enforces this:
//! [`Coordinator::on_submit`] holds `&mut self` across the upload, so nothing
//! else can reach the coordinator until the attempt has settled. The busy
//! checks guard hosts that drive the state machine through other paths.

use crate::config::UploadPolicy;
use crate::error::{DocViewError, RejectReason};
use crate::observer::{NoopObserver, Observer};
use crate::pipeline::select::{first_dropped, CandidateFile};
use crate::pipeline::upload::Uploader;
use crate::pipeline::validate::{notice, validate, Verdict};
use crate::session::PreviewStore;
use crate::state::{reduce, Event, Phase, ViewState};
use crate::view::{PreviewRenderer, PreviewView, ResultView};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The file is now the pending selection.
    Accepted,
    /// The validator turned the file away; the previous selection stands.
    Rejected { reason: RejectReason, notice: String },
    /// An upload is in flight; the selection was not changed.
    IgnoredBusy,
    /// A drop gesture carried no files.
    NothingDropped,
}

/// How a submit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt settled with a result.
    Succeeded,
    /// The attempt settled with an error message in the view state.
    Failed,
    /// There is no pending selection to upload.
    NoSelection,
    /// An attempt is already in flight.
    IgnoredBusy,
}

/// One upload session.
pub struct Coordinator<U> {
    policy: UploadPolicy,
    uploader: U,
    store: PreviewStore,
    state: ViewState,
    pending: Option<CandidateFile>,
    observer: Observer,
}

impl<U: Uploader> Coordinator<U> {
    /// Start a session. Creates the session's preview directory.
    pub fn new(policy: UploadPolicy, uploader: U) -> Result<Self, DocViewError> {
        Ok(Self {
            policy,
            uploader,
            store: PreviewStore::new()?,
            state: ViewState::default(),
            pending: None,
            observer: Arc::new(NoopObserver),
        })
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn pending(&self) -> Option<&CandidateFile> {
        self.pending.as_ref()
    }

    /// Validate `file` and, if accepted, make it the pending selection.
    pub fn on_file_selected(&mut self, file: CandidateFile) -> SelectionOutcome {
        if self.state.busy {
            let msg = format!("Upload in progress; ignoring selection of {}", file.name());
            debug!("{}", msg);
            self.observer.on_notice(&msg);
            return SelectionOutcome::IgnoredBusy;
        }

        match validate(&file, &self.policy) {
            Verdict::Accepted => {
                debug!("Accepted {} ({})", file.name(), file.display_size());
                self.observer.on_selection(file.name(), file.size());
                self.pending = Some(file);
                SelectionOutcome::Accepted
            }
            Verdict::Rejected(reason) => {
                let notice = notice(reason, &self.policy);
                info!("Rejected {}: {}", file.name(), reason);
                self.observer.on_notice(&notice);
                SelectionOutcome::Rejected { reason, notice }
            }
        }
    }

    /// Select the first file of a drop gesture.
    pub fn on_files_dropped(&mut self, files: Vec<CandidateFile>) -> SelectionOutcome {
        let count = files.len();
        match first_dropped(files) {
            Some(file) => {
                if count > 1 {
                    debug!("Dropped {} files; selecting only {}", count, file.name());
                }
                self.on_file_selected(file)
            }
            None => SelectionOutcome::NothingDropped,
        }
    }

    /// Upload the pending selection and settle the view state.
    pub async fn on_submit(&mut self) -> SubmitOutcome {
        let Some(file) = self.pending.clone() else {
            return SubmitOutcome::NoSelection;
        };
        if self.state.busy {
            return SubmitOutcome::IgnoredBusy;
        }

        self.dispatch(Event::SubmitStarted);
        let attempt = self.state.attempt;

        let settled = match self.uploader.upload(&file).await {
            Ok(result) => match self.store.persist(&file) {
                Ok(preview) => Event::UploadSucceeded {
                    attempt,
                    result,
                    preview,
                },
                Err(e) => {
                    warn!("Could not keep a preview of {}: {}", file.name(), e);
                    Event::UploadFailed {
                        attempt,
                        message: e.to_string(),
                    }
                }
            },
            Err(e) => Event::UploadFailed {
                attempt,
                message: e.message,
            },
        };
        self.dispatch(settled);

        match self.state.phase() {
            Phase::Succeeded => SubmitOutcome::Succeeded,
            _ => SubmitOutcome::Failed,
        }
    }

    /// Render the document preview pane.
    pub fn render_preview<R: PreviewRenderer>(&self, renderer: &R) -> String {
        PreviewView::from_state(&self.state).render(renderer)
    }

    /// Derive the extraction results pane.
    pub fn result_view(&self) -> ResultView {
        ResultView::from_state(&self.state)
    }

    fn dispatch(&mut self, event: Event) {
        let next = reduce(self.state.clone(), event);
        if next != self.state {
            self.state = next;
            self.observer.on_state_changed(&self.state);
        }
    }
}
