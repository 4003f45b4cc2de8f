//! View state and the pure reducer that evolves it.
//!
//! Every change to what the user sees goes through [`reduce`]. The
//! coordinator performs I/O and then dispatches an [`Event`] describing what
//! happened; the reducer decides what that means for the state. This keeps
//! the attempt cycle idle → busy → settled testable without any network or
//! rendering.
//!
//! Attempts are numbered. A completion event carries the number of the attempt
//! it settles; an event for any other attempt is stale and ignored.

use crate::output::ExtractionResult;
use crate::session::PreviewSource;

/// Everything the two views are derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub result: Option<ExtractionResult>,
    pub preview: Option<PreviewSource>,
    pub error: Option<String>,
    pub busy: bool,
    /// Number of the most recently started attempt; 0 before the first one.
    pub attempt: u64,
}

/// Where the current attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy,
    Succeeded,
    Failed,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Busy
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }
}

/// Something that happened to the current attempt.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user submitted the pending selection.
    SubmitStarted,
    UploadSucceeded {
        attempt: u64,
        result: ExtractionResult,
        preview: PreviewSource,
    },
    UploadFailed {
        attempt: u64,
        message: String,
    },
}

/// Apply `event` to `state`, returning the next state.
///
/// Starting an attempt discards the previous outcome. A submit while busy is
/// ignored, as is any completion that does not match the in-flight attempt.
pub fn reduce(state: ViewState, event: Event) -> ViewState {
    match event {
        Event::SubmitStarted => {
            if state.busy {
                return state;
            }
            ViewState {
                result: None,
                preview: None,
                error: None,
                busy: true,
                attempt: state.attempt + 1,
            }
        }
        Event::UploadSucceeded {
            attempt,
            result,
            preview,
        } => {
            if !settles(&state, attempt) {
                return state;
            }
            ViewState {
                result: Some(result),
                preview: Some(preview),
                error: None,
                busy: false,
                attempt,
            }
        }
        Event::UploadFailed { attempt, message } => {
            if !settles(&state, attempt) {
                return state;
            }
            ViewState {
                result: None,
                preview: None,
                error: Some(message),
                busy: false,
                attempt,
            }
        }
    }
}

fn settles(state: &ViewState, attempt: u64) -> bool {
    state.busy && state.attempt == attempt
}
