//! Pipeline stages between a user's pick and an extraction result.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the coordinator stays a thin dispatcher.
//!
//! ## Data Flow
//!
//! ```text
//! select ──▶ validate ──▶ upload
//! (path/drop)  (policy)    (HTTP)
//! ```
//!
//! 1. [`select`]   — read a local file into a `CandidateFile`, declaring its
//!    MIME type from the extension
//! 2. [`validate`] — pure accept/reject against the `UploadPolicy`
//! 3. [`upload`]   — the single multipart POST; the only stage with network
//!    I/O

pub mod select;
pub mod upload;
pub mod validate;
