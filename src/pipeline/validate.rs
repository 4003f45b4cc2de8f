//! Client-side gate in front of the upload.
//!
//! The type check runs before the size check, so an oversized file of the
//! wrong type is reported as "unsupported type".

use crate::config::UploadPolicy;
use crate::error::RejectReason;
use crate::pipeline::select::CandidateFile;

/// Outcome of [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Judge a candidate file against the policy. Pure and total.
pub fn validate(file: &CandidateFile, policy: &UploadPolicy) -> Verdict {
    if !policy.accepts_type(file.mime_type()) {
        return Verdict::Rejected(RejectReason::UnsupportedType);
    }
    if file.size() > policy.max_bytes() {
        return Verdict::Rejected(RejectReason::TooLarge);
    }
    Verdict::Accepted
}

/// The sentence shown to the user for a rejection.
pub fn notice(reason: RejectReason, policy: &UploadPolicy) -> String {
    match reason {
        RejectReason::UnsupportedType => {
            "Unsupported file type. Please upload a PDF, JPEG, or PNG file.".to_string()
        }
        RejectReason::TooLarge => format!(
            "File size too large. Please upload a file smaller than {}MB.",
            policy.max_megabytes()
        ),
    }
}
