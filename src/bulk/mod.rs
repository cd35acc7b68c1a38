//! Bulk Submission
//!
//! Holds the list being edited and submits it as one batch:
//! - **session**: editable records plus their validation errors
//! - **coordinator**: validate, normalize, submit, report progress and outcome
//! - **messages**: user-facing outcome text

mod coordinator;
mod messages;
mod session;

pub use coordinator::{
    BulkSubmitter, SubmissionReport, SubmissionState, SubmitConfig, SubmitError,
};
pub use messages::{partial_message, success_message, user_message};
pub use session::BulkSession;
