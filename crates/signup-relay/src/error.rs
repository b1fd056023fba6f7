//! Relay error types.
//!
//! The `Display` text of [`RelayError`] is the message reported to callers in
//! the failed [`SubmissionOutcome`](crate::SubmissionOutcome). None of the
//! variants carry the rendered script, which contains the submitted names
//! and email.

use thiserror::Error;

use crate::response::SubmissionEvidence;

/// Inbound signup data rejected before any external call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are absent or empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Email does not look like `local@domain.tld`.
    #[error("Invalid email format")]
    InvalidEmail,

    /// A name exceeds the form's length limit.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Failure of a live relay attempt.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Automation settings unusable (bad endpoint URL, client construction).
    #[error("Invalid automation configuration: {0}")]
    Config(String),

    /// Network failure, timeout or unreadable body.
    #[error("Execution error: {0}")]
    Transport(String),

    /// The service answered with something other than JSON.
    #[error(
        "Automation API returned {} instead of JSON (status {status}). Check URL and authentication.",
        .content_type.as_deref().unwrap_or("no content type")
    )]
    NonJsonResponse {
        status: u16,
        content_type: Option<String>,
    },

    /// The service rejected the script with a top-level error list.
    #[error("GraphQL errors: {}", .0.join(", "))]
    Api(Vec<String>),

    /// Script steps that did not execute.
    #[error("Form submission steps failed: {}", .0.join(", "))]
    StepFailure(Vec<String>),

    /// Every step ran but the final page shows no success marker.
    #[error("Form submission may have failed")]
    HeuristicMismatch(SubmissionEvidence),
}

impl RelayError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Config(_) => "config",
            RelayError::Transport(_) | RelayError::NonJsonResponse { .. } => "transport",
            RelayError::Api(_) => "api",
            RelayError::StepFailure(_) => "step_failure",
            RelayError::HeuristicMismatch(_) => "heuristic_mismatch",
        }
    }
}
