//! # Signup Relay
//!
//! Validates signup submissions and relays them to a hosted form through a
//! browser automation service.
//!
//! ```text
//! SignupRequest ──validate──▶ Signup ──FormRelay::submit_form──▶ SubmissionOutcome
//!                                         │
//!                          no token ──────┤──▶ mock outcome (no network)
//!                                         │
//!                          token ─────────┴──▶ AutomationScript ─▶ transport ─▶ classify
//! ```
//!
//! Classification order: top-level service errors, then failed script steps,
//! then the success-marker heuristic on the captured page.

pub mod error;
pub mod relay;
pub mod response;
pub mod script;
pub mod signup;
pub mod transport;

pub use error::{RelayError, ValidationError};
pub use relay::{FormRelay, RelayMode, SubmissionOutcome};
pub use response::{classify, AutomationResponse, StepResult, SubmissionEvidence};
pub use script::{AutomationScript, ScriptStep, ScriptTargets, StepAction};
pub use signup::{Signup, SignupRequest};
pub use transport::{AutomationTransport, BrowserlessTransport};
