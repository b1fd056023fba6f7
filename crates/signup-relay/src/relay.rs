//! Form submission relay.
//!
//! Decides between the mock and live paths, runs the live script through an
//! [`AutomationTransport`] and folds every result into a
//! [`SubmissionOutcome`]. Nothing escapes as an error.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use signup_config::AutomationConfig;

use crate::error::RelayError;
use crate::response::{classify, SubmissionEvidence};
use crate::script::{AutomationScript, ScriptTargets};
use crate::signup::Signup;
use crate::transport::{AutomationTransport, BrowserlessTransport};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully";
pub const MOCK_MESSAGE: &str = "Mock form submission successful (no automation token configured)";

/// Normalized result of one relay invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SubmissionOutcome {
    pub fn succeeded(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn failed(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }

    /// Whether this outcome came from the mock path.
    pub fn is_mock(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.get("mock"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl From<RelayError> for SubmissionOutcome {
    fn from(err: RelayError) -> Self {
        let message = err.to_string();
        match err {
            RelayError::HeuristicMismatch(evidence) => {
                SubmissionOutcome::failed(message, Some(evidence_data(&evidence)))
            }
            _ => SubmissionOutcome::failed(message, None),
        }
    }
}

fn evidence_data(evidence: &SubmissionEvidence) -> Value {
    json!({ "html": evidence.html, "url": evidence.url })
}

/// Execution mode chosen from the configured credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    Mock,
    Live,
}

/// Relays validated signups to the hosted form.
pub struct FormRelay {
    config: AutomationConfig,
    targets: ScriptTargets,
    transport: Arc<dyn AutomationTransport>,
}

impl FormRelay {
    /// Create a relay talking to the configured automation service.
    pub fn new(config: AutomationConfig) -> Result<Self, RelayError> {
        let transport = Arc::new(BrowserlessTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a relay with a custom transport.
    pub fn with_transport(config: AutomationConfig, transport: Arc<dyn AutomationTransport>) -> Self {
        let targets = ScriptTargets::from(&config);
        Self {
            config,
            targets,
            transport,
        }
    }

    pub fn mode(&self) -> RelayMode {
        if self.config.is_mock() {
            RelayMode::Mock
        } else {
            RelayMode::Live
        }
    }

    /// Submit `signup` to the hosted form.
    pub async fn submit_form(&self, signup: &Signup) -> SubmissionOutcome {
        info!("Starting form submission for {}", signup.email);

        let Some(credential) = self.config.credential() else {
            warn!("No valid automation token configured - returning mock success");
            return mock_outcome(signup);
        };

        match self.execute(signup, credential).await {
            Ok(evidence) => SubmissionOutcome::succeeded(SUCCESS_MESSAGE, Some(evidence_data(&evidence))),
            Err(err) => {
                match &err {
                    RelayError::HeuristicMismatch(evidence) => warn!(
                        url = ?evidence.url,
                        "No success marker found in the captured page"
                    ),
                    other => error!(kind = other.kind(), "Form submission failed: {}", other),
                }
                SubmissionOutcome::from(err)
            }
        }
    }

    async fn execute(&self, signup: &Signup, credential: &str) -> Result<SubmissionEvidence, RelayError> {
        let script = AutomationScript::signup(signup, &self.targets);
        let response = self.transport.execute(&script, credential).await?;
        classify(response, &script)
    }
}

fn mock_outcome(signup: &Signup) -> SubmissionOutcome {
    SubmissionOutcome::succeeded(
        MOCK_MESSAGE,
        Some(json!({
            "firstName": signup.first_name,
            "lastName": signup.last_name,
            "email": signup.email,
            "isScientist": signup.is_scientist,
            "submittedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "mock": true,
        })),
    )
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
