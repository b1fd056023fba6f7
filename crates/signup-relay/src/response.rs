//! Automation response model and classification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RelayError;
use crate::script::AutomationScript;

/// Case-sensitive markers that indicate the hosted form accepted the
/// submission. The form returns no structured result, so the captured page is
/// searched for these.
pub const SUCCESS_MARKERS: &[&str] = &["success", "thank", "submitted", "Thank you", "Success"];

/// Characters of captured HTML kept for diagnostics.
pub const HTML_EXCERPT_CHARS: usize = 1000;

/// Raw response body of the automation service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomationResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,

    #[serde(default)]
    pub errors: Option<Vec<ApiErrorEntry>>,
}

/// One entry of the top-level error list.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntry {
    pub message: String,

    #[serde(default)]
    pub path: Option<Vec<Value>>,
}

/// Timing and geometry metadata reported by most steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepTiming {
    #[serde(default)]
    pub time: Option<f64>,

    #[serde(default)]
    pub status: Option<u16>,

    #[serde(default)]
    pub selector: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl StepTiming {
    /// Read each field on its own so one ill-typed value does not discard
    /// the rest.
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            time: obj.get("time").and_then(Value::as_f64),
            status: obj
                .get("status")
                .and_then(Value::as_u64)
                .and_then(|s| u16::try_from(s).ok()),
            selector: obj.get("selector").and_then(Value::as_str).map(str::to_string),
            url: obj.get("url").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Result of one step, resolved from its loosely-typed JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// Null or absent: the step did not run or its selector never matched.
    Missing,
    /// The step reported an embedded error.
    Error(String),
    /// The step ran and reported metadata.
    Timing(StepTiming),
    /// A page capture.
    Html { html: String, time: Option<f64> },
}

impl StepResult {
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return StepResult::Missing;
        };
        match value {
            Value::Null => StepResult::Missing,
            Value::Object(obj) => {
                if let Some(err) = obj.get("error") {
                    let description = match err {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    return StepResult::Error(description);
                }
                if let Some(Value::String(html)) = obj.get("html") {
                    return StepResult::Html {
                        html: html.clone(),
                        time: obj.get("time").and_then(Value::as_f64),
                    };
                }
                StepResult::Timing(StepTiming::from_object(obj))
            }
            _ => StepResult::Timing(StepTiming::default()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepResult::Missing | StepResult::Error(_))
    }
}

/// Diagnostics returned with a classified live submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEvidence {
    /// Leading part of the captured page.
    pub html: String,

    /// Page URL after the submit navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Whether captured HTML contains any success marker.
pub fn has_success_marker(html: &str) -> bool {
    SUCCESS_MARKERS.iter().any(|marker| html.contains(marker))
}

/// Classify a response to `script`.
///
/// Top-level errors win, then any failed non-terminal step, and only then is
/// the captured HTML searched for a success marker.
pub fn classify(
    response: AutomationResponse,
    script: &AutomationScript,
) -> Result<SubmissionEvidence, RelayError> {
    if let Some(errors) = response.errors {
        return Err(RelayError::Api(errors.into_iter().map(|e| e.message).collect()));
    }

    let data = response.data.unwrap_or_default();
    let terminal = script.terminal_label();

    let mut failed: Vec<String> = script
        .checked_labels()
        .filter(|label| StepResult::from_value(data.get(*label)).is_failure())
        .map(str::to_string)
        .collect();

    // Steps the service reported beyond the script are checked as well.
    for (label, value) in &data {
        let known = Some(label.as_str()) == terminal
            || script.steps.iter().any(|s| &s.label == label);
        if !known && StepResult::from_value(Some(value)).is_failure() {
            failed.push(label.clone());
        }
    }

    if !failed.is_empty() {
        return Err(RelayError::StepFailure(failed));
    }

    let html = match terminal.map(|label| StepResult::from_value(data.get(label))) {
        Some(StepResult::Html { html, .. }) => html,
        _ => String::new(),
    };
    let url = script
        .navigation_label()
        .and_then(|label| match StepResult::from_value(data.get(label)) {
            StepResult::Timing(timing) => timing.url,
            _ => None,
        });

    let evidence = SubmissionEvidence {
        html: html.chars().take(HTML_EXCERPT_CHARS).collect(),
        url,
    };

    if has_success_marker(&html) {
        Ok(evidence)
    } else {
        Err(RelayError::HeuristicMismatch(evidence))
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
