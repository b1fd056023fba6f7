//! Browser automation script model.
//!
//! A script is an ordered list of labelled steps rendered into a single BQL
//! mutation. Every string argument goes through [`escape_string`] so that
//! submitted text is typed verbatim and can never break out of its literal.

use std::fmt::Write as _;

use crate::signup::Signup;

pub const FIRST_NAME_INPUT: &str = "input[placeholder*='First']";
pub const LAST_NAME_INPUT: &str = "input[placeholder*='Last']";
pub const EMAIL_INPUT: &str = "input[placeholder*='Email']";
pub const RADIO_LABELS: &str = "label.form-check-label";
pub const SUBMIT_BUTTON: &str = "button.btn-form-primary";

/// Label of the terminal HTML capture step.
pub const HTML_STEP: &str = "html";

const OPERATION_NAME: &str = "SubmitSignupForm";
const GEOMETRY_FIELDS: &[&str] = &["height", "selector", "time", "y", "x", "width"];

/// Page lifecycle event `goto` waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    Load,
    DomContentLoaded,
    NetworkIdle,
}

impl WaitUntil {
    fn as_str(self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domContentLoaded",
            WaitUntil::NetworkIdle => "networkIdle",
        }
    }
}

/// A single browser action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Goto { url: String, wait_until: WaitUntil },
    WaitForSelector { selector: String, timeout_ms: u64 },
    Type { selector: String, text: String },
    Click { selector: String },
    WaitForNavigation { timeout_ms: u64 },
    Html,
}

enum Arg<'a> {
    Str(&'a str),
    Int(u64),
    Enum(&'static str),
}

impl StepAction {
    /// The BQL field this action maps to.
    pub fn field_name(&self) -> &'static str {
        match self {
            StepAction::Goto { .. } => "goto",
            StepAction::WaitForSelector { .. } => "waitForSelector",
            StepAction::Type { .. } => "type",
            StepAction::Click { .. } => "click",
            StepAction::WaitForNavigation { .. } => "waitForNavigation",
            StepAction::Html => "html",
        }
    }

    fn default_selection(&self) -> &'static [&'static str] {
        match self {
            StepAction::Goto { .. } => &["status"],
            StepAction::WaitForSelector { .. } => &["selector", "time"],
            StepAction::Type { .. } | StepAction::Click { .. } => &["time"],
            StepAction::WaitForNavigation { .. } => &["status", "time", "text", "url"],
            StepAction::Html => &["html", "time"],
        }
    }

    fn args(&self) -> Vec<(&'static str, Arg<'_>)> {
        match self {
            StepAction::Goto { url, wait_until } => {
                vec![("url", Arg::Str(url)), ("waitUntil", Arg::Enum(wait_until.as_str()))]
            }
            StepAction::WaitForSelector { selector, timeout_ms } => {
                vec![("selector", Arg::Str(selector)), ("timeout", Arg::Int(*timeout_ms))]
            }
            StepAction::Type { selector, text } => {
                vec![("selector", Arg::Str(selector)), ("text", Arg::Str(text))]
            }
            StepAction::Click { selector } => vec![("selector", Arg::Str(selector))],
            StepAction::WaitForNavigation { timeout_ms } => {
                vec![("timeout", Arg::Int(*timeout_ms))]
            }
            StepAction::Html => Vec::new(),
        }
    }
}

/// A labelled step. The label is the key of its result in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub label: String,
    pub action: StepAction,
    pub selection: Vec<&'static str>,
}

impl ScriptStep {
    pub fn new(label: impl Into<String>, action: StepAction) -> Self {
        let selection = action.default_selection().to_vec();
        Self {
            label: label.into(),
            action,
            selection,
        }
    }

    /// Request element geometry in addition to the default fields.
    pub fn with_geometry(mut self) -> Self {
        self.selection = GEOMETRY_FIELDS.to_vec();
        self
    }

    fn render_into(&self, out: &mut String) {
        let field = self.action.field_name();
        out.push_str("  ");
        if self.label != field {
            let _ = write!(out, "{}: ", self.label);
        }
        out.push_str(field);

        let args = self.action.args();
        if !args.is_empty() {
            out.push('(');
            for (i, (name, value)) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = match value {
                    Arg::Str(s) => write!(out, "{}: \"{}\"", name, escape_string(s)),
                    Arg::Int(n) => write!(out, "{}: {}", name, n),
                    Arg::Enum(e) => write!(out, "{}: {}", name, e),
                };
            }
            out.push(')');
        }

        out.push_str(" {\n");
        for selected in &self.selection {
            let _ = writeln!(out, "    {}", selected);
        }
        out.push_str("  }\n");
    }
}

/// Timeouts and target used when building the signup script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTargets {
    pub form_url: String,
    pub selector_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
}

impl From<&signup_config::AutomationConfig> for ScriptTargets {
    fn from(config: &signup_config::AutomationConfig) -> Self {
        Self {
            form_url: config.form_url.clone(),
            selector_timeout_ms: config.selector_timeout_ms,
            navigation_timeout_ms: config.navigation_timeout_ms,
        }
    }
}

/// An ordered automation script, sent as one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationScript {
    pub steps: Vec<ScriptStep>,
}

impl AutomationScript {
    /// Build the fixed signup flow for `signup` against `targets`.
    pub fn signup(signup: &Signup, targets: &ScriptTargets) -> Self {
        let wait = |selector: &str| StepAction::WaitForSelector {
            selector: selector.to_string(),
            timeout_ms: targets.selector_timeout_ms,
        };
        let type_into = |selector: &str, text: &str| StepAction::Type {
            selector: selector.to_string(),
            text: text.to_string(),
        };

        let steps = vec![
            ScriptStep::new(
                "goto",
                StepAction::Goto {
                    url: targets.form_url.clone(),
                    wait_until: WaitUntil::NetworkIdle,
                },
            ),
            ScriptStep::new("waitForForm", wait(FIRST_NAME_INPUT)),
            ScriptStep::new(
                "waitForFormLoad",
                wait(&format!("{}, {}", LAST_NAME_INPUT, EMAIL_INPUT)),
            ),
            ScriptStep::new("typeFirstName", type_into(FIRST_NAME_INPUT, &signup.first_name)),
            ScriptStep::new("typeLastName", type_into(LAST_NAME_INPUT, &signup.last_name)),
            ScriptStep::new("typeEmail", type_into(EMAIL_INPUT, &signup.email)),
            ScriptStep::new("waitForRadios", wait(RADIO_LABELS)).with_geometry(),
            ScriptStep::new(
                "clickRadioLabel",
                StepAction::Click {
                    selector: radio_selector(signup.is_scientist),
                },
            ),
            ScriptStep::new("waitForButton", wait(SUBMIT_BUTTON)).with_geometry(),
            ScriptStep::new(
                "clickSubmit",
                StepAction::Click {
                    selector: SUBMIT_BUTTON.to_string(),
                },
            ),
            ScriptStep::new(
                "waitAfterSubmit",
                StepAction::WaitForNavigation {
                    timeout_ms: targets.navigation_timeout_ms,
                },
            ),
            ScriptStep::new(HTML_STEP, StepAction::Html),
        ];

        Self { steps }
    }

    /// Render the script as a single BQL mutation.
    pub fn render(&self) -> String {
        let mut out = format!("mutation {} {{\n", OPERATION_NAME);
        for step in &self.steps {
            step.render_into(&mut out);
        }
        out.push_str("}\n");
        out
    }

    /// Label of the HTML capture step, if the script ends with one.
    pub fn terminal_label(&self) -> Option<&str> {
        self.steps
            .last()
            .filter(|s| s.action == StepAction::Html)
            .map(|s| s.label.as_str())
    }

    /// Label of the post-submit navigation wait.
    pub fn navigation_label(&self) -> Option<&str> {
        self.steps
            .iter()
            .find(|s| matches!(s.action, StepAction::WaitForNavigation { .. }))
            .map(|s| s.label.as_str())
    }

    /// Labels of all steps except the terminal capture, in order.
    pub fn checked_labels(&self) -> impl Iterator<Item = &str> {
        let terminal = self.terminal_label();
        self.steps
            .iter()
            .map(|s| s.label.as_str())
            .filter(move |label| Some(*label) != terminal)
    }
}

/// Label selector picking the radio option for `is_scientist`.
///
/// Option ids are generated by the form, so the label is matched on the
/// suffix of its `for` attribute.
pub fn radio_selector(is_scientist: bool) -> String {
    format!("label[for$='{}']", is_scientist)
}

/// Escape `value` for use inside a double-quoted GraphQL string literal.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
