//! Automation service configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token value used by local setups and CI that must never reach the
/// automation service.
pub const SENTINEL_TOKEN: &str = "test_token";

pub const DEFAULT_AUTOMATION_URL: &str = "https://production-sfo.browserless.io/chrome/bql";
pub const DEFAULT_FORM_URL: &str = "https://signup-aus.keela.co/embed/GmjpBXbNAsdcsaRco";

/// Browser automation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// BQL endpoint of the automation service.
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer credential. Absent, empty or sentinel means mock mode.
    #[serde(default)]
    pub token: Option<String>,

    /// Embedded signup form the script drives.
    #[serde(default = "default_form_url")]
    pub form_url: String,

    /// Transport timeout for the single outbound call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for each wait-for-selector step.
    #[serde(default = "default_selector_timeout")]
    pub selector_timeout_ms: u64,

    /// Timeout for the post-submit navigation wait.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_ms: u64,

    /// Query parameters appended to the automation URL (proxy and stealth flags).
    #[serde(default = "default_launch_params")]
    pub launch_params: BTreeMap<String, String>,
}

impl AutomationConfig {
    /// The configured token, if it is usable for a live submission.
    pub fn credential(&self) -> Option<&str> {
        match self.token.as_deref() {
            None | Some("") | Some(SENTINEL_TOKEN) => None,
            Some(token) => Some(token),
        }
    }

    /// Whether submissions are simulated instead of relayed.
    pub fn is_mock(&self) -> bool {
        self.credential().is_none()
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            form_url: default_form_url(),
            request_timeout_secs: default_request_timeout(),
            selector_timeout_ms: default_selector_timeout(),
            navigation_timeout_ms: default_navigation_timeout(),
            launch_params: default_launch_params(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_AUTOMATION_URL.to_string()
}

fn default_form_url() -> String {
    DEFAULT_FORM_URL.to_string()
}

fn default_request_timeout() -> u64 {
    180
}

fn default_selector_timeout() -> u64 {
    30_000
}

fn default_navigation_timeout() -> u64 {
    15_000
}

fn default_launch_params() -> BTreeMap<String, String> {
    [
        ("proxy", "residential"),
        ("proxySticky", "true"),
        ("proxyCountry", "us"),
        ("humanlike", "true"),
        ("blockConsentModals", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
