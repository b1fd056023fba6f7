//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_automation(config, &mut result);
        Self::validate_cors(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_automation(config: &Config, result: &mut ValidationResult) {
        let automation = &config.automation;

        for (path, value) in [
            ("automation.url", &automation.url),
            ("automation.form_url", &automation.form_url),
        ] {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(_) => result.add_error(ValidationError::new(
                    path,
                    "URL must start with http:// or https://",
                )),
                Err(e) => result.add_error(ValidationError::new(
                    path,
                    format!("Invalid URL '{}': {}", value, e),
                )),
            }
        }

        if automation.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "automation.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }

        if automation.selector_timeout_ms == 0 || automation.navigation_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "automation",
                "step timeouts must be greater than 0",
            ));
        }

        if automation.is_mock() {
            result.add_warning(ValidationWarning::new(
                "automation.token",
                "No usable automation token configured, submissions will be simulated",
            ));
        }

        // Step waits run inside the one outbound call.
        let step_budget_ms = automation
            .selector_timeout_ms
            .saturating_mul(4)
            .saturating_add(automation.navigation_timeout_ms);
        if automation.request_timeout_secs.saturating_mul(1000) < step_budget_ms {
            result.add_warning(ValidationWarning::new(
                "automation.request_timeout_secs",
                format!(
                    "request timeout ({}s) is shorter than the script's worst-case waits ({}ms)",
                    automation.request_timeout_secs, step_budget_ms
                ),
            ));
        }
    }

    fn validate_cors(config: &Config, result: &mut ValidationResult) {
        for origin in &config.cors.allowed_origins {
            if origin.parse::<url::Url>().is_err() {
                result.add_error(ValidationError::new(
                    "cors.allowed_origins",
                    format!("Invalid origin: {}", origin),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
