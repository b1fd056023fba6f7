//! One-shot commands: `submit` and `check-config`.

use signup_config::{Config, ConfigValidator};
use signup_relay::{FormRelay, SignupRequest, SubmissionOutcome};

/// Relay a single signup and print the outcome. Returns whether it succeeded.
pub(crate) async fn handle_submit(
    config: Config,
    request: SignupRequest,
) -> Result<bool, Box<dyn std::error::Error>> {
    let outcome = match request.validate() {
        Ok(signup) => {
            let relay = FormRelay::new(config.automation)?;
            relay.submit_form(&signup).await
        }
        Err(e) => SubmissionOutcome::failed(e.to_string(), None),
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome.success)
}

/// Print validation errors and warnings. Returns whether the config is valid.
pub(crate) fn handle_check_config(config: &Config) -> Result<bool, Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config)?;

    for err in &result.errors {
        println!("error: {}: {}", err.path, err.message);
    }
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }

    let mode = if config.automation.is_mock() { "mock" } else { "live" };
    if result.is_valid() {
        println!(
            "Configuration OK ({} mode, listening on {}:{})",
            mode, config.server.host, config.server.port
        );
    }
    Ok(result.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str) -> SignupRequest {
        SignupRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some(email.to_string()),
            is_scientist: Some(true),
        }
    }

    #[tokio::test]
    async fn test_submit_mock_succeeds() {
        let ok = handle_submit(Config::default(), request("ada@example.com"))
            .await
            .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_submit_invalid_email_fails() {
        let ok = handle_submit(Config::default(), request("nope"))
            .await
            .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_check_default_config() {
        assert!(handle_check_config(&Config::default()).unwrap());
    }

    #[test]
    fn test_check_config_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(!handle_check_config(&config).unwrap());
    }
}
