//! Configuration loader.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

/// Environment variables recognized as overrides, in application order.
pub const ENV_OVERRIDES: &[&str] = &[
    "HOST",
    "PORT",
    "BROWSERLESS_URL",
    "BROWSERLESS_TOKEN",
    "KEELA_FORM_URL",
];

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load a file if it exists, otherwise start from defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load the file (or defaults) and apply process environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Config, ConfigError> {
        let mut config = Self::load_or_default(path)?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides from `lookup` on top of `config`.
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ENV_OVERRIDES {
            let Some(value) = lookup(key) else {
                continue;
            };
            match *key {
                "HOST" => config.server.host = value,
                "PORT" => {
                    config.server.port =
                        value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                            field: "PORT".to_string(),
                            message: format!("'{}' is not a valid port number", value),
                        })?;
                }
                "BROWSERLESS_URL" => config.automation.url = value,
                "BROWSERLESS_TOKEN" => config.automation.token = Some(value),
                "KEELA_FORM_URL" => config.automation.form_url = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in ENV_REF.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.signup-bridge`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.automation.is_mock());
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [server]
            host = "0.0.0.0"
            port = 8088

            [automation]
            token = "live-token"
            form_url = "https://forms.example.com/embed/abc"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.automation.credential(), Some("live-token"));
        assert_eq!(config.automation.form_url, "https://forms.example.com/embed/abc");
    }

    #[test]
    fn test_load_launch_params_replace_defaults() {
        let content = r#"
            [automation.launch_params]
            proxy = "datacenter"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.automation.launch_params.len(), 1);
        assert_eq!(config.automation.launch_params["proxy"], "datacenter");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "port = 5000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/bridge.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/bridge.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_env_overrides_applied() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("PORT", "4100"),
            ("BROWSERLESS_TOKEN", "secret"),
            ("BROWSERLESS_URL", "https://automation.example.com/bql"),
            ("KEELA_FORM_URL", "https://forms.example.com/embed/x"),
        ]);
        ConfigLoader::apply_env_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.automation.credential(), Some("secret"));
        assert_eq!(config.automation.url, "https://automation.example.com/bql");
        assert_eq!(config.automation.form_url, "https://forms.example.com/embed/x");
    }

    #[test]
    fn test_env_overrides_absent_keep_file_values() {
        let mut config = ConfigLoader::load_str("[automation]\ntoken = \"from-file\"").unwrap();
        ConfigLoader::apply_env_overrides(&mut config, lookup_from(&[])).unwrap();
        assert_eq!(config.automation.credential(), Some("from-file"));
    }

    #[test]
    fn test_env_override_sentinel_token_is_mock() {
        let mut config = Config::default();
        ConfigLoader::apply_env_overrides(&mut config, lookup_from(&[("BROWSERLESS_TOKEN", "test_token")]))
            .unwrap();
        assert!(config.automation.is_mock());
    }

    #[test]
    fn test_env_override_invalid_port() {
        let mut config = Config::default();
        let result = ConfigLoader::apply_env_overrides(&mut config, lookup_from(&[("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_SIGNUP_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/var/log/signup-bridge";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/logs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/logs"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config =
            ConfigLoader::load_str(include_str!("../../../config/bridge.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.automation.is_mock());
        assert_eq!(config.automation.launch_params.len(), 5);
    }
}
