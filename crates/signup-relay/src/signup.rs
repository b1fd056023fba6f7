//! Inbound signup data and its validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest first or last name the hosted form accepts.
pub const MAX_NAME_LEN: usize = 50;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Signup payload as received over HTTP.
///
/// Every field is optional here so that absent fields surface as a
/// [`ValidationError`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub is_scientist: Option<bool>,
}

impl SignupRequest {
    /// Check required fields and the email shape, producing the normalized
    /// signup handed to the relay.
    ///
    /// Presence is checked on the raw value: a whitespace-only name counts as
    /// present.
    pub fn validate(&self) -> Result<Signup, ValidationError> {
        let first_name = non_empty(&self.first_name);
        let last_name = non_empty(&self.last_name);
        let email = non_empty(&self.email);

        let (Some(first_name), Some(last_name), Some(email)) = (first_name, last_name, email) else {
            let missing = [
                ("firstName", first_name.is_none()),
                ("lastName", last_name.is_none()),
                ("email", email.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
            return Err(ValidationError::MissingFields(missing));
        };

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        for (field, value) in [("firstName", first_name), ("lastName", last_name)] {
            if value.chars().count() > MAX_NAME_LEN {
                return Err(ValidationError::TooLong {
                    field,
                    max: MAX_NAME_LEN,
                });
            }
        }

        Ok(Signup {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            is_scientist: self.is_scientist.unwrap_or(false),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Whether `email` matches the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// A validated signup, ready to relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_scientist: bool,
}
