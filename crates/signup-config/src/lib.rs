//! # Signup Bridge Config
//!
//! Configuration management for the signup bridge: a TOML file with `${VAR}`
//! expansion, overridden by the environment variables the hosted deployment
//! sets (`BROWSERLESS_TOKEN`, `BROWSERLESS_URL`, `KEELA_FORM_URL`, `PORT`).

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
