//! Process-wide application instance.
//!
//! Serverless hosts call [`app`] per invocation; the router is built once
//! from the environment and reused. Concurrent first calls wait on a single
//! initialization.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::sync::OnceCell;
use tracing::info;

use signup_config::{Config, ConfigLoader};
use signup_relay::FormRelay;

use crate::error::InitError;
use crate::http::routes::create_router;
use crate::state::AppState;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SIGNUP_BRIDGE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/bridge.toml";

static APP: SharedApp = SharedApp::new();

/// Lazily built router, initialized at most once.
pub struct SharedApp {
    cell: OnceCell<Router>,
}

impl SharedApp {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Return the router, running `init` if none has been built yet.
    ///
    /// A failed `init` leaves the instance empty so a later call can retry.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<Router, InitError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Router, InitError>>,
    {
        self.cell.get_or_try_init(init).await.cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl Default for SharedApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared router configured from the file named by [`CONFIG_PATH_ENV`] and
/// the process environment.
pub async fn app() -> Result<Router, InitError> {
    APP.get_or_try_init(|| async {
        let config = ConfigLoader::load_with_env(&config_path())?;
        build_router(&config)
    })
    .await
}

/// Shared router, built from `config` when this is the first call.
pub async fn app_with(config: &Config) -> Result<Router, InitError> {
    APP.get_or_try_init(|| async { build_router(config) }).await
}

/// Build a fresh router for `config`.
pub fn build_router(config: &Config) -> Result<Router, InitError> {
    let relay = FormRelay::new(config.automation.clone())?;
    info!(mode = ?relay.mode(), "Signup relay ready");
    let state = Arc::new(AppState::new(Arc::new(relay)));
    Ok(create_router(state, &config.cors))
}

fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
