//! Outbound transport to the browser automation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

use signup_config::AutomationConfig;

use crate::error::RelayError;
use crate::response::AutomationResponse;
use crate::script::AutomationScript;

/// Characters of a non-JSON body written to the error log.
const BODY_LOG_CHARS: usize = 500;

/// Executes a whole script in one round trip.
#[async_trait]
pub trait AutomationTransport: Send + Sync {
    async fn execute(
        &self,
        script: &AutomationScript,
        credential: &str,
    ) -> Result<AutomationResponse, RelayError>;
}

#[derive(Debug, Serialize)]
struct BqlRequest {
    query: String,
}

/// Transport for a Browserless-compatible BQL endpoint.
pub struct BrowserlessTransport {
    client: Client,
    endpoint: Url,
}

impl BrowserlessTransport {
    pub fn new(config: &AutomationConfig) -> Result<Self, RelayError> {
        let mut endpoint = Url::parse(&config.url)
            .map_err(|e| RelayError::Config(format!("automation URL '{}': {}", config.url, e)))?;
        if !config.launch_params.is_empty() {
            endpoint
                .query_pairs_mut()
                .extend_pairs(config.launch_params.iter());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("signup-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint with launch parameters applied.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AutomationTransport for BrowserlessTransport {
    async fn execute(
        &self,
        script: &AutomationScript,
        credential: &str,
    ) -> Result<AutomationResponse, RelayError> {
        info!("Sending request to automation API: {}", self.endpoint);
        debug!(steps = script.steps.len(), "Rendering automation script");

        let body = BqlRequest {
            query: script.render(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        info!(status, content_type = ?content_type, "Automation API responded");

        let is_json = content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(BODY_LOG_CHARS).collect();
            error!("Non-JSON response received: {}...", excerpt);
            error!("This usually means the automation URL is wrong or authentication failed");
            return Err(RelayError::NonJsonResponse {
                status,
                content_type,
            });
        }

        response
            .json::<AutomationResponse>()
            .await
            .map_err(|e| RelayError::Transport(format!("malformed response body: {}", e)))
    }
}
