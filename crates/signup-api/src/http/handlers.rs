//! Signup handler.
//!
//! Validates the body, hands the normalized signup to the relay and maps the
//! outcome onto the HTTP response shapes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use signup_relay::{Signup, SignupRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// Echo of the accepted signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupEcho {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_scientist: bool,

    /// Present only when the relay ran in mock mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<bool>,
}

impl SignupEcho {
    fn new(signup: &Signup, mock: bool) -> Self {
        Self {
            email: signup.email.clone(),
            first_name: signup.first_name.clone(),
            last_name: signup.last_name.clone(),
            is_scientist: signup.is_scientist,
            mock: mock.then_some(true),
        }
    }
}

/// Successful `POST /signup` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub data: SignupEcho,
}

/// `POST /signup`
pub async fn submit_signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    state.increment_requests();
    let span = info_span!("signup", request_id = %Uuid::new_v4());

    async move {
        let Json(request) = payload.map_err(|rejection| {
            error!("Rejected signup body: {}", rejection.body_text());
            ApiError::InvalidBody(rejection.body_text())
        })?;

        let email = request.email.clone().unwrap_or_default();
        info!("Received signup request for {}", email);

        let signup = request.validate().map_err(|e| {
            info!("Signup validation failed for {}: {}", email, e);
            ApiError::from(e)
        })?;

        let outcome = state.relay.submit_form(&signup).await;
        if !outcome.success {
            error!("Signup failed for {}: {}", signup.email, outcome.message);
            return Err(ApiError::SubmissionFailed(outcome.message));
        }

        info!("Signup successful for {}", signup.email);
        Ok(Json(SignupResponse {
            success: true,
            data: SignupEcho::new(&signup, outcome.is_mock()),
            message: outcome.message,
        }))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
