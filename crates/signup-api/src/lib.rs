//! # Signup Bridge API
//!
//! HTTP layer of the signup bridge.
//!
//! ```text
//! POST /signup ──▶ SignupRequest::validate ──▶ FormRelay::submit_form
//!                        │ 400                      │
//!                        ▼                          ▼
//!                   ErrorResponse        200 SignupResponse / 500 ErrorResponse
//! ```
//!
//! [`app`] returns a process-wide router for serverless hosts; [`ApiServer`]
//! binds it to a socket for standalone use.

pub mod error;
pub mod http;
pub mod instance;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorResponse, InitError};
pub use http::{
    handlers::{SignupEcho, SignupResponse},
    routes::create_router,
};
pub use instance::{app, build_router, SharedApp};
pub use server::ApiServer;
pub use state::AppState;
