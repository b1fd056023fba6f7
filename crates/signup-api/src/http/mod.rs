//! HTTP interface module.
//!
//! - `POST /signup` relays a signup to the hosted form
//! - `GET /health` and `GET /livez` for monitoring

pub mod handlers;
pub mod routes;

pub(crate) mod monitoring;
