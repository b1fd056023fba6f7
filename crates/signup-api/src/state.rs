//! Application state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use signup_relay::{FormRelay, RelayMode};

/// Application state shared across handlers.
pub struct AppState {
    pub relay: Arc<FormRelay>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(relay: Arc<FormRelay>) -> Self {
        Self {
            relay,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get signup request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Increment signup request count.
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn mode(&self) -> RelayMode {
        self.relay.mode()
    }
}
