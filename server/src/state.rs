//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the remote API behind the `SellerBackend` trait and the gateway
//! configuration. There is no other shared state: every request is a
//! pass-through to the backend keyed by the caller's cookies.

use std::sync::Arc;

use api::SellerBackend;

use crate::config::ServerConfig;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn SellerBackend>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(backend: Arc<dyn SellerBackend>, config: ServerConfig) -> Self {
        Self { backend, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
