//! Shared application state for the UI server.

use std::sync::Arc;

use intake::context::IntakeContext;

/// Shared state accessible from all request handlers.
///
/// The server hosts exactly one form session; every request acts on it.
#[derive(Clone)]
pub struct AppState {
    /// Gate, wizard and submission handler for the single session.
    pub ctx: Arc<IntakeContext>,
    /// OAuth client identifier the browser hands to the identity provider.
    pub client_id: String,
}

impl AppState {
    pub fn new(ctx: IntakeContext, client_id: String) -> Self {
        Self {
            ctx: Arc::new(ctx),
            client_id,
        }
    }
}
