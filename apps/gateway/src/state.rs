use std::sync::Arc;

use crate::gateway::ResumeGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ResumeGateway>,
}
