use std::sync::Arc;

use crate::analysis::AnalysisEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the model client and both store seams. Stateless between requests.
    pub engine: Arc<AnalysisEngine>,
}
