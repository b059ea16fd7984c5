use std::sync::Arc;

use crate::analysis::analyzer::AnalysisSettings;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: concurrent analyses share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// The model provider. Default: `GeminiClient`; tests swap in stubs.
    pub llm: Arc<dyn GenerativeModel>,
    pub settings: AnalysisSettings,
}
