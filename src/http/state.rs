use crate::export::ClipExporter;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Export pipeline (stateless between requests)
    pub exporter: Arc<ClipExporter>,
}

impl AppState {
    pub fn new(exporter: ClipExporter) -> Self {
        Self {
            exporter: Arc::new(exporter),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ClipExporter::default())
    }
}
