//! HTTP API for the recording front-end
//!
//! This module provides a JSON API around the export pipeline:
//! - POST /api/split - Split text into sentences
//! - POST /api/save_audio - Save one raw recording
//! - POST /api/export_individual - Zip of per-sentence WAVs
//! - POST /api/export_combined - One WAV with silence gaps
//! - POST /api/export_all - Combined WAVs at every gap preset
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::ExportRequest;
pub use routes::{create_router, create_router_with_config};
pub use state::AppState;
