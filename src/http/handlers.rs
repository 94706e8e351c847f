use super::state::AppState;
use crate::audio::trim::lenient_seconds;
use crate::export::{ClipSlot, ExportError, ARCHIVE_FILE_NAME};
use crate::text::split_sentences;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub sentences: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveAudioRequest {
    /// Transport-encoded recording
    #[serde(default)]
    pub audio: Value,

    /// 0-based sentence index (default: 0)
    #[serde(default)]
    pub index: Value,
}

impl SaveAudioRequest {
    /// Requested index; `Err` carries the raw value unless it is a non-negative integer
    pub fn index(&self) -> Result<usize, String> {
        match &self.index {
            Value::Null => Ok(0),
            value => value
                .as_u64()
                .and_then(|index| usize::try_from(index).ok())
                .filter(|&index| index < usize::MAX)
                .ok_or_else(|| value.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveAudioResponse {
    pub success: bool,
    pub filename: String,
}

/// Body shared by the export endpoints
///
/// Entries stay loosely typed here: a bad entry only skips its own slot.
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub audios: Value,

    #[serde(default)]
    pub trims: Value,

    /// Gap in seconds for the combined export (default: 1.0)
    #[serde(default)]
    pub gap: Option<Value>,
}

impl ExportRequest {
    /// Slots in sentence order; a non-array `audios` or `trims` counts as empty
    pub fn slots(&self) -> Vec<ClipSlot> {
        ClipSlot::from_json(as_slice(&self.audios), as_slice(&self.trims))
    }

    /// Requested gap; `Err` carries the raw value when it is not a usable number
    pub fn gap_seconds(&self) -> Result<f64, String> {
        match &self.gap {
            None | Some(Value::Null) => Ok(1.0),
            Some(value) => lenient_seconds(value).ok_or_else(|| value.to_string()),
        }
    }
}

fn as_slice(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct ExportAllResponse {
    pub success: bool,
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

fn export_error_response(e: ExportError) -> Response {
    if matches!(e, ExportError::PersistenceDisabled) {
        warn!("Rejected request: {}", e);
        error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    } else if e.is_client_error() {
        warn!("Rejected export request: {}", e);
        error_response(StatusCode::BAD_REQUEST, e.to_string())
    } else {
        error!("Export failed: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

fn attachment(content_type: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/split
/// Split pasted text into sentences
pub async fn split_text(Json(req): Json<SplitRequest>) -> impl IntoResponse {
    let sentences = split_sentences(&req.text);
    info!("Split text into {} sentences", sentences.len());

    Json(SplitResponse { sentences })
}

/// POST /api/save_audio
/// Persist one raw recording as sentences_voice_{index+1}.wav
pub async fn save_audio(
    State(state): State<AppState>,
    Json(req): Json<SaveAudioRequest>,
) -> Response {
    let index = match req.index() {
        Ok(index) => index,
        Err(raw) => {
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid index: {}", raw))
        }
    };
    let audio = req.audio.as_str().unwrap_or_default();

    match state.exporter.save_recording(audio, index) {
        Ok(filename) => (
            StatusCode::OK,
            Json(SaveAudioResponse {
                success: true,
                filename,
            }),
        )
            .into_response(),
        Err(e) => export_error_response(e),
    }
}

/// POST /api/export_individual
/// Zip archive with one WAV per recorded sentence
pub async fn export_individual(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let slots = req.slots();

    match state.exporter.export_individual(&slots) {
        Ok(export) => attachment("application/zip", ARCHIVE_FILE_NAME, export.zip),
        Err(e) => export_error_response(e),
    }
}

/// POST /api/export_combined
/// One WAV with every recorded sentence and silence gaps
pub async fn export_combined(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let slots = req.slots();
    if slots.is_empty() {
        return export_error_response(ExportError::NoAudio);
    }

    let gap = match req.gap_seconds() {
        Ok(gap) => gap,
        Err(raw) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid gap value: {}", raw),
            )
        }
    };

    match state.exporter.export_combined(&slots, gap) {
        Ok(export) => attachment("audio/wav", &export.file_name, export.wav),
        Err(e) => export_error_response(e),
    }
}

/// POST /api/export_all
/// Combined exports at every gap preset, saved server-side
pub async fn export_all(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Response {
    let slots = req.slots();

    match state.exporter.export_all(&slots) {
        Ok(files) => (
            StatusCode::OK,
            Json(ExportAllResponse {
                success: true,
                files,
            }),
        )
            .into_response(),
        Err(e) => export_error_response(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> ExportRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_gap_defaults_to_one_second() {
        assert_eq!(request(json!({"audios": []})).gap_seconds(), Ok(1.0));
        assert_eq!(request(json!({"gap": null})).gap_seconds(), Ok(1.0));
    }

    #[test]
    fn test_gap_accepts_numeric_strings() {
        assert_eq!(request(json!({"gap": "0.5"})).gap_seconds(), Ok(0.5));
        assert_eq!(request(json!({"gap": 0})).gap_seconds(), Ok(0.0));
    }

    #[test]
    fn test_gap_rejects_garbage() {
        assert!(request(json!({"gap": "soon"})).gap_seconds().is_err());
        assert!(request(json!({"gap": [1]})).gap_seconds().is_err());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        assert!(request(json!({})).slots().is_empty());
        assert!(request(json!({"audios": null, "trims": 3})).slots().is_empty());
    }

    #[test]
    fn test_index_must_be_non_negative_integer() {
        let save = |body: Value| serde_json::from_value::<SaveAudioRequest>(body).unwrap();

        assert_eq!(save(json!({})).index(), Ok(0));
        assert_eq!(save(json!({"index": 4})).index(), Ok(4));
        assert_eq!(save(json!({"index": -1})).index(), Err("-1".to_string()));
        assert_eq!(save(json!({"index": 1.5})).index(), Err("1.5".to_string()));
        assert!(save(json!({"index": "2"})).index().is_err());
    }

    #[test]
    fn test_trims_pair_with_audios() {
        let req = request(json!({"audios": ["a", "b"], "trims": {"start": 1}}));
        let slots = req.slots();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.trim.is_none()));
    }
}
