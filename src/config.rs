use anyhow::{ensure, Result};
use serde::Deserialize;

use crate::audio::PROCESSING_SAMPLE_RATE;
use crate::export::DEFAULT_GAP_PRESETS;

/// Prefix for environment overrides, e.g. `SENTENCE_VOICE__SERVICE__HTTP__PORT=8080`
pub const ENV_PREFIX: &str = "SENTENCE_VOICE";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "sentence-voice".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Largest accepted request body; export bodies carry every recording as base64
    pub max_body_bytes: usize,
    /// Front-end directory served at `/` (optional)
    pub static_dir: Option<String>,
    /// Allow cross-origin requests
    pub cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            max_body_bytes: 64 * 1024 * 1024,
            static_dir: None,
            cors: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: PROCESSING_SAMPLE_RATE,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for saved recordings and combined exports
    pub output_dir: String,
    /// Keep a copy of exports in `output_dir`
    pub persist: bool,
    /// Gap durations (seconds) for the batch export
    pub gap_presets: Vec<f64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: "recordings".to_string(),
            persist: true,
            gap_presets: DEFAULT_GAP_PRESETS.to_vec(),
        }
    }
}

impl Config {
    /// Load `path` (any format the `config` crate understands, extension optional)
    /// and apply environment overrides. A missing file means defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.audio.sample_rate > 0, "audio.sample_rate must be positive");
        ensure!(
            self.export
                .gap_presets
                .iter()
                .all(|g| g.is_finite() && *g >= 0.0),
            "export.gap_presets must be non-negative numbers, got {:?}",
            self.export.gap_presets
        );
        Ok(())
    }
}
