use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::archive::build_archive;
use super::sink::ArtifactSink;
use super::slot::{individual_file_name, ClipSlot};
use crate::audio::buffer::seconds_to_samples;
use crate::audio::{combine, payload, wav, ContainerError, PayloadError, SampleBuffer, PROCESSING_SAMPLE_RATE};

/// Gap presets for the batch export, in output order
pub const DEFAULT_GAP_PRESETS: [f64; 4] = [1.0, 0.8, 0.5, 0.0];

/// Most 16-bit samples a WAV data chunk can hold (RIFF sizes are 32-bit)
pub const MAX_WAV_SAMPLES: usize = ((u32::MAX - 36) / 2) as usize;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No audio data")]
    NoAudio,

    #[error("Invalid audio data")]
    InvalidAudio(#[source] PayloadError),

    #[error("No valid WAV audio found. Please re-record and try again.")]
    NoValidAudio,

    #[error("Invalid gap value: {0}")]
    InvalidGap(f64),

    #[error("Combined audio too long with {gap_seconds}s gaps (limit {limit} samples)")]
    TooLong { gap_seconds: f64, limit: usize },

    #[error("Saving files is disabled on this server")]
    PersistenceDisabled,

    #[error("Failed to encode WAV: {0}")]
    Container(#[from] ContainerError),

    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to save recording: {0:#}")]
    Persist(anyhow::Error),
}

impl ExportError {
    /// Whether the caller sent something unusable, as opposed to a server fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExportError::NoAudio
                | ExportError::InvalidAudio(_)
                | ExportError::NoValidAudio
                | ExportError::InvalidGap(_)
                | ExportError::TooLong { .. }
        )
    }
}

/// A combined export: one WAV container and its canonical filename
#[derive(Debug, Clone)]
pub struct CombinedExport {
    pub file_name: String,
    pub gap_seconds: f64,
    pub clip_count: usize,
    pub wav: Vec<u8>,
}

/// An individual export: zip archive of one WAV per usable slot
#[derive(Debug, Clone)]
pub struct IndividualExport {
    pub file_names: Vec<String>,
    pub zip: Vec<u8>,
}

/// Turns per-sentence recordings into downloadable files
///
/// Holds no per-request state; one instance is shared by all handlers.
pub struct ClipExporter {
    sample_rate: u32,
    gap_presets: Vec<f64>,
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl Default for ClipExporter {
    fn default() -> Self {
        Self::new(PROCESSING_SAMPLE_RATE)
    }
}

impl ClipExporter {
    /// Exporter with the default gap presets and no persistence
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            gap_presets: DEFAULT_GAP_PRESETS.to_vec(),
            sink: None,
        }
    }

    pub fn with_gap_presets(mut self, gap_presets: Vec<f64>) -> Self {
        self.gap_presets = gap_presets;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn gap_presets(&self) -> &[f64] {
        &self.gap_presets
    }

    /// Decode one recording and persist it as `sentences_voice_{index+1}.wav`
    ///
    /// Bytes are stored exactly as decoded. Returns the filename. Fails with
    /// `PersistenceDisabled` when no sink is configured.
    pub fn save_recording(&self, audio: &str, index: usize) -> Result<String, ExportError> {
        if audio.is_empty() {
            return Err(ExportError::NoAudio);
        }
        let bytes = payload::decode(audio).map_err(ExportError::InvalidAudio)?;
        let sink = self.sink.as_ref().ok_or(ExportError::PersistenceDisabled)?;

        let file_name = individual_file_name(index + 1);
        sink.persist(&file_name, &bytes)
            .map_err(ExportError::Persist)?;

        info!("Saved recording {} ({} bytes)", file_name, bytes.len());
        Ok(file_name)
    }

    /// Zip every usable slot as `sentences_voice_{position}.wav`
    pub fn export_individual(&self, slots: &[ClipSlot]) -> Result<IndividualExport, ExportError> {
        if slots.is_empty() {
            return Err(ExportError::NoAudio);
        }

        let files: Vec<(String, Vec<u8>)> = slots
            .iter()
            .filter_map(|slot| {
                slot.prepare_file(self.sample_rate)
                    .ready()
                    .map(|bytes| (slot.file_name(), bytes))
            })
            .collect();

        let zip = build_archive(
            files
                .iter()
                .map(|(name, bytes)| (name.clone(), bytes.as_slice())),
        )?;

        let file_names: Vec<String> = files.into_iter().map(|(name, _)| name).collect();
        info!(
            "Individual export: {} of {} slots archived ({} bytes)",
            file_names.len(),
            slots.len(),
            zip.len()
        );

        Ok(IndividualExport { file_names, zip })
    }

    /// Concatenate every usable slot with `gap_seconds` of silence after each
    ///
    /// The result is also handed to the sink, if any; a sink failure is logged
    /// and does not fail the export.
    pub fn export_combined(
        &self,
        slots: &[ClipSlot],
        gap_seconds: f64,
    ) -> Result<CombinedExport, ExportError> {
        if slots.is_empty() {
            return Err(ExportError::NoAudio);
        }
        let export = self.render_combined(slots, gap_seconds)?;

        if let Err(e) = self.persist(&export) {
            warn!("Could not persist {}: {:#}", export.file_name, e);
        }

        Ok(export)
    }

    /// Combined export at every gap preset
    ///
    /// The files only exist in the sink, so a sink is required. A gap that
    /// yields no usable clips (or would overflow the container) is left out.
    /// Returns the filenames written, in preset order.
    pub fn export_all(&self, slots: &[ClipSlot]) -> Result<Vec<String>, ExportError> {
        if slots.is_empty() {
            return Err(ExportError::NoAudio);
        }
        let sink = self.sink.as_ref().ok_or(ExportError::PersistenceDisabled)?;

        let mut files = Vec::with_capacity(self.gap_presets.len());
        for &gap in &self.gap_presets {
            let export = match self.render_combined(slots, gap) {
                Ok(export) => export,
                Err(e @ (ExportError::NoValidAudio | ExportError::TooLong { .. })) => {
                    warn!("Skipping gap {}s: {}", gap, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            match sink.persist(&export.file_name, &export.wav) {
                Ok(()) => files.push(export.file_name),
                Err(e) => warn!("Could not persist {}: {:#}", export.file_name, e),
            }
        }

        info!(
            "Batch export complete: {} of {} files",
            files.len(),
            self.gap_presets.len()
        );

        Ok(files)
    }

    fn render_combined(
        &self,
        slots: &[ClipSlot],
        gap_seconds: f64,
    ) -> Result<CombinedExport, ExportError> {
        if !gap_seconds.is_finite() || gap_seconds < 0.0 {
            return Err(ExportError::InvalidGap(gap_seconds));
        }

        let clips: Vec<_> = slots
            .iter()
            .filter_map(|slot| slot.prepare_samples(self.sample_rate).ready())
            .collect();

        if clips.is_empty() {
            return Err(ExportError::NoValidAudio);
        }
        if combined_len(&clips, gap_seconds, self.sample_rate).is_none() {
            return Err(ExportError::TooLong {
                gap_seconds,
                limit: MAX_WAV_SAMPLES,
            });
        }

        let combined = combine(&clips, gap_seconds, self.sample_rate);
        let wav = wav::serialize(&combined, self.sample_rate)?;

        info!(
            "Combined {} of {} slots with {}s gaps: {:.1}s",
            clips.len(),
            slots.len(),
            gap_seconds,
            combined.duration_seconds(self.sample_rate)
        );

        Ok(CombinedExport {
            file_name: combined_file_name(gap_seconds),
            gap_seconds,
            clip_count: clips.len(),
            wav,
        })
    }

    fn persist(&self, export: &CombinedExport) -> anyhow::Result<()> {
        match &self.sink {
            Some(sink) => sink.persist(&export.file_name, &export.wav),
            None => Ok(()),
        }
    }
}

/// Sample count of `combine(clips, gap_seconds, ..)`, or `None` past `MAX_WAV_SAMPLES`
fn combined_len(clips: &[SampleBuffer], gap_seconds: f64, sample_rate: u32) -> Option<usize> {
    let silence = seconds_to_samples(gap_seconds, sample_rate);
    let gaps = silence.checked_mul(clips.len())?;
    let total = clips
        .iter()
        .try_fold(gaps, |total, clip| total.checked_add(clip.len()))?;
    (total <= MAX_WAV_SAMPLES).then_some(total)
}

/// Gap rendered without its decimal point: 1.0 -> "1", 0.8 -> "08", 0 -> "0"
pub fn gap_label(gap_seconds: f64) -> String {
    if gap_seconds == 0.0 {
        return "0".to_string();
    }
    gap_seconds.to_string().replace('.', "")
}

/// Filename for a combined export at the given gap
pub fn combined_file_name(gap_seconds: f64) -> String {
    format!("sentences_all_{}.wav", gap_label(gap_seconds))
}
