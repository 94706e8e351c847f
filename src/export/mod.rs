//! Export pipeline for per-sentence recordings
//!
//! Each slot is prepared independently (decode, parse, trim); unusable slots
//! are skipped with an explicit [`SkipReason`]. Three exports are built on top:
//! - individual: one WAV per sentence, zipped
//! - combined: all sentences in one WAV with silence gaps
//! - all: combined exports at every configured gap preset

mod archive;
mod exporter;
mod sink;
mod slot;

pub use archive::{build_archive, ARCHIVE_FILE_NAME};
pub use exporter::{
    combined_file_name, gap_label, ClipExporter, CombinedExport, ExportError, IndividualExport,
    DEFAULT_GAP_PRESETS,
};
pub use sink::{ArtifactSink, DirectorySink};
pub use slot::{individual_file_name, ClipSlot, SkipReason, SlotOutcome};
