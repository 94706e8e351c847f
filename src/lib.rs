pub mod audio;
pub mod config;
pub mod export;
pub mod http;
pub mod text;

pub use audio::{combine, trim, ContainerError, PayloadError, SampleBuffer, TrimWindow};
pub use config::Config;
pub use export::{
    ArtifactSink, ClipExporter, ClipSlot, CombinedExport, DirectorySink, ExportError,
    IndividualExport, SkipReason, SlotOutcome,
};
pub use http::{create_router, create_router_with_config, AppState};
pub use text::split_sentences;
