pub mod buffer;
pub mod combine;
pub mod payload;
pub mod trim;
pub mod wav;

pub use buffer::{SampleBuffer, PROCESSING_SAMPLE_RATE};
pub use combine::combine;
pub use payload::PayloadError;
pub use trim::{trim, TrimWindow};
pub use wav::ContainerError;
