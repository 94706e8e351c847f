/// Sample rate used for all internal processing (16kHz mono)
pub const PROCESSING_SAMPLE_RATE: u32 = 16000;

/// Mono 16-bit PCM samples
///
/// The buffer does not carry its sample rate: every stage of the export
/// pipeline runs at one processing rate, which is passed alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleBuffer {
    /// Raw audio samples (i16 PCM, mono)
    pub samples: Vec<i16>,
}

impl SampleBuffer {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Buffer of `round(duration_secs * sample_rate)` zero samples
    ///
    /// Negative or non-finite durations produce an empty buffer.
    pub fn silence(duration_secs: f64, sample_rate: u32) -> Self {
        let len = seconds_to_samples(duration_secs, sample_rate);
        Self {
            samples: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        self.samples.len() as f64 / sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl From<Vec<i16>> for SampleBuffer {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}

/// Convert a time offset to a sample index, rounding to the nearest sample
pub(crate) fn seconds_to_samples(secs: f64, sample_rate: u32) -> usize {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    // `as` saturates for values past usize::MAX
    (secs * sample_rate as f64).round() as usize
}
