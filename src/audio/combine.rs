// Clip combiner for building one continuous recording from per-sentence clips
//
// Every clip is followed by the same silence gap, including the last one, so
// the output length is sum(clip lengths) + clips * gap.

use tracing::debug;

use super::buffer::SampleBuffer;

/// Concatenate `clips` in order, appending `gap_seconds` of silence after each
pub fn combine(clips: &[SampleBuffer], gap_seconds: f64, sample_rate: u32) -> SampleBuffer {
    let silence = SampleBuffer::silence(gap_seconds, sample_rate);

    let total = clips.iter().map(|c| c.len() + silence.len()).sum();
    let mut combined = Vec::with_capacity(total);

    for clip in clips {
        combined.extend_from_slice(&clip.samples);
        combined.extend_from_slice(&silence.samples);
    }

    debug!(
        "Combined {} clips with {:.2}s gaps: {} samples total",
        clips.len(),
        gap_seconds,
        combined.len()
    );

    SampleBuffer::new(combined)
}
