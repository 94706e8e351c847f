use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;
use tracing::debug;

use super::buffer::SampleBuffer;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("expected mono audio, got {0} channels")]
    UnsupportedChannels(u16),

    #[error("expected 16-bit integer PCM, got {bits}-bit {format:?}")]
    UnsupportedSampleFormat { bits: u16, format: SampleFormat },

    #[error("too many samples for a WAV container: {0}")]
    TooLong(usize),
}

/// WAV spec for every container this crate writes
pub fn mono_pcm16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Read a mono 16-bit PCM WAV container from memory
///
/// Returns the samples and the sample rate the container declares.
pub fn parse(bytes: &[u8]) -> Result<(SampleBuffer, u32), ContainerError> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(ContainerError::UnsupportedChannels(spec.channels));
    }
    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        return Err(ContainerError::UnsupportedSampleFormat {
            bits: spec.bits_per_sample,
            format: spec.sample_format,
        });
    }

    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Parsed WAV container: {}Hz, {} samples",
        spec.sample_rate,
        samples.len()
    );

    Ok((SampleBuffer::new(samples), spec.sample_rate))
}

/// Write samples as a mono 16-bit PCM WAV container
///
/// The output is a canonical 44-byte header followed by the little-endian samples.
pub fn serialize(buffer: &SampleBuffer, sample_rate: u32) -> Result<Vec<u8>, ContainerError> {
    let sample_count =
        u32::try_from(buffer.len()).map_err(|_| ContainerError::TooLong(buffer.len()))?;

    let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, mono_pcm16_spec(sample_rate))?;
        let mut samples = writer.get_i16_writer(sample_count);
        for &sample in &buffer.samples {
            samples.write_sample(sample);
        }
        samples.flush()?;
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
