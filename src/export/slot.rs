use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::audio::{payload, trim, wav, ContainerError, PayloadError, SampleBuffer, TrimWindow};

/// One recording slot, per sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipSlot {
    /// 1-based sentence position
    pub position: usize,
    /// Transport-encoded recording, if the user recorded this sentence
    pub payload: Option<String>,
    /// Trim points chosen in the browser
    pub trim: Option<TrimWindow>,
}

impl ClipSlot {
    /// Pair loosely-typed `audios` and `trims` arrays into slots
    ///
    /// Non-string audio entries become empty slots and non-object trim entries
    /// become "no trim". `trims` may be shorter than `audios`.
    pub fn from_json(audios: &[Value], trims: &[Value]) -> Vec<ClipSlot> {
        audios
            .iter()
            .enumerate()
            .map(|(i, audio)| ClipSlot {
                position: i + 1,
                payload: audio.as_str().map(String::from),
                trim: trims.get(i).and_then(TrimWindow::from_json),
            })
            .collect()
    }

    /// Filename for this slot's individual export
    pub fn file_name(&self) -> String {
        individual_file_name(self.position)
    }

    fn decoded(&self) -> Result<Vec<u8>, SkipReason> {
        let payload = match self.payload.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return Err(SkipReason::NoRecording),
        };
        payload::decode(payload).map_err(SkipReason::Payload)
    }

    fn samples(&self, bytes: &[u8], sample_rate: u32) -> Result<SampleBuffer, SkipReason> {
        let (buffer, declared_rate) = wav::parse(bytes).map_err(SkipReason::Container)?;
        if declared_rate != sample_rate {
            warn!(
                "Slot {} declares {}Hz, treating samples as {}Hz",
                self.position, declared_rate, sample_rate
            );
        }

        let trimmed = trim(buffer, self.trim.as_ref(), sample_rate);
        if trimmed.is_empty() {
            return Err(SkipReason::EmptyClip);
        }
        Ok(trimmed)
    }

    /// Prepare this slot for the individual (per-clip) export
    ///
    /// Untrimmed recordings pass through byte-for-byte; trimmed ones are
    /// re-encoded as mono 16-bit PCM at `sample_rate`.
    pub fn prepare_file(&self, sample_rate: u32) -> SlotOutcome<Vec<u8>> {
        let result = self.decoded().and_then(|bytes| {
            if self.trim.is_none() {
                return Ok(bytes);
            }
            let clip = self.samples(&bytes, sample_rate)?;
            wav::serialize(&clip, sample_rate).map_err(SkipReason::Container)
        });
        self.outcome(result)
    }

    /// Prepare this slot for a combined export: decoded, parsed and trimmed samples
    pub fn prepare_samples(&self, sample_rate: u32) -> SlotOutcome<SampleBuffer> {
        let result = self
            .decoded()
            .and_then(|bytes| self.samples(&bytes, sample_rate));
        self.outcome(result)
    }

    fn outcome<T>(&self, result: Result<T, SkipReason>) -> SlotOutcome<T> {
        match result {
            Ok(item) => SlotOutcome::Ready(item),
            Err(reason) => {
                debug!("Skipping slot {}: {}", self.position, reason);
                SlotOutcome::Skipped(reason)
            }
        }
    }
}

/// Filename for an individually exported or saved clip
pub fn individual_file_name(position: usize) -> String {
    format!("sentences_voice_{}.wav", position)
}

/// Result of preparing one slot
#[derive(Debug)]
pub enum SlotOutcome<T> {
    Ready(T),
    Skipped(SkipReason),
}

impl<T> SlotOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            SlotOutcome::Ready(item) => Some(item),
            SlotOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            SlotOutcome::Ready(_) => None,
            SlotOutcome::Skipped(reason) => Some(reason),
        }
    }
}

/// Why a slot contributed nothing to an export
#[derive(Debug)]
pub enum SkipReason {
    /// No payload, or an empty one
    NoRecording,
    /// Payload was not valid transport encoding
    Payload(PayloadError),
    /// Bytes were not a mono 16-bit PCM WAV
    Container(ContainerError),
    /// Nothing left after trimming
    EmptyClip,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoRecording => write!(f, "no recording"),
            SkipReason::Payload(e) => write!(f, "undecodable payload ({})", e),
            SkipReason::Container(e) => write!(f, "unreadable container ({})", e),
            SkipReason::EmptyClip => write!(f, "clip is empty after trimming"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RATE: u32 = 16000;

    fn wav_payload(samples: Vec<i16>) -> String {
        let bytes = wav::serialize(&SampleBuffer::new(samples), RATE).unwrap();
        payload::encode_data_url(&bytes)
    }

    fn slot(payload: Option<String>, trim: Option<TrimWindow>) -> ClipSlot {
        ClipSlot {
            position: 1,
            payload,
            trim,
        }
    }

    #[test]
    fn test_from_json_pairs_audios_and_trims() {
        let audios = vec![json!("abc"), json!(null), json!(42), json!("")];
        let trims = vec![json!({"start": 0.5}), json!("bogus")];

        let slots = ClipSlot::from_json(&audios, &trims);

        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].position, 1);
        assert_eq!(slots[0].payload.as_deref(), Some("abc"));
        assert_eq!(slots[0].trim.unwrap().start, Some(0.5));
        assert_eq!(slots[1].payload, None);
        assert_eq!(slots[1].trim, None);
        assert_eq!(slots[2].payload, None);
        assert_eq!(slots[3].payload.as_deref(), Some(""));
        assert_eq!(slots[3].position, 4);
        assert_eq!(slots[3].file_name(), "sentences_voice_4.wav");
    }

    #[test]
    fn test_empty_payload_is_skipped() {
        let outcome = slot(Some(String::new()), None).prepare_samples(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::NoRecording)));

        let outcome = slot(None, None).prepare_file(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::NoRecording)));
    }

    #[test]
    fn test_bad_base64_is_skipped() {
        let outcome = slot(Some("%%%".into()), None).prepare_file(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::Payload(_))));
    }

    #[test]
    fn test_untrimmed_file_passes_through_unparsed() {
        // not a WAV at all, but without a trim it is shipped as-is
        let raw = payload::encode(b"webm bytes");
        let outcome = slot(Some(raw), None).prepare_file(RATE);
        assert_eq!(outcome.ready().unwrap(), b"webm bytes");
    }

    #[test]
    fn test_non_wav_needs_parsing_for_samples() {
        let raw = payload::encode(b"webm bytes");
        let outcome = slot(Some(raw), None).prepare_samples(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::Container(_))));
    }

    #[test]
    fn test_trimmed_file_is_reencoded() {
        let payload = wav_payload(vec![5; 16000]);
        let outcome = slot(Some(payload), Some(TrimWindow::new(0.0, 0.5))).prepare_file(RATE);

        let bytes = outcome.ready().unwrap();
        let (buffer, rate) = wav::parse(&bytes).unwrap();
        assert_eq!(rate, RATE);
        assert_eq!(buffer.len(), 8000);
    }

    #[test]
    fn test_trim_to_nothing_is_skipped() {
        let payload = wav_payload(vec![5; 1600]);
        let window = Some(TrimWindow::new(1.0, 2.0));

        let outcome = slot(Some(payload.clone()), window).prepare_file(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::EmptyClip)));

        let outcome = slot(Some(payload), window).prepare_samples(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::EmptyClip)));
    }

    #[test]
    fn test_declared_rate_is_ignored() {
        // 2s of samples labelled 8kHz read as 1s at 16kHz
        let samples: Vec<i16> = (0..32000).map(|i| (i % 1000) as i16).collect();
        let bytes = wav::serialize(&SampleBuffer::new(samples.clone()), 8000).unwrap();
        let clip = slot(
            Some(payload::encode(&bytes)),
            Some(TrimWindow { start: None, end: Some(1.0) }),
        );

        let trimmed = clip.prepare_samples(RATE).ready().unwrap();
        assert_eq!(trimmed.samples, &samples[..16000]);

        let file = clip.prepare_file(RATE).ready().unwrap();
        let (reencoded, rate) = wav::parse(&file).unwrap();
        assert_eq!(rate, RATE);
        assert_eq!(reencoded, trimmed);
    }

    #[test]
    fn test_empty_wav_is_skipped_for_samples() {
        let outcome = slot(Some(wav_payload(Vec::new())), None).prepare_samples(RATE);
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::EmptyClip)));
    }
}
