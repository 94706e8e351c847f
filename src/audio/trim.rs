// Clip trimming to user-selected start/end points
//
// Windows come from loosely-typed JSON. Each field is parsed on its own: a
// missing or malformed value falls back to that field's default instead of
// invalidating the window.

use serde_json::Value;

use super::buffer::{seconds_to_samples, SampleBuffer};

/// Optional start/end points (seconds) for one clip
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimWindow {
    /// Start offset in seconds (default: 0)
    pub start: Option<f64>,
    /// End offset in seconds (default: clip duration)
    pub end: Option<f64>,
}

impl TrimWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Build a window from a JSON value
    ///
    /// Returns `None` unless the value is an object, in which case the clip is
    /// passed through untrimmed.
    pub fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            start: fields.get("start").and_then(lenient_seconds),
            end: fields.get("end").and_then(lenient_seconds),
        })
    }

    /// Resolve defaults and order the bounds so that `0 <= start <= end`
    pub fn normalize(&self, duration_secs: f64) -> (f64, f64) {
        let start = self.start.unwrap_or(0.0).max(0.0);
        let end = self.end.unwrap_or(duration_secs).max(start);
        (start, end)
    }
}

/// Accept a JSON number or a numeric string; anything else (or a non-finite
/// value) counts as missing
pub fn lenient_seconds(value: &Value) -> Option<f64> {
    let secs = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    secs.is_finite().then_some(secs)
}

/// Cut `buffer` down to `window`
///
/// Indices are rounded to the nearest sample and clamped to the buffer. A
/// degenerate range yields an empty buffer; without a window the input is
/// returned unchanged.
pub fn trim(buffer: SampleBuffer, window: Option<&TrimWindow>, sample_rate: u32) -> SampleBuffer {
    let Some(window) = window else {
        return buffer;
    };

    let len = buffer.len();
    let (start_secs, end_secs) = window.normalize(buffer.duration_seconds(sample_rate));
    let start = seconds_to_samples(start_secs, sample_rate).min(len);
    let end = seconds_to_samples(end_secs, sample_rate).min(len);

    if end <= start {
        return SampleBuffer::default();
    }

    let mut samples = buffer.into_samples();
    samples.truncate(end);
    samples.drain(..start);
    SampleBuffer::new(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RATE: u32 = 16000;

    fn ramp(len: usize) -> SampleBuffer {
        SampleBuffer::new((0..len).map(|i| (i % 30000) as i16).collect())
    }

    #[test]
    fn test_no_window_is_identity() {
        let buffer = ramp(1000);
        assert_eq!(trim(buffer.clone(), None, RATE), buffer);
    }

    #[test]
    fn test_full_range_window_is_identity() {
        let buffer = ramp(16001);
        let window = TrimWindow::new(0.0, buffer.duration_seconds(RATE));
        assert_eq!(trim(buffer.clone(), Some(&window), RATE), buffer);
    }

    #[test]
    fn test_default_window_is_identity() {
        let buffer = ramp(777);
        assert_eq!(trim(buffer.clone(), Some(&TrimWindow::default()), RATE), buffer);
    }

    #[test]
    fn test_trim_middle() {
        let buffer = ramp(32000);
        let trimmed = trim(buffer, Some(&TrimWindow::new(0.25, 0.5)), RATE);

        assert_eq!(trimmed.len(), 4000);
        assert_eq!(trimmed.samples[0], 4000);
        assert_eq!(trimmed.samples[3999], 7999);
    }

    #[test]
    fn test_end_past_buffer_is_clamped() {
        let buffer = ramp(16000);
        let trimmed = trim(buffer, Some(&TrimWindow::new(0.5, 10.0)), RATE);
        assert_eq!(trimmed.len(), 8000);
    }

    #[test]
    fn test_start_past_buffer_is_empty() {
        let trimmed = trim(ramp(16000), Some(&TrimWindow::new(2.0, 3.0)), RATE);
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_end_before_start_is_empty() {
        let trimmed = trim(ramp(16000), Some(&TrimWindow::new(0.6, 0.2)), RATE);
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_negative_start_clamps_to_zero() {
        let trimmed = trim(ramp(16000), Some(&TrimWindow::new(-5.0, 0.5)), RATE);
        assert_eq!(trimmed.len(), 8000);
        assert_eq!(trimmed.samples[0], 0);
    }

    #[test]
    fn test_indices_round_to_nearest_sample() {
        // 0.10004s * 16000 = 1600.64 -> 1601
        let trimmed = trim(ramp(16000), Some(&TrimWindow::new(0.10004, 0.2)), RATE);
        assert_eq!(trimmed.samples[0], 1601);
        assert_eq!(trimmed.len(), 3200 - 1601);
    }

    #[test]
    fn test_from_json_non_object_is_none() {
        assert_eq!(TrimWindow::from_json(&Value::Null), None);
        assert_eq!(TrimWindow::from_json(&json!(1.5)), None);
        assert_eq!(TrimWindow::from_json(&json!([0, 1])), None);
    }

    #[test]
    fn test_from_json_fields_fall_back_individually() {
        let window = TrimWindow::from_json(&json!({"start": "abc", "end": 1.5})).unwrap();
        assert_eq!(window.start, None);
        assert_eq!(window.end, Some(1.5));

        let window = TrimWindow::from_json(&json!({"start": "0.25", "end": null})).unwrap();
        assert_eq!(window.start, Some(0.25));
        assert_eq!(window.end, None);

        let window = TrimWindow::from_json(&json!({})).unwrap();
        assert_eq!(window, TrimWindow::default());
    }

    #[test]
    fn test_malformed_start_keeps_end() {
        let window = TrimWindow::from_json(&json!({"start": {}, "end": 0.5})).unwrap();
        let trimmed = trim(ramp(16000), Some(&window), RATE);
        assert_eq!(trimmed.len(), 8000);
        assert_eq!(trimmed.samples[0], 0);
    }

    #[test]
    fn test_normalize_orders_bounds() {
        assert_eq!(TrimWindow::new(2.0, 1.0).normalize(5.0), (2.0, 2.0));
        assert_eq!(TrimWindow::default().normalize(5.0), (0.0, 5.0));
        assert_eq!(
            TrimWindow { start: Some(-1.0), end: None }.normalize(3.0),
            (0.0, 3.0)
        );
    }
}
