// Transport encoding for browser-recorded audio
//
// Clients send each recording as a base64 string, usually a data URL such as
// `data:audio/wav;base64,UklGR...`. Decoding failures are per-clip and never
// abort a whole request.

use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is empty")]
    Empty,

    #[error("data URL has no ',' separator")]
    MissingSeparator,

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Decode a transport payload into raw container bytes
///
/// Everything up to and including the first comma is dropped when the payload
/// starts with `data:`. ASCII whitespace inside the base64 body is ignored.
pub fn decode(payload: &str) -> Result<Vec<u8>, PayloadError> {
    let mut body = payload.trim();
    if body.is_empty() {
        return Err(PayloadError::Empty);
    }

    if body.starts_with("data:") {
        let comma = body.find(',').ok_or(PayloadError::MissingSeparator)?;
        body = &body[comma + 1..];
    }

    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

/// Encode raw bytes as plain base64
pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Encode raw WAV bytes as a `data:audio/wav;base64,` URL, the form browsers submit
pub fn encode_data_url(bytes: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_strips_data_url_marker() {
        let bytes = decode("data:audio/webm;codecs=opus;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_decode_trims_and_ignores_line_breaks() {
        assert_eq!(decode("  aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_empty() {
        assert!(matches!(decode(""), Err(PayloadError::Empty)));
        assert!(matches!(decode("   "), Err(PayloadError::Empty)));
    }

    #[test]
    fn test_decode_data_url_without_comma() {
        assert!(matches!(
            decode("data:audio/wav;base64"),
            Err(PayloadError::MissingSeparator)
        ));
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            decode("not base64!!"),
            Err(PayloadError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_encode_data_url_decodes_back() {
        let url = encode_data_url(&[1, 2, 3, 255]);
        assert!(url.starts_with("data:audio/wav;base64,"));
        assert_eq!(decode(&url).unwrap(), vec![1, 2, 3, 255]);
    }
}
