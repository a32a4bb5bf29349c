//! Encoding detection and decoding for input files.
//!
//! Detection is deliberately modest: a BOM is authoritative, valid UTF-8
//! with non-ASCII content is a strong signal, and everything else falls
//! back to a caller-chosen legacy encoding (Shift_JIS for the survey
//! exports this tool exists for). Pure-ASCII input is reported with zero
//! confidence since every ASCII-compatible encoding decodes it the same.

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("UTF-16 input is not supported")]
    Utf16Unsupported,
    #[error("input is not valid {0} text")]
    Malformed(&'static str),
}

/// Result of the decode collaborator: text plus what it was decoded as.
#[derive(Debug, PartialEq)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    /// 1.0 for a BOM, 0.8 for non-ASCII UTF-8, 0.6 for a fallback strict
    /// decode, 0.0 for ASCII-only input.
    pub confidence: f32,
}

impl Decoded {
    pub fn was_utf8(&self) -> bool {
        self.encoding == UTF_8
    }
}

/// The default legacy encoding assumed when detection is inconclusive.
pub fn default_fallback() -> &'static Encoding {
    SHIFT_JIS
}

/// Detects the encoding of `bytes` and decodes them strictly.
///
/// A detection confidence below `min_confidence` means the guess is
/// discarded in favor of `fallback`. Lossy decoding is never performed:
/// bytes that are malformed under the chosen encoding fail the file.
pub fn detect_and_decode(
    bytes: &[u8],
    fallback: &'static Encoding,
    min_confidence: f32,
) -> Result<Decoded, DecodeError> {
    if bytes.starts_with(UTF8_BOM) {
        return match UTF_8.decode_without_bom_handling_and_without_replacement(&bytes[3..]) {
            Some(text) => Ok(Decoded {
                text: text.into_owned(),
                encoding: UTF_8,
                confidence: 1.0,
            }),
            None => Err(DecodeError::Malformed(UTF_8.name())),
        };
    }
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(DecodeError::Utf16Unsupported);
    }

    let (guess, confidence) =
        match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(_) if bytes.is_ascii() => (fallback, 0.0),
            Some(_) => (UTF_8, 0.8),
            None => (fallback, 0.6),
        };
    let encoding = if confidence < min_confidence {
        fallback
    } else {
        guess
    };

    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(Decoded {
            text: text.into_owned(),
            encoding,
            confidence,
        }),
        None => Err(DecodeError::Malformed(encoding.name())),
    }
}
