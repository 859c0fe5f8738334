//! Text encodings for configuration files.
//!
//! Settings files are usually plain UTF-8, but users edit them with whatever
//! editor they have at hand and some of those write a byte-order mark (BOM) or
//! save as UTF-16.  Reading therefore sniffs the BOM; writing uses the
//! encoding the schema declares through [`crate::Configuration::encoding`].
//!
//! | Encoding  | BOM bytes    |
//! |-----------|--------------|
//! | `Utf8`    | none         |
//! | `Utf8Bom` | `EF BB BF`   |
//! | `Utf16Le` | `FF FE`      |
//! | `Utf16Be` | `FE FF`      |

use thiserror::Error;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Error type for decoding file bytes into text.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The bytes are not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The bytes after a UTF-16 BOM are not valid UTF-16.
    #[error("invalid UTF-16: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),

    /// A UTF-16 payload has an odd number of bytes.
    #[error("UTF-16 payload has odd length {0}")]
    OddLength(usize),
}

/// Text encoding used when writing a configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark.
    #[default]
    Utf8,
    /// UTF-8 prefixed with `EF BB BF`.
    Utf8Bom,
    /// UTF-16 little endian prefixed with `FF FE`.
    Utf16Le,
    /// UTF-16 big endian prefixed with `FE FF`.
    Utf16Be,
}

impl TextEncoding {
    /// Encodes `text` into bytes, including the BOM where this encoding has one.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf8Bom => {
                let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
                out.extend_from_slice(&UTF8_BOM);
                out.extend_from_slice(text.as_bytes());
                out
            }
            TextEncoding::Utf16Le => {
                let mut out = Vec::with_capacity(2 + text.len() * 2);
                out.extend_from_slice(&UTF16_LE_BOM);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            TextEncoding::Utf16Be => {
                let mut out = Vec::with_capacity(2 + text.len() * 2);
                out.extend_from_slice(&UTF16_BE_BOM);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                out
            }
        }
    }

    /// Detects the encoding of `bytes` from its BOM.  No BOM means UTF-8.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&UTF8_BOM) {
            TextEncoding::Utf8Bom
        } else if bytes.starts_with(&UTF16_LE_BOM) {
            TextEncoding::Utf16Le
        } else if bytes.starts_with(&UTF16_BE_BOM) {
            TextEncoding::Utf16Be
        } else {
            TextEncoding::Utf8
        }
    }

    /// Decodes `bytes` into text using the encoding announced by its BOM.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`] if the payload is not valid in the sniffed
    /// encoding.
    pub fn decode(bytes: &[u8]) -> Result<String, EncodingError> {
        match Self::sniff(bytes) {
            TextEncoding::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
            TextEncoding::Utf8Bom => Ok(String::from_utf8(bytes[UTF8_BOM.len()..].to_vec())?),
            TextEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        }
    }
}

fn decode_utf16(payload: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String, EncodingError> {
    if payload.len() % 2 != 0 {
        return Err(EncodingError::OddLength(payload.len()));
    }
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16(&units)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "debugging: true\nkeys:\n- Z\n- X\n";

    #[test]
    fn test_utf8_encode_has_no_bom() {
        let bytes = TextEncoding::Utf8.encode(TEXT);
        assert_eq!(bytes, TEXT.as_bytes());
        assert_eq!(TextEncoding::sniff(&bytes), TextEncoding::Utf8);
    }

    #[test]
    fn test_utf8_bom_is_written_and_stripped() {
        // Arrange
        let bytes = TextEncoding::Utf8Bom.encode(TEXT);

        // Act
        let decoded = TextEncoding::decode(&bytes).expect("decode");

        // Assert
        assert!(bytes.starts_with(&UTF8_BOM));
        assert_eq!(decoded, TEXT);
    }

    #[test]
    fn test_utf16_le_and_be_decode_back_to_text() {
        for encoding in [TextEncoding::Utf16Le, TextEncoding::Utf16Be] {
            let bytes = encoding.encode(TEXT);
            assert_eq!(TextEncoding::sniff(&bytes), encoding);
            assert_eq!(TextEncoding::decode(&bytes).unwrap(), TEXT);
        }
    }

    #[test]
    fn test_utf16_non_ascii_survives() {
        let text = "osu_folder: C:\\ゲーム\\osu!\n";
        let bytes = TextEncoding::Utf16Le.encode(text);
        assert_eq!(TextEncoding::decode(&bytes).unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8_returns_error() {
        let result = TextEncoding::decode(&[b'a', 0xC3, 0x28]);
        assert!(matches!(result, Err(EncodingError::Utf8(_))));
    }

    #[test]
    fn test_odd_length_utf16_returns_error() {
        let result = TextEncoding::decode(&[0xFF, 0xFE, b'a']);
        assert!(matches!(result, Err(EncodingError::OddLength(1))));
    }

    #[test]
    fn test_empty_bytes_decode_to_empty_text() {
        assert_eq!(TextEncoding::decode(&[]).unwrap(), "");
    }
}
