//! Structured-text codecs used by the configuration loader.
//!
//! A codec is the only place that knows the on-disk text format.  The loader
//! calls exactly two operations on it:
//!
//! - [`ConfigCodec::serialize`]   – in-memory value → text
//! - [`ConfigCodec::deserialize`] – text → in-memory value
//!
//! # Placeholder documents
//!
//! Each codec also provides a *placeholder*: the smallest document in its
//! format that parses as a top-level mapping.  The loader deserializes the
//! placeholder whenever it needs default values (first run, empty file).  For
//! YAML that is `default:` with an empty value, the same document earlier
//! KeyAsio releases wrote, and it stays a mapping for codecs or schemas where
//! an empty document is not one.  For TOML the empty document already is an
//! empty table.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Error type for codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// YAML text could not be parsed or produced.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML text could not be parsed.
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// A value could not be written as TOML.
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Error raised by a codec implemented outside this crate.
    ///
    /// ```
    /// use keyasio_core::CodecError;
    ///
    /// let err = CodecError::Custom("document exceeds 64 KiB".into());
    /// assert_eq!(err.to_string(), "document exceeds 64 KiB");
    /// ```
    #[error("{0}")]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

/// Serializer/deserializer boundary used by [`crate::ConfigLoader`].
///
/// Implementations are expected to be cheap to clone: the loader hands a copy
/// to every [`crate::Saver`] it creates.
pub trait ConfigCodec {
    /// Short format name used in error messages (e.g. `"YAML"`).
    fn name(&self) -> &'static str;

    /// Minimal document that deserializes into any `#[serde(default)]` schema.
    fn placeholder(&self) -> &'static str;

    /// Renders `value` as text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the value cannot be represented in this format.
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CodecError>;

    /// Parses `text` into a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if the text is malformed or does not match `T`.
    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError>;
}

/// YAML codec backed by `serde_yaml`.  This is the default format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl ConfigCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn placeholder(&self) -> &'static str {
        "default:\n"
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_yaml::to_string(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// TOML codec backed by the `toml` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TomlCodec;

impl ConfigCodec for TomlCodec {
    fn name(&self) -> &'static str {
        "TOML"
    }

    fn placeholder(&self) -> &'static str {
        ""
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        Ok(toml::to_string_pretty(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        Ok(toml::from_str(text)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        enabled: bool,
        name: String,
        interval_ms: u64,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                enabled: true,
                name: "sample".to_string(),
                interval_ms: 3,
            }
        }
    }

    #[test]
    fn test_yaml_placeholder_deserializes_to_defaults() {
        // Arrange
        let codec = YamlCodec;

        // Act
        let sample: Sample = codec.deserialize(codec.placeholder()).expect("placeholder");

        // Assert
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_toml_placeholder_deserializes_to_defaults() {
        let codec = TomlCodec;
        let sample: Sample = codec.deserialize(codec.placeholder()).expect("placeholder");
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_yaml_placeholder_is_a_mapping() {
        let value: serde_yaml::Value = YamlCodec.deserialize(YamlCodec.placeholder()).unwrap();
        assert!(value.is_mapping());
    }

    #[test]
    fn test_yaml_scalar_document_is_rejected() {
        let result: Result<Sample, CodecError> = YamlCodec.deserialize("just some text\n");
        assert!(matches!(result, Err(CodecError::Yaml(_))));
    }

    #[test]
    fn test_yaml_partial_document_keeps_defaults_for_missing_fields() {
        // Arrange
        let text = "name: custom\n";

        // Act
        let sample: Sample = YamlCodec.deserialize(text).expect("deserialize partial");

        // Assert
        assert_eq!(sample.name, "custom");
        assert!(sample.enabled);
        assert_eq!(sample.interval_ms, 3);
    }

    #[test]
    fn test_yaml_normalization_is_idempotent() {
        // Arrange: hand-written document with odd spacing and an unknown key
        let text = "name:    spaced\nunknown_key: 1\nenabled: false\n";

        // Act
        let first: Sample = YamlCodec.deserialize(text).unwrap();
        let rendered = YamlCodec.serialize(&first).unwrap();
        let second: Sample = YamlCodec.deserialize(&rendered).unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(rendered, YamlCodec.serialize(&second).unwrap());
    }

    #[test]
    fn test_yaml_type_mismatch_returns_error() {
        let result: Result<Sample, CodecError> = YamlCodec.deserialize("enabled: 42\n");
        assert!(matches!(result, Err(CodecError::Yaml(_))));
    }

    #[test]
    fn test_toml_round_trip_preserves_values() {
        // Arrange
        let sample = Sample {
            enabled: false,
            name: "toml".to_string(),
            interval_ms: 250,
        };

        // Act
        let text = TomlCodec.serialize(&sample).expect("serialize");
        let restored: Sample = TomlCodec.deserialize(&text).expect("deserialize");

        // Assert
        assert_eq!(sample, restored);
    }

    #[test]
    fn test_toml_malformed_document_returns_parse_error() {
        let result: Result<Sample, CodecError> = TomlCodec.deserialize("[[[ not valid toml");
        assert!(matches!(result, Err(CodecError::TomlDe(_))));
    }
}
