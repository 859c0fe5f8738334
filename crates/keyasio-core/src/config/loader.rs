//! The configuration load/default/save protocol.
//!
//! [`ConfigLoader::load`] turns a path into a populated settings value:
//!
//! ```text
//! load(path)
//!  └─ path relative?          -> join onto the current working directory
//!  └─ file missing?
//!       ├─ create parent directories and an empty file
//!       ├─ deserialize the codec placeholder   -> schema defaults
//!       └─ write the defaults back to disk
//!  └─ file present?
//!       ├─ read bytes, decode text (BOM aware)
//!       ├─ empty / whitespace only            -> use the placeholder instead
//!       ├─ deserialize                         -> Err leaves the file untouched
//!       └─ re-save according to ResavePolicy
//!  └─ Loaded { config, saver, origin }
//! ```
//!
//! The returned [`Saver`] is bound to the absolute path and codec used for the
//! load.  The owner calls it whenever it wants the in-memory state on disk; the
//! loader itself never saves after returning.
//!
//! # Why re-save after a successful load? (for beginners)
//!
//! Writing the parsed value straight back normalises the file's formatting and
//! fills in any fields that were added to the schema since the file was last
//! written, so users always see every available option.  The behaviour is
//! controlled by [`ResavePolicy`]; the default only writes when the normalised
//! text actually differs from what is on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::codec::{CodecError, ConfigCodec, YamlCodec};
use super::encoding::{EncodingError, TextEncoding};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A relative path was given and the working directory is unavailable.
    #[error("could not determine the current working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file bytes are not valid text.
    #[error("config at {path} is not valid text: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },

    /// The text does not match the schema.
    #[error("failed to parse {codec} config at {path}: {source}")]
    Deserialize {
        path: PathBuf,
        codec: &'static str,
        #[source]
        source: CodecError,
    },

    /// The in-memory value could not be rendered as text.
    #[error("failed to serialize config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// A settings schema that can be loaded by [`ConfigLoader`].
///
/// Schema types should use `#[serde(default)]` so the codec placeholder
/// deserializes into their default values.
pub trait Configuration: Serialize + DeserializeOwned {
    /// Encoding used when this value is written to disk.
    fn encoding(&self) -> TextEncoding {
        TextEncoding::Utf8
    }
}

/// When the loader writes a successfully parsed file back to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResavePolicy {
    /// Rewrite the file on every successful load.
    Always,
    /// Rewrite only if the normalised bytes differ from the bytes on disk.
    #[default]
    WhenChanged,
    /// Never write an existing file during load.
    Never,
}

/// How the returned configuration came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// No file existed; defaults were created and written.
    Created,
    /// An existing file was parsed.
    Existing,
}

/// Persists a configuration value to the file it was loaded from.
#[derive(Debug, Clone)]
pub struct Saver<C = YamlCodec> {
    path: PathBuf,
    codec: C,
}

impl<C: ConfigCodec> Saver<C> {
    /// Absolute path this saver writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `config` and overwrites the file using `config.encoding()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if the value cannot be rendered and
    /// [`ConfigError::Io`] if the file cannot be written.
    pub fn save<T: Configuration>(&self, config: &T) -> Result<(), ConfigError> {
        let bytes = self.render(config)?;
        fs::write(&self.path, bytes).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Renders `config` to the exact bytes [`Saver::save`] would write.
    fn render<T: Configuration>(&self, config: &T) -> Result<Vec<u8>, ConfigError> {
        let mut text = self
            .codec
            .serialize(config)
            .map_err(|source| ConfigError::Serialize {
                path: self.path.clone(),
                source,
            })?;
        // A schema with nothing to write still has to leave a parseable file.
        if text.trim().is_empty() {
            text = self.codec.placeholder().to_string();
        }
        Ok(config.encoding().encode(&text))
    }
}

/// Result of a successful [`ConfigLoader::load`].
#[derive(Debug)]
pub struct Loaded<T, C = YamlCodec> {
    /// The populated configuration value.
    pub config: T,
    /// Saver bound to the file the value came from.
    pub saver: Saver<C>,
    /// Whether the file was created or already existed.
    pub origin: LoadOrigin,
}

impl<T: Configuration, C: ConfigCodec> Loaded<T, C> {
    /// Writes the current value of `self.config` back to its file.
    ///
    /// # Errors
    ///
    /// See [`Saver::save`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.saver.save(&self.config)
    }

    /// Splits into the configuration value and its saver.
    pub fn into_parts(self) -> (T, Saver<C>) {
        (self.config, self.saver)
    }
}

/// Loads configuration files with a fixed codec and re-save policy.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader<C = YamlCodec> {
    codec: C,
    resave: ResavePolicy,
}

impl ConfigLoader<YamlCodec> {
    /// Creates a YAML loader with [`ResavePolicy::WhenChanged`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: ConfigCodec + Clone> ConfigLoader<C> {
    /// Creates a loader that reads and writes with `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            resave: ResavePolicy::default(),
        }
    }

    /// Sets when an existing file is written back after a successful parse.
    pub fn resave_policy(mut self, policy: ResavePolicy) -> Self {
        self.resave = policy;
        self
    }

    /// Loads `T` from `path`, creating a default file when none exists.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Decode`] / [`ConfigError::Deserialize`] when an
    ///   existing file is not valid; the file is left untouched.
    /// - [`ConfigError::Io`] for directory creation, read, or write failures.
    /// - [`ConfigError::WorkingDirectory`] if a relative path cannot be resolved.
    pub fn load<T: Configuration>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Loaded<T, C>, ConfigError> {
        let path = resolve_path(path.as_ref())?;
        let saver = Saver {
            path: path.clone(),
            codec: self.codec.clone(),
        };

        match fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = self.create_default(&saver)?;
                info!(
                    "config file \"{}\" was not found; default config was created and used",
                    file_name(&path)
                );
                return Ok(Loaded {
                    config,
                    saver,
                    origin: LoadOrigin::Created,
                });
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        }

        let bytes = fs::read(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let content = TextEncoding::decode(&bytes).map_err(|source| ConfigError::Decode {
            path: path.clone(),
            source,
        })?;
        let document = if content.trim().is_empty() {
            self.codec.placeholder()
        } else {
            content.as_str()
        };
        let config: T =
            self.codec
                .deserialize(document)
                .map_err(|source| ConfigError::Deserialize {
                    path: path.clone(),
                    codec: self.codec.name(),
                    source,
                })?;

        self.resave_existing(&saver, &config, &bytes)?;
        info!("config file \"{}\" was loaded", file_name(&path));

        Ok(Loaded {
            config,
            saver,
            origin: LoadOrigin::Existing,
        })
    }

    fn create_default<T: Configuration>(&self, saver: &Saver<C>) -> Result<T, ConfigError> {
        let path = saver.path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, b"").map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: T = self
            .codec
            .deserialize(self.codec.placeholder())
            .map_err(|source| ConfigError::Deserialize {
                path: path.to_path_buf(),
                codec: self.codec.name(),
                source,
            })?;
        saver.save(&config)?;
        Ok(config)
    }

    fn resave_existing<T: Configuration>(
        &self,
        saver: &Saver<C>,
        config: &T,
        on_disk: &[u8],
    ) -> Result<(), ConfigError> {
        match self.resave {
            ResavePolicy::Never => Ok(()),
            ResavePolicy::Always => saver.save(config),
            ResavePolicy::WhenChanged => {
                let rendered = saver.render(config)?;
                if rendered == on_disk {
                    return Ok(());
                }
                debug!("normalising config file {}", saver.path().display());
                fs::write(saver.path(), rendered).map_err(|source| ConfigError::Io {
                    path: saver.path().to_path_buf(),
                    source,
                })
            }
        }
    }
}

/// Loads `T` from `path` with the default YAML loader.
///
/// # Errors
///
/// See [`ConfigLoader::load`].
pub fn load_config<T: Configuration>(path: impl AsRef<Path>) -> Result<Loaded<T>, ConfigError> {
    ConfigLoader::new().load(path)
}

fn resolve_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
    Ok(absolutize(path, &cwd))
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
