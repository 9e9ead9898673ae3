//! Error types for loading, saving and selecting settings

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::localization::Language;

/// Why a configuration file could not be turned into a record
#[derive(Debug, Error)]
pub enum LoadError {
    /// File missing or unreadable
    #[error("cannot read file: {0}")]
    Io(#[from] io::Error),
    /// Contents are not well-formed JSON for the expected record
    #[error("malformed contents: {0}")]
    Parse(#[from] serde_json::Error),
    /// A required domain key is absent from the file
    #[error("missing entry `{0}`")]
    MissingEntry(String),
}

/// Errors surfaced by the settings menu
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Option set or menu configuration misuse (programmer error)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A value is not part of the option set it was looked up in
    #[error("value {0} is not in the option set")]
    NotFound(String),

    /// Startup load failed; there is no meaningful menu without it
    #[error("failed to load {}: {source}", path.display())]
    ConfigLoadFailed {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// Writing a configuration file failed after all retries
    #[error("failed to save {}: {source}", path.display())]
    ConfigSaveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No localized text for this key
    #[error("no {language:?} translation for `{key}`")]
    MissingTranslation { language: Language, key: String },
}

impl SettingsError {
    pub(crate) fn load_failed(path: impl Into<PathBuf>, source: impl Into<LoadError>) -> Self {
        SettingsError::ConfigLoadFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether this error should abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SettingsError::ConfigLoadFailed { .. }
                | SettingsError::InvalidConfiguration(_)
                | SettingsError::NotFound(_)
        )
    }
}

pub type Result<T, E = SettingsError> = std::result::Result<T, E>;
