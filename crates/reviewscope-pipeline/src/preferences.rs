//! User preferences: language, theme and favorites.

use crate::reports::FavoriteSet;
use reviewscope_api_models::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the platform preference.
    #[default]
    System,
}

impl ThemeMode {
    /// Selector order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Light, Self::Dark, Self::System]
    }

    /// Storage and CLI value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Translation key of the selector label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Light => "theme.light",
            Self::Dark => "theme.dark",
            Self::System => "theme.system",
        }
    }

    /// Parse a stored or CLI value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Whether the effective theme is dark, given the platform preference.
    #[must_use]
    pub const fn resolve(self, prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => prefers_dark,
        }
    }
}

/// Persisted user state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Interface and report language.
    pub language: Language,
    /// Theme selection.
    pub theme: ThemeMode,
    /// Starred report ids.
    pub favorites: FavoriteSet,
}

impl Preferences {
    /// Parse stored JSON, falling back to defaults when malformed.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// Failure to persist preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Underlying storage refused the write.
    #[error("preference storage unavailable: {0}")]
    Storage(String),
    /// Local filesystem error.
    #[error("failed to write preferences")]
    Io(#[from] std::io::Error),
    /// Serialization failed.
    #[error("failed to encode preferences")]
    Encode(#[from] serde_json::Error),
}

/// Somewhere preferences live between runs.
pub trait PreferenceStore {
    /// Stored preferences, or defaults when missing or unreadable.
    fn load(&self) -> Preferences;

    /// Persist `preferences`.
    ///
    /// # Errors
    ///
    /// Returns the storage failure.
    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{PreferenceError, PreferenceStore, Preferences};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::{debug, warn};

    /// Preferences in one JSON file.
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        /// Store backed by `path`; the file is created on first save.
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl PreferenceStore for JsonFileStore {
        fn load(&self) -> Preferences {
            match fs::read_to_string(&self.path) {
                Ok(raw) => Preferences::from_json(&raw),
                Err(err) => {
                    if err.kind() != std::io::ErrorKind::NotFound {
                        warn!(path = %self.path.display(), error = %err, "state file unreadable, using defaults");
                    }
                    Preferences::default()
                }
            }
        }

        fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let body = serde_json::to_string_pretty(preferences)?;
            fs::write(&self.path, body)?;
            debug!(path = %self.path.display(), "preferences saved");
            Ok(())
        }
    }
}
