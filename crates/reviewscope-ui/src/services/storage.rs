//! Preferences in browser local storage.
//!
//! Each field has its own key so a corrupt value only resets that field.

use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::window;
use reviewscope_api_models::Language;
use reviewscope_pipeline::{FavoriteSet, PreferenceError, PreferenceStore, Preferences, ThemeMode};
use serde::Serialize;

pub(crate) const LANGUAGE_KEY: &str = "language";
pub(crate) const THEME_KEY: &str = "theme";
pub(crate) const FAVORITES_KEY: &str = "favorites";

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalStorageStore;

impl PreferenceStore for LocalStorageStore {
    fn load(&self) -> Preferences {
        Preferences {
            language: load_language(),
            theme: LocalStorage::get::<String>(THEME_KEY)
                .ok()
                .and_then(|value| ThemeMode::parse(&value))
                .unwrap_or_default(),
            favorites: LocalStorage::get::<FavoriteSet>(FAVORITES_KEY).unwrap_or_default(),
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        set(LANGUAGE_KEY, preferences.language.code())?;
        set(THEME_KEY, preferences.theme.as_str())?;
        set(FAVORITES_KEY, &preferences.favorites)
    }
}

/// Stored language, else the browser language, else English.
fn load_language() -> Language {
    if let Some(language) = LocalStorage::get::<String>(LANGUAGE_KEY)
        .ok()
        .and_then(|value| Language::from_tag(&value))
    {
        return language;
    }
    window()
        .navigator()
        .language()
        .and_then(|tag| Language::from_tag(&tag))
        .unwrap_or_default()
}

fn set<T: Serialize>(key: &'static str, value: T) -> Result<(), PreferenceError> {
    LocalStorage::set(key, value).map_err(|err| {
        let detail = err.to_string();
        console::error!("storage operation failed", key, detail.clone());
        PreferenceError::Storage(detail)
    })
}
