//! Mapping from the theme selection to document attributes.

use reviewscope_pipeline::ThemeMode;

/// Media query that reports the operating system colour scheme.
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// What goes on the document element for a theme selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentTheme {
    /// Value of the `data-theme` attribute.
    pub data_theme: &'static str,
    /// Whether the `dark` class is set.
    pub dark: bool,
}

impl DocumentTheme {
    /// Resolve `mode` against the system preference.
    #[must_use]
    pub const fn resolve(mode: ThemeMode, prefers_dark: bool) -> Self {
        let dark = mode.resolve(prefers_dark);
        Self {
            data_theme: if dark { "dark" } else { "light" },
            dark,
        }
    }
}

/// Whether the OS preference matters for `mode`.
#[must_use]
pub const fn follows_system(mode: ThemeMode) -> bool {
    matches!(mode, ThemeMode::System)
}
