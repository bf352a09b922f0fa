//! Display preferences persisted alongside notes and folders.

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Light/dark theme choice, stored as `{ "dark": bool }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub dark: bool,
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self {
            dark: defaults::THEME_DARK,
        }
    }
}

impl ThemePreference {
    pub fn label(self) -> &'static str {
        if self.dark { "dark" } else { "light" }
    }
}

/// Accent color, stored as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccentColor(pub String);

impl Default for AccentColor {
    fn default() -> Self {
        Self(defaults::ACCENT_COLOR.to_string())
    }
}

impl AccentColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
