//! Widget configuration backed by a RON file.
//!
//! Holds the folders seeded into an empty store, the category choices offered
//! by the note form, default display preferences, and the storage quota.
//! Loaded/saved from `config/quick_notes.ron`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::defaults;

/// A folder created on first launch when no folders are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFolder {
    pub name: String,
    pub color: String,
}

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_seed_folders")]
    pub seed_folders: Vec<SeedFolder>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_theme_dark")]
    pub default_theme_dark: bool,
    #[serde(default = "default_accent_color")]
    pub default_accent_color: String,
    /// `None` disables the quota.
    #[serde(default = "default_storage_quota")]
    pub storage_quota_bytes: Option<usize>,
}

fn default_seed_folders() -> Vec<SeedFolder> {
    [("Work", "#3b82f6"), ("Personal", "#ec4899"), ("Ideas", "#f59e0b")]
        .into_iter()
        .map(|(name, color)| SeedFolder {
            name: name.to_string(),
            color: color.to_string(),
        })
        .collect()
}

fn default_categories() -> Vec<String> {
    ["Work", "Personal", "Ideas", "School", "Todo"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_theme_dark() -> bool { defaults::THEME_DARK }
fn default_accent_color() -> String { defaults::ACCENT_COLOR.to_string() }
fn default_storage_quota() -> Option<usize> { Some(defaults::STORAGE_QUOTA_BYTES) }

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            seed_folders: default_seed_folders(),
            categories: default_categories(),
            default_theme_dark: default_theme_dark(),
            default_accent_color: default_accent_color(),
            storage_quota_bytes: default_storage_quota(),
        }
    }
}

impl WidgetConfig {
    /// Load from `path`, falling back to `Default` on any error.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match ron::from_str::<WidgetConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("[CONFIG] Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::debug!("[CONFIG] Could not read {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Like `load_from`, but writes the defaults to `path` when no file exists
    /// there yet so they can be edited for the next launch.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => log::info!("[CONFIG] Wrote default widget config to {}", path.display()),
            Err(e) => log::warn!("[CONFIG] {}", e),
        }
        config
    }

    /// Serialize to pretty RON and write to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
        let pretty = ron::ser::PrettyConfig::default();
        let content = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| format!("Failed to serialize widget config: {}", e))?;
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        Ok(())
    }
}
