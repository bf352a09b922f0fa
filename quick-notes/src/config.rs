use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Path of the SQLite file backing the key-value store.
    pub const DATABASE_URL: &str = "QUICK_NOTES_DATABASE_URL";
    /// Set to "memory" to keep everything in-process (nothing survives exit).
    pub const STORAGE_BACKEND: &str = "QUICK_NOTES_STORAGE";
    /// Override for the RON widget config location.
    pub const CONFIG_PATH: &str = "QUICK_NOTES_CONFIG";
}

/// Default values
pub mod defaults {
    pub const DATABASE_URL: &str = "./.db/quick_notes.db";
    pub const CONFIG_DIR: &str = "config";
    pub const CONFIG_FILE: &str = "quick_notes.ron";
    pub const ACCENT_COLOR: &str = "#7c3aed";
    pub const THEME_DARK: bool = true;
    /// Roughly what a browser grants a single origin.
    pub const STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;
}

/// Storage keys for the four persisted records.
pub mod storage_keys {
    pub const NOTES: &str = "qn_notes";
    pub const FOLDERS: &str = "qn_folders";
    pub const THEME: &str = "qn_theme";
    pub const COLOR: &str = "qn_color";
}

/// Returns the absolute path to the quick-notes crate directory.
pub fn crate_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the runtime widget config path (quick-notes/config/quick_notes.ron)
pub fn widget_config_path() -> PathBuf {
    env::var(env_vars::CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            crate_dir()
                .join(defaults::CONFIG_DIR)
                .join(defaults::CONFIG_FILE)
        })
}

/// Which key-value store backs the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite { path: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub widget_config_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let storage = match env::var(env_vars::STORAGE_BACKEND).ok().as_deref() {
            Some("memory") => StorageBackend::Memory,
            Some(other) if other != "sqlite" => {
                log::warn!(
                    "[CONFIG] Unknown storage backend '{}', falling back to sqlite",
                    other
                );
                StorageBackend::Sqlite {
                    path: database_url(),
                }
            }
            _ => StorageBackend::Sqlite {
                path: database_url(),
            },
        };

        Self {
            storage,
            widget_config_path: widget_config_path(),
        }
    }
}

fn database_url() -> String {
    env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_config_path_points_into_crate() {
        // Only meaningful when the override is unset, which is the case under cargo test.
        if env::var(env_vars::CONFIG_PATH).is_err() {
            let path = widget_config_path();
            assert!(path.ends_with("config/quick_notes.ron"));
        }
    }

    #[test]
    fn test_storage_keys_are_distinct() {
        let keys = [
            storage_keys::NOTES,
            storage_keys::FOLDERS,
            storage_keys::THEME,
            storage_keys::COLOR,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
