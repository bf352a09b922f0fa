use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NotesError, NotesResult};

/// A named, colored bucket that notes may reference by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Folder {
    /// Create a folder with a fresh id. The name is trimmed and must not be empty.
    pub fn new(name: &str, color: impl Into<String>) -> NotesResult<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: normalize_name(name)?,
            color: color.into(),
        })
    }

    /// Case-insensitive name comparison used for uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Trim a folder name, rejecting empty names.
pub fn normalize_name(name: &str) -> NotesResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NotesError::Validation(
            "folder name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Random pastel color for user-created folders.
pub fn random_color() -> String {
    let hue: u16 = rand::thread_rng().gen_range(0..360);
    format!("hsl({}, 70%, 60%)", hue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_folder_trims_name() {
        let folder = Folder::new("  Work ", "#3b82f6").unwrap();
        assert_eq!(folder.name, "Work");
        assert_eq!(folder.color, "#3b82f6");
        assert!(!folder.id.is_empty());
    }

    #[test]
    fn test_new_folder_rejects_blank_name() {
        assert!(matches!(
            Folder::new("   ", "#fff"),
            Err(NotesError::Validation(_))
        ));
    }

    #[test]
    fn test_has_name_ignores_case() {
        let folder = Folder::new("Ideas", "#f59e0b").unwrap();
        assert!(folder.has_name("ideas"));
        assert!(folder.has_name("IDEAS"));
        assert!(!folder.has_name("Idea"));
    }

    #[test]
    fn test_random_color_format() {
        for _ in 0..20 {
            let color = random_color();
            assert!(color.starts_with("hsl("));
            assert!(color.ends_with(", 70%, 60%)"));
            let hue: u16 = color["hsl(".len()..color.find(',').unwrap()].parse().unwrap();
            assert!(hue < 360);
        }
    }
}
