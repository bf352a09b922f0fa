//! Error taxonomy for the notes domain.
//!
//! Validation, not-found and duplicate-name errors are raised before any state
//! is touched. Storage errors are raised after the in-memory mutation has been
//! applied, so the current session stays correct but the change will not
//! survive a reload.

/// Errors surfaced by the store, the persistence adapter and the widget.
#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("A folder named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Storage write failed: {0}")]
    Storage(String),
}

impl NotesError {
    pub fn note_not_found(id: &str) -> Self {
        NotesError::NotFound {
            entity: "Note",
            id: id.to_string(),
        }
    }

    pub fn folder_not_found(id: &str) -> Self {
        NotesError::NotFound {
            entity: "Folder",
            id: id.to_string(),
        }
    }

    /// True for errors that leave in-memory state changed but unpersisted.
    pub fn is_storage(&self) -> bool {
        matches!(self, NotesError::Storage(_))
    }
}

impl From<rusqlite::Error> for NotesError {
    fn from(e: rusqlite::Error) -> Self {
        NotesError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(e: serde_json::Error) -> Self {
        NotesError::Storage(format!("Failed to serialize value: {}", e))
    }
}

pub type NotesResult<T> = Result<T, NotesError>;
