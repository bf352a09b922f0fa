//! Note record and the payloads used to create and edit it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{NotesError, NotesResult};

/// A single user-authored note.
///
/// `folder` is an empty string for unfiled notes. Field names serialize in
/// camelCase so stored blobs keep the `createdAt`/`updatedAt` layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub folder: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Build a fresh note from a validated draft. Both timestamps are `now`.
    pub fn new(draft: NoteDraft, now: DateTime<Utc>) -> NotesResult<Self> {
        let draft = draft.validated()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            category: draft.category,
            folder: draft.folder,
            pinned: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_unfiled(&self) -> bool {
        self.folder.is_empty()
    }

    /// Refresh `updated_at`. The new value is always strictly later than the
    /// previous one, even when the clock has not advanced.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }
}

/// Input for creating a note. Title, content and category are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub folder: String,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            folder: folder.into(),
        }
    }

    /// Trim every field and reject empty required fields.
    pub fn validated(self) -> NotesResult<Self> {
        Ok(Self {
            title: required("title", &self.title)?,
            content: required("content", &self.content)?,
            category: required("category", &self.category)?,
            folder: self.folder.trim().to_string(),
        })
    }
}

/// Partial update for an existing note. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub folder: Option<String>,
}

impl NotePatch {
    /// A patch carrying every form field, as produced by the edit form.
    pub fn from_draft(draft: NoteDraft) -> Self {
        Self {
            title: Some(draft.title),
            content: Some(draft.content),
            category: Some(draft.category),
            folder: Some(draft.folder),
        }
    }

    /// Trim supplied fields and reject supplied required fields that are empty.
    pub fn validated(self) -> NotesResult<Self> {
        Ok(Self {
            title: self.title.map(|t| required("title", &t)).transpose()?,
            content: self.content.map(|c| required("content", &c)).transpose()?,
            category: self.category.map(|c| required("category", &c)).transpose()?,
            folder: self.folder.map(|f| f.trim().to_string()),
        })
    }

    /// Merge into `note`. Does not touch timestamps.
    pub fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(category) = self.category {
            note.category = category;
        }
        if let Some(folder) = self.folder {
            note.folder = folder;
        }
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn required(field: &str, value: &str) -> NotesResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NotesError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_new_note_trims_and_stamps() {
        let draft = NoteDraft::new("  Groceries ", " milk, eggs\n", " Todo ", "");
        let note = Note::new(draft, at(100)).unwrap();

        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk, eggs");
        assert_eq!(note.category, "Todo");
        assert!(note.is_unfiled());
        assert!(!note.pinned);
        assert_eq!(note.created_at, note.updated_at);
        assert!(!note.id.is_empty());
    }

    #[test]
    fn test_new_note_rejects_blank_fields() {
        for draft in [
            NoteDraft::new("   ", "body", "Work", ""),
            NoteDraft::new("Title", "\n\t", "Work", ""),
            NoteDraft::new("Title", "body", "", ""),
        ] {
            let err = Note::new(draft, at(0)).unwrap_err();
            assert!(matches!(err, NotesError::Validation(_)));
        }
    }

    #[test]
    fn test_touch_strictly_advances() {
        let mut note = Note::new(NoteDraft::new("a", "b", "c", ""), at(50)).unwrap();

        note.touch(at(60));
        assert_eq!(note.updated_at, at(60));

        // Clock stood still or went backwards
        note.touch(at(60));
        assert!(note.updated_at > at(60));
        let before = note.updated_at;
        note.touch(at(10));
        assert!(note.updated_at > before);
        assert!(note.updated_at >= note.created_at);
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let mut note = Note::new(NoteDraft::new("Old", "body", "Work", ""), at(0)).unwrap();
        let patch = NotePatch {
            title: Some(" New ".to_string()),
            folder: Some("f1".to_string()),
            ..Default::default()
        };

        patch.validated().unwrap().apply_to(&mut note);
        assert_eq!(note.title, "New");
        assert_eq!(note.content, "body");
        assert_eq!(note.category, "Work");
        assert_eq!(note.folder, "f1");
    }

    #[test]
    fn test_patch_rejects_blank_supplied_field() {
        let patch = NotePatch {
            content: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(patch.validated(), Err(NotesError::Validation(_))));
    }

    #[test]
    fn test_serializes_camel_case_layout() {
        let note = Note::new(NoteDraft::new("a", "b", "c", ""), at(0)).unwrap();
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["folder"], "");

        // Records written without folder/pinned still load
        let raw = r#"{"id":"x","title":"t","content":"c","category":"Work",
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z"}"#;
        let loaded: Note = serde_json::from_str(raw).unwrap();
        assert!(loaded.is_unfiled());
        assert!(!loaded.pinned);
    }
}
