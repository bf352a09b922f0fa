//! View models handed to the presentation layer.
//!
//! A `Presenter` receives fully resolved cards and folder navigation entries,
//! so it never needs to reach back into the store.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::models::{Folder, Note};
use crate::query::resolve_folder_name;

/// Hue used when a category has no assigned accent.
pub const DEFAULT_CATEGORY_HUE: u16 = 210;

/// Accent hue for a category chip.
pub fn category_hue(category: &str) -> u16 {
    match category {
        "Work" => 200,
        "Personal" => 330,
        "Ideas" => 50,
        "School" => 120,
        "Todo" => 260,
        _ => DEFAULT_CATEGORY_HUE,
    }
}

/// Folder label on a note card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderChip {
    pub name: String,
    /// `None` when the note points at a folder that no longer exists.
    pub color: Option<String>,
}

/// One rendered note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCard {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub category_hue: u16,
    pub folder: Option<FolderChip>,
    pub pinned: bool,
    pub stamp: String,
}

/// One entry of the folder navigation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderNavEntry {
    /// Empty for the "All Notes" entry.
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub note_count: usize,
    pub selected: bool,
}

/// Receives re-rendered views after every dispatched intent.
pub trait Presenter {
    fn render(&mut self, cards: &[NoteCard]);
    fn notify_folders(&mut self, entries: &[FolderNavEntry]);
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn note_card(note: &Note, folders: &[Folder]) -> NoteCard {
    let folder = if note.is_unfiled() {
        None
    } else {
        let known = folders.iter().find(|f| f.id == note.folder);
        Some(FolderChip {
            name: resolve_folder_name(folders, &note.folder).to_string(),
            color: known.map(|f| f.color.clone()),
        })
    };

    let mut stamp = format!(
        "Created {} · Updated {}",
        format_timestamp(note.created_at),
        format_timestamp(note.updated_at)
    );
    if note.pinned {
        stamp.push_str(" · Pinned");
    }

    NoteCard {
        id: note.id.clone(),
        title: note.title.clone(),
        content: note.content.clone(),
        category: note.category.clone(),
        category_hue: category_hue(&note.category),
        folder,
        pinned: note.pinned,
        stamp,
    }
}

pub fn note_cards(notes: &[&Note], folders: &[Folder]) -> Vec<NoteCard> {
    notes.iter().map(|n| note_card(n, folders)).collect()
}

/// "All Notes" followed by every folder with its filed-note count.
pub fn folder_nav(notes: &[Note], folders: &[Folder], selected: &str) -> Vec<FolderNavEntry> {
    let mut entries = Vec::with_capacity(folders.len() + 1);
    entries.push(FolderNavEntry {
        id: String::new(),
        name: "All Notes".to_string(),
        color: None,
        note_count: notes.len(),
        selected: selected.is_empty(),
    });
    entries.extend(folders.iter().map(|folder| FolderNavEntry {
        id: folder.id.clone(),
        name: folder.name.clone(),
        color: Some(folder.color.clone()),
        note_count: notes.iter().filter(|n| n.folder == folder.id).count(),
        selected: selected == folder.id,
    }));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note(folder: &str, pinned: bool) -> Note {
        let at = Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap();
        Note {
            id: "n1".to_string(),
            title: "Title".to_string(),
            content: "Body".to_string(),
            category: "Ideas".to_string(),
            folder: folder.to_string(),
            pinned,
            created_at: at,
            updated_at: at,
        }
    }

    fn folders() -> Vec<Folder> {
        vec![Folder {
            id: "f1".to_string(),
            name: "Work".to_string(),
            color: "#3b82f6".to_string(),
        }]
    }

    #[test]
    fn test_category_hues() {
        assert_eq!(category_hue("Work"), 200);
        assert_eq!(category_hue("Todo"), 260);
        assert_eq!(category_hue("todo"), DEFAULT_CATEGORY_HUE);
        assert_eq!(category_hue("Recipes"), DEFAULT_CATEGORY_HUE);
    }

    #[test]
    fn test_card_for_filed_note() {
        let card = note_card(&sample_note("f1", false), &folders());
        assert_eq!(card.category_hue, 50);
        assert_eq!(
            card.folder,
            Some(FolderChip {
                name: "Work".to_string(),
                color: Some("#3b82f6".to_string()),
            })
        );
        assert!(card.stamp.starts_with("Created "));
        assert!(card.stamp.contains(" · Updated "));
        assert!(!card.stamp.ends_with("Pinned"));
    }

    #[test]
    fn test_card_for_unfiled_and_dangling() {
        assert_eq!(note_card(&sample_note("", true), &folders()).folder, None);
        assert!(note_card(&sample_note("", true), &folders()).stamp.ends_with(" · Pinned"));

        let dangling = note_card(&sample_note("gone", false), &folders());
        assert_eq!(
            dangling.folder,
            Some(FolderChip {
                name: "gone".to_string(),
                color: None,
            })
        );
    }

    #[test]
    fn test_folder_nav_counts() {
        let notes = vec![sample_note("f1", false), sample_note("", false), sample_note("f1", true)];
        let nav = folder_nav(&notes, &folders(), "f1");

        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].name, "All Notes");
        assert_eq!(nav[0].note_count, 3);
        assert!(!nav[0].selected);
        assert_eq!(nav[1].note_count, 2);
        assert!(nav[1].selected);
    }
}
