//! Query engine: filter, sort, then promote pinned notes.
//!
//! Pure functions over borrowed collections. The same inputs always yield the
//! same order; every sort is stable, so ties keep collection order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, EnumIter, EnumString};

use crate::models::{Folder, Note};

/// Ordering applied to the filtered notes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    /// Most recently edited first
    #[default]
    UpdatedDesc,
    UpdatedAsc,
    CreatedDesc,
    CreatedAsc,
    /// Alphabetical by title
    TitleAsc,
    TitleDesc,
    /// Pinned first, then most recently edited
    PinnedFirst,
}

impl SortKey {
    /// Parse from string, defaulting to `UpdatedDesc` if unknown
    pub fn from_str_or_default(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }

    /// Title orderings are left alone by pin promotion.
    pub fn promotes_pinned(self) -> bool {
        !matches!(self, SortKey::TitleAsc | SortKey::TitleDesc)
    }

    fn compare(self, a: &Note, b: &Note) -> Ordering {
        match self {
            SortKey::UpdatedDesc => b.updated_at.cmp(&a.updated_at),
            SortKey::UpdatedAsc => a.updated_at.cmp(&b.updated_at),
            SortKey::CreatedDesc => b.created_at.cmp(&a.created_at),
            SortKey::CreatedAsc => a.created_at.cmp(&b.created_at),
            SortKey::TitleAsc => compare_titles(&a.title, &b.title),
            SortKey::TitleDesc => compare_titles(&b.title, &a.title),
            SortKey::PinnedFirst => b
                .pinned
                .cmp(&a.pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at)),
        }
    }
}

/// Current filter and sort selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteQuery {
    /// Free text, matched case-insensitively. Empty matches everything.
    pub text: String,
    /// Exact category. Empty matches everything.
    pub category: String,
    /// Exact folder id. Empty matches everything.
    pub folder: String,
    pub sort: SortKey,
}

/// Case-insensitive comparison; on a tie, lowercase sorts ahead of uppercase.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Name shown for a folder id: the folder's name, the id itself when the
/// folder is gone, or empty for unfiled notes.
pub fn resolve_folder_name<'a>(folders: &'a [Folder], id: &'a str) -> &'a str {
    if id.is_empty() {
        return "";
    }
    folders
        .iter()
        .find(|f| f.id == id)
        .map(|f| f.name.as_str())
        .unwrap_or(id)
}

/// Whether `note` passes the text, category and folder filters.
pub fn note_matches(note: &Note, folders: &[Folder], query: &NoteQuery) -> bool {
    let needle = query.text.trim().to_lowercase();
    if !needle.is_empty() {
        let haystack = format!(
            "{} {} {} {}",
            note.title,
            note.content,
            note.category,
            resolve_folder_name(folders, &note.folder)
        )
        .to_lowercase();
        if !haystack.contains(&needle) {
            return false;
        }
    }
    if !query.category.is_empty() && note.category != query.category {
        return false;
    }
    if !query.folder.is_empty() && note.folder != query.folder {
        return false;
    }
    true
}

/// Filter, sort and pin-promote `notes`.
pub fn run<'a>(notes: &'a [Note], folders: &[Folder], query: &NoteQuery) -> Vec<&'a Note> {
    let mut view: Vec<&Note> = notes
        .iter()
        .filter(|n| note_matches(n, folders, query))
        .collect();

    view.sort_by(|a, b| query.sort.compare(a, b));

    if query.sort.promotes_pinned() {
        view.sort_by_key(|n| !n.pinned);
    }
    view
}
