//! The in-memory domain store for notes, folders and preferences.
//!
//! Owns every collection exclusively. Each mutation is validated first, then
//! applied in memory, then mirrored to the persistence adapter. A failed write
//! leaves the in-memory change in place and returns `NotesError::Storage`.

use crate::clock::{Clock, SystemClock};
use crate::config::storage_keys;
use crate::error::{NotesError, NotesResult};
use crate::models::folder::{normalize_name, random_color};
use crate::models::{AccentColor, Folder, Note, NoteDraft, NotePatch, ThemePreference, WidgetConfig};
use crate::query::{self, NoteQuery};
use crate::storage::PersistenceAdapter;

pub struct NoteStore {
    notes: Vec<Note>,
    folders: Vec<Folder>,
    theme: ThemePreference,
    accent: AccentColor,
    persistence: PersistenceAdapter,
    clock: Box<dyn Clock>,
}

impl NoteStore {
    /// Load every record from `persistence`, seeding the configured folders
    /// when none are stored.
    pub fn open(persistence: PersistenceAdapter, config: &WidgetConfig) -> Self {
        let notes: Vec<Note> = persistence.read(storage_keys::NOTES, Vec::new());
        let folders: Vec<Folder> = persistence.read(storage_keys::FOLDERS, Vec::new());
        let theme = persistence.read(
            storage_keys::THEME,
            ThemePreference {
                dark: config.default_theme_dark,
            },
        );
        let accent = persistence.read(
            storage_keys::COLOR,
            AccentColor(config.default_accent_color.clone()),
        );

        let mut store = Self {
            notes,
            folders,
            theme,
            accent,
            persistence,
            clock: Box::new(SystemClock),
        };

        if store.folders.is_empty() && !config.seed_folders.is_empty() {
            store.seed_folders(config);
        }

        log::info!(
            "[NOTES] Loaded {} notes and {} folders",
            store.notes.len(),
            store.folders.len()
        );
        store
    }

    /// Replace the wall clock, e.g. with a `ManualClock` in tests.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn seed_folders(&mut self, config: &WidgetConfig) {
        for seed in &config.seed_folders {
            if self.folders.iter().any(|f| f.has_name(&seed.name)) {
                continue;
            }
            match Folder::new(&seed.name, seed.color.clone()) {
                Ok(folder) => self.folders.push(folder),
                Err(e) => log::warn!("[NOTES] Skipping seed folder {:?}: {}", seed.name, e),
            }
        }
        if let Err(e) = self.persist_folders() {
            log::error!("[NOTES] Failed to persist seeded folders: {}", e);
        }
    }

    fn persist_notes(&self) -> NotesResult<()> {
        self.persistence.write(storage_keys::NOTES, &self.notes)
    }

    fn persist_folders(&self) -> NotesResult<()> {
        self.persistence.write(storage_keys::FOLDERS, &self.folders)
    }

    fn note_mut(&mut self, id: &str) -> NotesResult<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotesError::note_not_found(id))
    }

    // ----- Reads -----

    /// Notes in collection order (most recently created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Folders in creation order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Display name for a folder id: the folder's name, or the id itself when
    /// no such folder exists.
    pub fn folder_name<'a>(&'a self, id: &'a str) -> &'a str {
        query::resolve_folder_name(&self.folders, id)
    }

    pub fn folder_note_count(&self, folder_id: &str) -> usize {
        self.notes.iter().filter(|n| n.folder == folder_id).count()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn accent_color(&self) -> &AccentColor {
        &self.accent
    }

    /// Run the query engine over the current collections.
    pub fn query(&self, query: &NoteQuery) -> Vec<&Note> {
        query::run(&self.notes, &self.folders, query)
    }

    // ----- Note mutations -----

    /// Create a note at the front of the collection.
    pub fn create_note(&mut self, draft: NoteDraft) -> NotesResult<Note> {
        let note = Note::new(draft, self.clock.now())?;
        if !note.is_unfiled() && self.folder(&note.folder).is_none() {
            log::warn!("[NOTES] New note {} references unknown folder {}", note.id, note.folder);
        }
        self.notes.insert(0, note.clone());
        log::debug!("[NOTES] Created note {}", note.id);
        self.persist_notes()?;
        Ok(note)
    }

    /// Merge `patch` into an existing note and refresh its timestamp.
    pub fn update_note(&mut self, id: &str, patch: NotePatch) -> NotesResult<Note> {
        if self.note(id).is_none() {
            return Err(NotesError::note_not_found(id));
        }
        let patch = patch.validated()?;
        if let Some(folder_id) = patch.folder.as_deref() {
            if !folder_id.is_empty() && self.folder(folder_id).is_none() {
                log::warn!("[NOTES] Note {} updated into unknown folder {}", id, folder_id);
            }
        }
        let now = self.clock.now();

        let note = self.note_mut(id)?;
        patch.apply_to(note);
        note.touch(now);
        let updated = note.clone();

        log::debug!("[NOTES] Updated note {}", id);
        self.persist_notes()?;
        Ok(updated)
    }

    /// Remove a note. Unknown ids are a no-op and return `None`.
    pub fn delete_note(&mut self, id: &str) -> NotesResult<Option<Note>> {
        let removed = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .map(|idx| self.notes.remove(idx));
        if removed.is_none() {
            log::debug!("[NOTES] Delete of unknown note {} ignored", id);
        }
        self.persist_notes()?;
        Ok(removed)
    }

    /// Flip the pinned flag.
    pub fn toggle_pin(&mut self, id: &str) -> NotesResult<Note> {
        let now = self.clock.now();
        let note = self.note_mut(id)?;
        note.pinned = !note.pinned;
        note.touch(now);
        let updated = note.clone();

        self.persist_notes()?;
        Ok(updated)
    }

    /// File a note under `folder_id`, or unfile it when `folder_id` is empty.
    ///
    /// The folder id is not checked against existing folders; that is up to
    /// the caller.
    pub fn move_note(&mut self, id: &str, folder_id: &str) -> NotesResult<Note> {
        let folder_id = folder_id.trim();
        if !folder_id.is_empty() && self.folder(folder_id).is_none() {
            log::warn!("[NOTES] Moving note {} into unknown folder {}", id, folder_id);
        }
        let now = self.clock.now();
        let note = self.note_mut(id)?;
        note.folder = folder_id.to_string();
        note.touch(now);
        let updated = note.clone();

        self.persist_notes()?;
        Ok(updated)
    }

    /// Delete every note and drop the stored notes record. Folders are kept.
    pub fn clear_notes(&mut self) -> NotesResult<usize> {
        let count = self.notes.len();
        self.notes.clear();
        log::info!("[NOTES] Cleared {} notes", count);
        self.persistence.remove(storage_keys::NOTES)?;
        Ok(count)
    }

    // ----- Folder mutations -----

    fn ensure_unique_name(&self, name: &str, except_id: Option<&str>) -> NotesResult<()> {
        let taken = self
            .folders
            .iter()
            .any(|f| Some(f.id.as_str()) != except_id && f.has_name(name));
        if taken {
            return Err(NotesError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Create a folder with a random color, appended after existing folders.
    pub fn create_folder(&mut self, name: &str) -> NotesResult<Folder> {
        let name = normalize_name(name)?;
        self.ensure_unique_name(&name, None)?;

        let folder = Folder::new(&name, random_color())?;
        self.folders.push(folder.clone());
        log::debug!("[NOTES] Created folder {} ({})", folder.name, folder.id);
        self.persist_folders()?;
        Ok(folder)
    }

    /// Rename a folder. Renaming to the current name is a no-op.
    pub fn rename_folder(&mut self, id: &str, new_name: &str) -> NotesResult<Folder> {
        let current = self
            .folder(id)
            .ok_or_else(|| NotesError::folder_not_found(id))?;
        let new_name = normalize_name(new_name)?;
        if current.name == new_name {
            return Ok(current.clone());
        }
        self.ensure_unique_name(&new_name, Some(id))?;

        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| NotesError::folder_not_found(id))?;
        folder.name = new_name;
        let renamed = folder.clone();

        self.persist_folders()?;
        Ok(renamed)
    }

    /// Delete a folder and unfile every note that referenced it.
    /// Unknown ids are a no-op and return `None`.
    pub fn delete_folder(&mut self, id: &str) -> NotesResult<Option<Folder>> {
        let Some(idx) = self.folders.iter().position(|f| f.id == id) else {
            log::debug!("[NOTES] Delete of unknown folder {} ignored", id);
            return Ok(None);
        };
        let folder = self.folders.remove(idx);

        let now = self.clock.now();
        let mut unfiled = 0;
        for note in self.notes.iter_mut().filter(|n| n.folder == id) {
            note.folder.clear();
            note.touch(now);
            unfiled += 1;
        }
        log::info!(
            "[NOTES] Deleted folder {} and unfiled {} notes",
            folder.name,
            unfiled
        );

        // Attempt both writes even if the first one fails
        let folders_written = self.persist_folders();
        let notes_written = self.persist_notes();
        folders_written.and(notes_written)?;
        Ok(Some(folder))
    }

    // ----- Preferences -----

    pub fn set_theme(&mut self, dark: bool) -> NotesResult<()> {
        self.theme = ThemePreference { dark };
        self.persistence.write(storage_keys::THEME, &self.theme)
    }

    pub fn set_accent_color(&mut self, color: &str) -> NotesResult<()> {
        let color = color.trim();
        if color.is_empty() {
            return Err(NotesError::Validation("color must not be empty".to_string()));
        }
        self.accent = AccentColor(color.to_string());
        self.persistence.write(storage_keys::COLOR, &self.accent)
    }
}
