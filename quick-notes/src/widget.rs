//! Intent dispatch: one user action in, one store call and one re-render out.

use crate::error::NotesResult;
use crate::models::{Folder, Note, NoteDraft, NotePatch};
use crate::presentation::{self, Presenter};
use crate::query::{NoteQuery, SortKey};
use crate::store::NoteStore;

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CreateNote(NoteDraft),
    UpdateNote { id: String, patch: NotePatch },
    DeleteNote(String),
    TogglePin(String),
    MoveNote { id: String, folder: String },
    ClearNotes,
    CreateFolder(String),
    RenameFolder { id: String, name: String },
    DeleteFolder(String),
    SetQuery(String),
    SetCategoryFilter(String),
    SetFolderFilter(String),
    SetSort(SortKey),
    SetTheme { dark: bool },
    SetAccentColor(String),
    /// Re-render without changing anything.
    Refresh,
}

/// What a successfully dispatched intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoteSaved(Note),
    NoteDeleted(Option<Note>),
    NotesCleared(usize),
    FolderSaved(Folder),
    FolderDeleted(Option<Folder>),
    ViewChanged,
    PreferencesSaved,
}

/// The store, the current filter/sort selection and a presenter.
pub struct Widget<P: Presenter> {
    store: NoteStore,
    query: NoteQuery,
    presenter: P,
}

impl<P: Presenter> Widget<P> {
    /// Take ownership of `store` and render the initial view.
    pub fn new(store: NoteStore, presenter: P) -> Self {
        let mut widget = Self {
            store,
            query: NoteQuery::default(),
            presenter,
        };
        widget.render();
        widget
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn query(&self) -> &NoteQuery {
        &self.query
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Notes currently in view, in display order.
    pub fn visible_notes(&self) -> Vec<&Note> {
        self.store.query(&self.query)
    }

    /// Apply `intent` and re-render.
    ///
    /// The view is re-rendered even when the intent fails: a storage error
    /// still leaves a changed in-memory state on screen.
    pub fn dispatch(&mut self, intent: Intent) -> NotesResult<Outcome> {
        log::debug!("[NOTES] Dispatching {:?}", intent);
        let result = self.apply(intent);
        if let Err(e) = &result {
            log::warn!("[NOTES] Intent rejected: {}", e);
        }
        self.render();
        result
    }

    fn apply(&mut self, intent: Intent) -> NotesResult<Outcome> {
        let store = &mut self.store;
        match intent {
            Intent::CreateNote(draft) => store.create_note(draft).map(Outcome::NoteSaved),
            Intent::UpdateNote { id, patch } => store.update_note(&id, patch).map(Outcome::NoteSaved),
            Intent::DeleteNote(id) => store.delete_note(&id).map(Outcome::NoteDeleted),
            Intent::TogglePin(id) => store.toggle_pin(&id).map(Outcome::NoteSaved),
            Intent::MoveNote { id, folder } => store.move_note(&id, &folder).map(Outcome::NoteSaved),
            Intent::ClearNotes => store.clear_notes().map(Outcome::NotesCleared),
            Intent::CreateFolder(name) => store.create_folder(&name).map(Outcome::FolderSaved),
            Intent::RenameFolder { id, name } => {
                store.rename_folder(&id, &name).map(Outcome::FolderSaved)
            }
            Intent::DeleteFolder(id) => store.delete_folder(&id).map(Outcome::FolderDeleted),
            Intent::SetQuery(text) => {
                self.query.text = text;
                Ok(Outcome::ViewChanged)
            }
            Intent::SetCategoryFilter(category) => {
                self.query.category = category.trim().to_string();
                Ok(Outcome::ViewChanged)
            }
            Intent::SetFolderFilter(folder) => {
                self.query.folder = folder.trim().to_string();
                Ok(Outcome::ViewChanged)
            }
            Intent::SetSort(sort) => {
                self.query.sort = sort;
                Ok(Outcome::ViewChanged)
            }
            Intent::SetTheme { dark } => store.set_theme(dark).map(|_| Outcome::PreferencesSaved),
            Intent::SetAccentColor(color) => {
                store.set_accent_color(&color).map(|_| Outcome::PreferencesSaved)
            }
            Intent::Refresh => Ok(Outcome::ViewChanged),
        }
    }

    /// Push the current view and folder navigation to the presenter.
    pub fn render(&mut self) {
        let visible = self.store.query(&self.query);
        let cards = presentation::note_cards(&visible, self.store.folders());
        let nav = presentation::folder_nav(self.store.notes(), self.store.folders(), &self.query.folder);
        self.presenter.notify_folders(&nav);
        self.presenter.render(&cards);
    }
}
