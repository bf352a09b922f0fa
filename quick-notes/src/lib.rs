//! Quick notes: categorized, foldered, pinnable notes over a key-value store.

pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod presentation;
pub mod query;
pub mod storage;
pub mod store;
pub mod widget;

pub use error::{NotesError, NotesResult};
pub use models::{Folder, Note, NoteDraft, NotePatch, WidgetConfig};
pub use query::{NoteQuery, SortKey};
pub use storage::{KeyValueStore, PersistenceAdapter};
pub use store::NoteStore;
pub use widget::{Intent, Outcome, Widget};
