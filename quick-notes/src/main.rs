use dotenv::dotenv;
use std::io::{self, BufRead, Write};
use std::path::Path;

use quick_notes::config::{Config, StorageBackend};
use quick_notes::console::{self, Command, TerminalPresenter};
use quick_notes::storage::{MemoryStore, PersistenceAdapter, SqliteStore};
use quick_notes::{NotesError, NotesResult, NoteStore, Outcome, Widget, WidgetConfig};

fn open_persistence(config: &Config, widget_config: &WidgetConfig) -> NotesResult<PersistenceAdapter> {
    let quota = widget_config.storage_quota_bytes;
    match &config.storage {
        StorageBackend::Sqlite { path } => {
            log::info!("[STORAGE] Using SQLite store at {}", path);
            Ok(PersistenceAdapter::new(SqliteStore::open(Path::new(path), quota)?))
        }
        StorageBackend::Memory => {
            log::info!("[STORAGE] Using in-memory store; nothing will be kept after exit");
            Ok(PersistenceAdapter::new(MemoryStore::new(quota)))
        }
    }
}

fn describe(outcome: &Outcome, store: &NoteStore) -> Option<String> {
    match outcome {
        Outcome::NoteSaved(note) => Some(format!("Saved \"{}\"", note.title)),
        Outcome::NoteDeleted(Some(note)) => Some(format!("Deleted \"{}\"", note.title)),
        Outcome::NoteDeleted(None) => Some("Nothing to delete".to_string()),
        Outcome::NotesCleared(count) => Some(format!("Deleted {} notes", count)),
        Outcome::FolderSaved(folder) => Some(format!("Folder \"{}\" saved", folder.name)),
        Outcome::FolderDeleted(Some(folder)) => Some(format!("Folder \"{}\" deleted", folder.name)),
        Outcome::FolderDeleted(None) => Some("Nothing to delete".to_string()),
        Outcome::ViewChanged => None,
        Outcome::PreferencesSaved => Some(format!(
            "Theme: {}, accent: {}",
            store.theme().label(),
            store.accent_color().as_str()
        )),
    }
}

fn main() {
    dotenv().ok();
    env_logger::init();

    log::info!("Quick Notes v{}", env!("CARGO_PKG_VERSION"));
    let config = Config::from_env();
    log::info!("Loading widget config from {:?}", config.widget_config_path);
    let widget_config = WidgetConfig::load_or_init(&config.widget_config_path);

    let persistence = match open_persistence(&config, &widget_config) {
        Ok(persistence) => persistence,
        Err(e) => {
            log::error!("[STORAGE] Failed to open store: {}", e);
            std::process::exit(1);
        }
    };
    let store = NoteStore::open(persistence, &widget_config);
    let mut widget = Widget::new(store, TerminalPresenter::new(io::stdout()));
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            log::debug!("[CONSOLE] Failed to flush prompt: {}", e);
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
            None => break,
        };

        let command = match console::parse_line(&line, widget.store()) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", console::HELP);
                println!("Categories: {}", widget_config.categories.join(", "));
            }
            Command::Dispatch(intent) => match widget.dispatch(intent) {
                Ok(outcome) => {
                    if let Some(message) = describe(&outcome, widget.store()) {
                        println!("{}", message);
                    }
                }
                Err(e @ NotesError::Storage(_)) => {
                    println!("Change kept for this session but not saved: {}", e)
                }
                Err(e) => println!("{}", e),
            },
        }
    }
}
