//! Terminal front end: line commands in, plain-text note cards out.
//!
//! Notes and folders can be referenced by full id or any unambiguous id
//! prefix; folders also by name (case-insensitive).

use std::io::Write;

use crate::models::{NoteDraft, NotePatch};
use crate::presentation::{FolderNavEntry, NoteCard, Presenter};
use crate::query::SortKey;
use crate::store::NoteStore;
use crate::widget::Intent;

pub const HELP: &str = "\
Commands:
  new <title> | <content> | <category> [| <folder>]
  edit <note> | <title> | <content> | <category> [| <folder>]
                            (use \\n for line breaks in content)
  rm <note>                 delete a note
  pin <note>                pin or unpin a note
  mv <note> [<folder>]      move a note (no folder = unfiled)
  clear                     delete ALL notes
  folder add <name>
  folder rename <folder> <new name>
  folder rm <folder>        notes in it become unfiled
  find [<text>]             search (no text = clear search)
  category [<name>]         filter by category
  in [<folder>]             filter by folder
  sort <key>                updatedDesc updatedAsc createdDesc createdAsc
                            titleAsc titleDesc pinnedFirst
  theme dark|light
  color <css color>
  list | help | quit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Intent),
    Help,
    Quit,
}

/// Parse one input line against the current store contents.
pub fn parse_line(line: &str, store: &NoteStore) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let intent = match verb.to_lowercase().as_str() {
        "" | "list" | "ls" => Intent::Refresh,
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "new" | "add" => {
            let (mut draft, _) = parse_form(rest)?;
            draft.folder = resolve_optional_folder(store, &draft.folder)?;
            Intent::CreateNote(draft)
        }
        "edit" => {
            let (note_ref, form) = rest
                .split_once('|')
                .ok_or_else(|| "usage: edit <note> | <title> | <content> | <category> [| <folder>]".to_string())?;
            let id = resolve_note(store, note_ref.trim())?;
            let (mut draft, has_folder) = parse_form(form)?;
            draft.folder = resolve_optional_folder(store, &draft.folder)?;
            let mut patch = NotePatch::from_draft(draft);
            if !has_folder {
                patch.folder = None;
            }
            Intent::UpdateNote { id, patch }
        }
        "rm" | "del" => Intent::DeleteNote(resolve_note(store, required_arg(rest, "rm <note>")?)?),
        "pin" => Intent::TogglePin(resolve_note(store, required_arg(rest, "pin <note>")?)?),
        "mv" | "move" => {
            let (note_ref, folder_ref) = match rest.split_once(char::is_whitespace) {
                Some((n, f)) => (n, f.trim()),
                None => (rest, ""),
            };
            let id = resolve_note(store, required_arg(note_ref, "mv <note> [<folder>]")?)?;
            Intent::MoveNote {
                id,
                folder: resolve_optional_folder(store, folder_ref)?,
            }
        }
        "clear" => Intent::ClearNotes,
        "folder" => parse_folder_command(rest, store)?,
        "find" | "search" => Intent::SetQuery(rest.to_string()),
        "category" | "cat" => Intent::SetCategoryFilter(rest.to_string()),
        "in" => Intent::SetFolderFilter(resolve_optional_folder(store, rest)?),
        "sort" => {
            if !rest.is_empty() && rest.parse::<SortKey>().is_err() {
                log::warn!("[CONSOLE] Unknown sort key '{}', using {}", rest, SortKey::default().as_ref());
            }
            Intent::SetSort(SortKey::from_str_or_default(rest))
        }
        "theme" => match rest.to_lowercase().as_str() {
            "dark" => Intent::SetTheme { dark: true },
            "light" => Intent::SetTheme { dark: false },
            _ => return Err("usage: theme dark|light".to_string()),
        },
        "color" => Intent::SetAccentColor(required_arg(rest, "color <css color>")?.to_string()),
        other => return Err(format!("Unknown command: {} (try 'help')", other)),
    };
    Ok(Command::Dispatch(intent))
}

fn parse_folder_command(rest: &str, store: &NoteStore) -> Result<Intent, String> {
    let (sub, args) = match rest.split_once(char::is_whitespace) {
        Some((sub, args)) => (sub, args.trim()),
        None => (rest, ""),
    };
    match sub {
        "add" | "new" => Ok(Intent::CreateFolder(required_arg(args, "folder add <name>")?.to_string())),
        "rename" => {
            let (folder_ref, name) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: folder rename <folder> <new name>".to_string())?;
            Ok(Intent::RenameFolder {
                id: resolve_folder(store, folder_ref)?,
                name: name.trim().to_string(),
            })
        }
        "rm" | "del" => Ok(Intent::DeleteFolder(resolve_folder(
            store,
            required_arg(args, "folder rm <folder>")?,
        )?)),
        _ => Err("usage: folder add|rename|rm ...".to_string()),
    }
}

fn required_arg<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(arg)
    }
}

/// `title | content | category [| folder]`, plus whether a folder field was
/// given. Blank fields are left for the store to reject.
fn parse_form(form: &str) -> Result<(NoteDraft, bool), String> {
    let parts: Vec<&str> = form.split('|').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) {
        return Err("expected: <title> | <content> | <category> [| <folder>]".to_string());
    }
    let draft = NoteDraft::new(
        parts[0],
        parts[1].replace("\\n", "\n"),
        parts[2],
        parts.get(3).copied().unwrap_or(""),
    );
    Ok((draft, parts.len() == 4))
}

/// Exact id, or a prefix matching exactly one note.
pub fn resolve_note(store: &NoteStore, reference: &str) -> Result<String, String> {
    if let Some(note) = store.note(reference) {
        return Ok(note.id.clone());
    }
    unique(
        store
            .notes()
            .iter()
            .filter(|n| n.id.starts_with(reference))
            .map(|n| n.id.clone()),
        "note",
        reference,
    )
}

/// Empty stays empty (unfiled / no filter).
fn resolve_optional_folder(store: &NoteStore, reference: &str) -> Result<String, String> {
    if reference.is_empty() {
        Ok(String::new())
    } else {
        resolve_folder(store, reference)
    }
}

/// Exact id, case-insensitive name, or a prefix matching exactly one folder id.
pub fn resolve_folder(store: &NoteStore, reference: &str) -> Result<String, String> {
    if let Some(folder) = store.folder(reference) {
        return Ok(folder.id.clone());
    }
    if let Some(folder) = store.folders().iter().find(|f| f.has_name(reference)) {
        return Ok(folder.id.clone());
    }
    unique(
        store
            .folders()
            .iter()
            .filter(|f| f.id.starts_with(reference))
            .map(|f| f.id.clone()),
        "folder",
        reference,
    )
}

fn unique(mut ids: impl Iterator<Item = String>, kind: &str, reference: &str) -> Result<String, String> {
    match (ids.next(), ids.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(format!("No {} matches '{}'", kind, reference)),
        (Some(_), Some(_)) => Err(format!("'{}' matches more than one {}", reference, kind)),
    }
}

/// Writes cards and folder navigation as plain text.
pub struct TerminalPresenter<W: Write> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_cards(&mut self, cards: &[NoteCard]) -> std::io::Result<()> {
        if cards.is_empty() {
            writeln!(self.out, "  (no notes match)")?;
            return Ok(());
        }
        for card in cards {
            let pin = if card.pinned { "* " } else { "  " };
            let folder = card
                .folder
                .as_ref()
                .map(|chip| format!(" [{}]", chip.name))
                .unwrap_or_default();
            let short_id: String = card.id.chars().take(8).collect();
            writeln!(self.out, "{}{} ({}){}  #{}", pin, card.title, card.category, folder, short_id)?;
            for line in card.content.lines() {
                writeln!(self.out, "      {}", line)?;
            }
            writeln!(self.out, "      {}", card.stamp)?;
        }
        Ok(())
    }

    fn write_nav(&mut self, entries: &[FolderNavEntry]) -> std::io::Result<()> {
        let labels: Vec<String> = entries
            .iter()
            .map(|e| {
                let marker = if e.selected { ">" } else { "" };
                format!("{}{} ({})", marker, e.name, e.note_count)
            })
            .collect();
        writeln!(self.out, "Folders: {}", labels.join(" | "))
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render(&mut self, cards: &[NoteCard]) {
        if let Err(e) = self.write_cards(cards).and_then(|_| self.out.flush()) {
            log::warn!("[CONSOLE] Failed to write notes: {}", e);
        }
    }

    fn notify_folders(&mut self, entries: &[FolderNavEntry]) {
        if let Err(e) = self.write_nav(entries) {
            log::warn!("[CONSOLE] Failed to write folders: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WidgetConfig;
    use crate::storage::PersistenceAdapter;
    use crate::widget::Widget;

    fn store() -> NoteStore {
        NoteStore::open(PersistenceAdapter::in_memory(), &WidgetConfig::default())
    }

    fn dispatch(command: Command) -> Intent {
        match command {
            Command::Dispatch(intent) => intent,
            other => panic!("expected an intent, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_new_note() {
        let store = store();
        let intent = dispatch(parse_line("new Call mom | Sunday\\nafternoon | Personal", &store).unwrap());
        assert_eq!(
            intent,
            Intent::CreateNote(NoteDraft::new("Call mom", "Sunday\nafternoon", "Personal", ""))
        );

        let personal = store.folders()[1].id.clone();
        let intent = dispatch(parse_line("new A | B | Todo | personal", &store).unwrap());
        assert_eq!(intent, Intent::CreateNote(NoteDraft::new("A", "B", "Todo", personal)));

        assert!(parse_line("new only | two", &store).is_err());
        assert!(parse_line("new A | B | Todo | Nowhere", &store).is_err());
    }

    #[test]
    fn test_parse_resolves_folder_by_name() {
        let store = store();
        let work_id = store.folders()[0].id.clone();

        assert_eq!(dispatch(parse_line("in work", &store).unwrap()), Intent::SetFolderFilter(work_id.clone()));
        assert_eq!(dispatch(parse_line("in", &store).unwrap()), Intent::SetFolderFilter(String::new()));
        assert_eq!(dispatch(parse_line("folder rm WORK", &store).unwrap()), Intent::DeleteFolder(work_id.clone()));
        assert_eq!(
            dispatch(parse_line("folder rename Work Job stuff", &store).unwrap()),
            Intent::RenameFolder {
                id: work_id,
                name: "Job stuff".to_string()
            }
        );
        assert!(parse_line("in Nowhere", &store).is_err());
    }

    #[test]
    fn test_parse_resolves_note_prefix() {
        let mut store = store();
        let note = store.create_note(NoteDraft::new("T", "C", "Todo", "")).unwrap();
        let prefix = &note.id[..6];

        assert_eq!(dispatch(parse_line(&format!("pin {}", prefix), &store).unwrap()), Intent::TogglePin(note.id.clone()));
        assert_eq!(
            dispatch(parse_line(&format!("mv {} ideas", prefix), &store).unwrap()),
            Intent::MoveNote {
                id: note.id.clone(),
                folder: store.folders()[2].id.clone()
            }
        );
        assert_eq!(
            dispatch(parse_line(&format!("mv {}", note.id), &store).unwrap()),
            Intent::MoveNote {
                id: note.id.clone(),
                folder: String::new()
            }
        );
        assert!(parse_line("rm zzzz-not-an-id", &store).is_err());
        assert!(parse_line("rm", &store).is_err());
    }

    #[test]
    fn test_parse_edit_builds_full_patch() {
        let mut store = store();
        let note = store.create_note(NoteDraft::new("T", "C", "Todo", "")).unwrap();
        let intent = dispatch(parse_line(&format!("edit {} | New | Body | Work | Ideas", note.id), &store).unwrap());
        let Intent::UpdateNote { id, patch } = intent else {
            panic!("expected update");
        };
        assert_eq!(id, note.id);
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert_eq!(patch.folder.as_deref(), Some(store.folders()[2].id.as_str()));

        let intent = dispatch(parse_line(&format!("edit {} | New | Body | Work", note.id), &store).unwrap());
        let Intent::UpdateNote { patch, .. } = intent else {
            panic!("expected update");
        };
        assert_eq!(patch.folder, None);
    }

    #[test]
    fn test_parse_sort_theme_and_misc() {
        let store = store();
        assert_eq!(dispatch(parse_line("sort titleDesc", &store).unwrap()), Intent::SetSort(SortKey::TitleDesc));
        assert_eq!(dispatch(parse_line("theme light", &store).unwrap()), Intent::SetTheme { dark: false });
        assert!(parse_line("theme blue", &store).is_err());
        assert_eq!(dispatch(parse_line("find  milk ", &store).unwrap()), Intent::SetQuery("milk".to_string()));
        assert_eq!(dispatch(parse_line("", &store).unwrap()), Intent::Refresh);
        assert_eq!(parse_line("help", &store).unwrap(), Command::Help);
        assert_eq!(parse_line("QUIT", &store).unwrap(), Command::Quit);
        assert!(parse_line("frobnicate", &store).is_err());
    }

    #[test]
    fn test_unknown_or_missing_sort_key_falls_back_to_recency() {
        let store = store();
        assert_eq!(dispatch(parse_line("sort bogus", &store).unwrap()), Intent::SetSort(SortKey::UpdatedDesc));
        assert_eq!(dispatch(parse_line("sort", &store).unwrap()), Intent::SetSort(SortKey::UpdatedDesc));
        assert_eq!(dispatch(parse_line("sort  createdAsc ", &store).unwrap()), Intent::SetSort(SortKey::CreatedAsc));
    }

    #[test]
    fn test_terminal_presenter_output() {
        let mut widget = Widget::new(store(), TerminalPresenter::new(Vec::new()));
        let work = widget.store().folders()[0].id.clone();
        widget
            .dispatch(Intent::CreateNote(NoteDraft::new("Ship it", "line one\nline two", "Work", &work)))
            .unwrap();

        let out = String::from_utf8(widget.presenter().writer().clone()).unwrap();
        assert!(out.contains("(no notes match)"));
        assert!(out.contains("Folders: >All Notes (1) | Work (1) | Personal (0) | Ideas (0)"));
        assert!(out.contains("  Ship it (Work) [Work]  #"));
        assert!(out.contains("      line two"));
    }
}
