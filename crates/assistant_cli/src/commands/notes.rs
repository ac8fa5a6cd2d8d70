//! Notes module.
//!
//! # Invariants
//! - Note text is read as multiline input; tags are taken from it by the core.
//! - Edits are applied only after confirmation.
//! - Answering `-` to the text prompt of `edit` empties the text.
//! - The store is saved after every change and again on the way out.

use super::{required, run_module, CommandSpec, Flow, Handler, CLEAR};
use crate::console::Prompt;
use crate::render;
use assistant_core::{
    apply_note_draft, create_note, delete_note, AppError, AppResult, NoteDraft, NotesStore,
    RecordKind, SnapshotRepository, SqliteSnapshotRepository, NOTES_SNAPSHOT,
};
use colored::Colorize;
use log::info;
use rusqlite::Connection;

pub const LABEL: &str = "Notes command";

pub struct NotesState {
    pub notes: NotesStore,
}

pub static NOTES_COMMANDS: &[CommandSpec<Handler<NotesState>>] = &[
    CommandSpec {
        names: &["add"],
        usage: "[title]",
        description: "add a note",
        handler: add,
    },
    CommandSpec {
        names: &["search"],
        usage: "[tags]",
        description: "search notes by tags, best matches first",
        handler: search,
    },
    CommandSpec {
        names: &["edit"],
        usage: "[id]",
        description: "edit a note",
        handler: edit,
    },
    CommandSpec {
        names: &["delete"],
        usage: "[id]",
        description: "delete a note",
        handler: delete,
    },
    CommandSpec {
        names: &["all"],
        usage: "",
        description: "show all notes",
        handler: all,
    },
    CommandSpec {
        names: &["help", "?"],
        usage: "",
        description: "this help",
        handler: help,
    },
    CommandSpec {
        names: &["back"],
        usage: "",
        description: "back to the main menu",
        handler: back,
    },
    CommandSpec {
        names: &["close", "exit", "quit"],
        usage: "",
        description: "exit",
        handler: exit,
    },
];

/// Runs the notes module against the snapshot store in `conn`.
pub fn enter(conn: &Connection, prompt: &mut dyn Prompt) -> AppResult<Flow> {
    let repo = SqliteSnapshotRepository::try_new(conn)?;
    let notes: NotesStore = repo.load_or_default(NOTES_SNAPSHOT)?;
    let greeting = format!("Notes contain {} records.", notes.len());
    prompt.print(&greeting.cyan().to_string());

    let mut state = NotesState { notes };
    let persist = |state: &NotesState| -> AppResult<()> {
        repo.save(NOTES_SNAPSHOT, &state.notes)?;
        Ok(())
    };
    let flow = run_module(&mut state, prompt, LABEL, NOTES_COMMANDS, &persist);

    persist(&state)?;
    info!(
        "event=notes_module module=cli status=ok notes={}",
        state.notes.len()
    );
    Ok(match flow {
        Flow::Exit => Flow::Exit,
        Flow::Back | Flow::Continue | Flow::Changed => Flow::Continue,
    })
}

fn add(state: &mut NotesState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let title = required(prompt, "Title", args)?;
    let text = prompt.prompt_multiline("Text", "")?;
    let id = create_note(&mut state.notes, title, text)?;
    prompt.print(&format!("Note added with id {id}.").green().to_string());
    Ok(Flow::Changed)
}

fn search(state: &mut NotesState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let criteria = required(prompt, "Tags", args)?;
    let criteria = criteria
        .split_whitespace()
        .map(|word| word.trim_matches('#'))
        .collect::<Vec<_>>()
        .join(" ");

    let found = state.notes.find(&criteria);
    if found.is_empty() {
        prompt.print("No notes found.");
    } else {
        let caption = format!("Found {} note(s)", found.len());
        prompt.print(&render::notes_table(&caption, &found));
    }
    Ok(Flow::Continue)
}

fn edit(state: &mut NotesState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let id = required(prompt, "Id", args)?;
    let note = state
        .notes
        .get(&id)
        .ok_or_else(|| AppError::not_found(RecordKind::Note, id.trim()))?;

    let mut draft = NoteDraft::default();
    let title = prompt.prompt("Title", note.title())?;
    if title != note.title() {
        draft.title = Some(title);
    }
    let mut text = prompt.prompt_multiline("Text", note.text())?;
    if text.trim() == CLEAR {
        text.clear();
    }
    if text != note.text() {
        draft.text = Some(text);
    }

    if draft.is_empty() {
        prompt.print("Nothing to change.");
        return Ok(Flow::Continue);
    }
    if !prompt.confirm("Apply changes?")? {
        prompt.print("Changes discarded.");
        return Ok(Flow::Continue);
    }

    apply_note_draft(&mut state.notes, &id, draft)?;
    prompt.print(&"Note updated.".green().to_string());
    Ok(Flow::Changed)
}

fn delete(state: &mut NotesState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let id = required(prompt, "Id", args)?;
    let Some(note) = state.notes.get(&id) else {
        return Err(AppError::not_found(RecordKind::Note, id.trim()));
    };

    if !prompt.confirm(&format!("Delete note '{}'?", note.title()))? {
        prompt.print("Note kept.");
        return Ok(Flow::Continue);
    }

    let removed = delete_note(&mut state.notes, &id)?;
    prompt.print(&format!("Note '{}' deleted.", removed.title()).green().to_string());
    Ok(Flow::Changed)
}

fn all(state: &mut NotesState, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    if state.notes.is_empty() {
        prompt.print("No notes yet.");
        return Ok(Flow::Continue);
    }
    let notes: Vec<_> = state.notes.iter().collect();
    prompt.print(&render::notes_table("All notes", &notes));
    Ok(Flow::Continue)
}

fn help(_: &mut NotesState, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    prompt.print(&render::help_table("Notes commands", NOTES_COMMANDS));
    Ok(Flow::Continue)
}

fn back(_: &mut NotesState, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    Ok(Flow::Back)
}

fn exit(_: &mut NotesState, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    Ok(Flow::Exit)
}

#[cfg(test)]
mod tests {
    use super::{enter, run_module, NotesState, LABEL, NOTES_COMMANDS};
    use crate::commands::Flow;
    use crate::console::tests::{output, scripted};
    use assistant_core::db::open_db_in_memory;
    use assistant_core::{
        AppResult, NoteId, NoteRecord, NotesStore, SnapshotRepository, SqliteSnapshotRepository,
        NOTES_SNAPSHOT,
    };

    fn keep(_: &NotesState) -> AppResult<()> {
        Ok(())
    }

    fn state_with(notes: &[(&str, &str, &str)]) -> NotesState {
        let mut store = NotesStore::new();
        for (id, title, text) in notes {
            store
                .add(NoteRecord::with_id(NoteId::parse(id), *title, *text))
                .unwrap();
        }
        NotesState { notes: store }
    }

    #[test]
    fn add_reads_multiline_text_and_extracts_tags() {
        let mut state = state_with(&[]);
        let mut console = scripted(&["add Plans", "buy #milk", "call #Mom", ".", "back"]);
        run_module(&mut state, &mut console, LABEL, NOTES_COMMANDS, &keep);

        let note = state.notes.iter().next().unwrap();
        assert_eq!(note.title(), "Plans");
        assert_eq!(note.text(), "buy #milk\ncall #Mom");
        assert!(note.tags().contains("Mom"));
        assert!(output(console).contains(&format!("Note added with id {}.", note.id())));
    }

    #[test]
    fn search_accepts_hash_prefixed_tags_and_ranks_by_overlap() {
        let mut state = state_with(&[
            ("n1", "Single", "#tag1"),
            ("n2", "Double", "#tag1 #tag2"),
            ("n3", "Other", "#tag3"),
        ]);
        let mut console = scripted(&["search #TAG1 tag2", "search nothing", "back"]);
        run_module(&mut state, &mut console, LABEL, NOTES_COMMANDS, &keep);

        let printed = output(console);
        let double = printed.find("Double").unwrap();
        let single = printed.find("Single").unwrap();
        assert!(double < single);
        assert!(!printed.contains("Other"));
        assert!(printed.contains("No notes found."));
    }

    #[test]
    fn edit_keeps_defaults_and_recomputes_tags() {
        let mut state = state_with(&[("n1", "Title", "old #a")]);
        let mut console = scripted(&["edit n1", "", "new #b", ".", "y", "back"]);
        run_module(&mut state, &mut console, LABEL, NOTES_COMMANDS, &keep);

        let note = state.notes.get("N1").unwrap();
        assert_eq!(note.title(), "Title");
        assert_eq!(note.text(), "new #b");
        assert!(note.tags().contains("b"));
        assert!(!note.tags().contains("a"));
    }

    #[test]
    fn edit_dash_empties_text_and_tags() {
        let mut state = state_with(&[("n1", "Title", "old #a")]);
        let mut console = scripted(&["edit n1", "", "-", ".", "y", "back"]);
        run_module(&mut state, &mut console, LABEL, NOTES_COMMANDS, &keep);

        let note = state.notes.get("n1").unwrap();
        assert_eq!(note.text(), "");
        assert!(note.tags().is_empty());
    }

    #[test]
    fn end_of_input_at_command_prompt_keeps_added_note() {
        let conn = open_db_in_memory().unwrap();
        let mut console = scripted(&["add Plan", "#todo", "."]);
        assert_eq!(enter(&conn, &mut console).unwrap(), Flow::Exit);

        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        let notes: NotesStore = repo.load(NOTES_SNAPSHOT).unwrap().unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn edit_without_changes_skips_confirmation() {
        let mut state = state_with(&[("n1", "Title", "old #a")]);
        let mut console = scripted(&["edit n1", "", ".", "back"]);
        run_module(&mut state, &mut console, LABEL, NOTES_COMMANDS, &keep);
        assert!(output(console).contains("Nothing to change."));
    }

    #[test]
    fn delete_unknown_note_reports_not_found() {
        let mut state = state_with(&[("n1", "Title", "")]);
        let mut console = scripted(&["delete zz", "delete n1", "y", "all", "back"]);
        run_module(&mut state, &mut console, LABEL, NOTES_COMMANDS, &keep);

        assert!(state.notes.is_empty());
        let printed = output(console);
        assert!(printed.contains("Note 'zz' not found."));
        assert!(printed.contains("Note 'Title' deleted."));
        assert!(printed.contains("No notes yet."));
    }
}
