//! Top-level menu that routes into the book and notes modules.

use super::{book, notes, run_module, CommandSpec, Flow, Handler};
use crate::console::Prompt;
use crate::render;
use crate::session::Session;
use assistant_core::AppResult;

pub const LABEL: &str = "Command";

pub static MENU_COMMANDS: &[CommandSpec<Handler<Session>>] = &[
    CommandSpec {
        names: &["book"],
        usage: "",
        description: "open the address book",
        handler: open_book,
    },
    CommandSpec {
        names: &["notes"],
        usage: "",
        description: "open the notes",
        handler: open_notes,
    },
    CommandSpec {
        names: &["hello"],
        usage: "",
        description: "greeting",
        handler: hello,
    },
    CommandSpec {
        names: &["help", "?"],
        usage: "",
        description: "this help",
        handler: help,
    },
    CommandSpec {
        names: &["close", "exit", "quit"],
        usage: "",
        description: "exit",
        handler: exit,
    },
];

/// Runs the main menu until the user exits or input ends.
pub fn run(session: &mut Session, prompt: &mut dyn Prompt) {
    prompt.print("Welcome to the assistant bot! Type '?' for help.");
    run_module(session, prompt, LABEL, MENU_COMMANDS, &nothing_to_save);
}

fn nothing_to_save(_: &Session) -> AppResult<()> {
    Ok(())
}

fn open_book(session: &mut Session, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    book::enter(&session.conn, prompt)
}

fn open_notes(session: &mut Session, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    notes::enter(&session.conn, prompt)
}

fn hello(_: &mut Session, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    prompt.print("How can I help you?");
    Ok(Flow::Continue)
}

fn help(_: &mut Session, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    prompt.print(&render::help_table("Main menu commands", MENU_COMMANDS));
    Ok(Flow::Continue)
}

fn exit(_: &mut Session, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    Ok(Flow::Exit)
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::console::tests::{output, scripted};
    use crate::session::Session;
    use assistant_core::{
        AddressBook, SnapshotRepository, SqliteSnapshotRepository, ADDRESS_BOOK_SNAPSHOT,
    };

    #[test]
    fn book_module_state_is_saved_on_back() {
        let mut session = Session::in_memory();
        let mut console = scripted(&[
            "book", "add Jane", "", "", "", "", "back", "hello", "exit",
        ]);
        run(&mut session, &mut console);

        let repo = SqliteSnapshotRepository::try_new(&session.conn).unwrap();
        let book: AddressBook = repo.load(ADDRESS_BOOK_SNAPSHOT).unwrap().unwrap();
        assert!(book.contains("jane"));
        assert!(output(console).contains("How can I help you?"));
    }

    #[test]
    fn exit_inside_module_ends_the_session() {
        let mut session = Session::in_memory();
        let mut console = scripted(&["notes", "exit", "hello"]);
        run(&mut session, &mut console);
        assert!(!output(console).contains("How can I help you?"));
    }
}
