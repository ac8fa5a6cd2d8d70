//! Address book module.
//!
//! # Responsibility
//! - Load the address book snapshot on entry.
//! - Save it after every change and again on the way out.
//! - Collect contact fields interactively and hand them to the contact service.
//!
//! # Invariants
//! - Edits are staged in a `ContactDraft` and applied only after confirmation.
//! - A cancelled prompt leaves the book untouched.
//! - `-` clears a list, the birthday or the address.

use super::{required, run_module, CommandSpec, Flow, Handler, CLEAR};
use crate::console::Prompt;
use crate::render;
use assistant_core::{
    apply_contact_draft, create_contact, delete_contact, Address, AddressBook, AppError,
    AppResult, Birthday, ContactDraft, ContactRecord, EmailFactory, FieldFactory, Name,
    PhoneFactory, RecordKind, SnapshotRepository, SqliteSnapshotRepository, UniqueList,
    ADDRESS_BOOK_SNAPSHOT, DEFAULT_BIRTHDAY_WINDOW_DAYS,
};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use log::info;
use rusqlite::Connection;
use std::fmt::Display;

pub const LABEL: &str = "Book command";

pub struct BookState {
    pub book: AddressBook,
    /// Date source for the birthday query.
    pub today: fn() -> NaiveDate,
}

impl BookState {
    pub fn new(book: AddressBook) -> Self {
        Self {
            book,
            today: local_today,
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub static BOOK_COMMANDS: &[CommandSpec<Handler<BookState>>] = &[
    CommandSpec {
        names: &["add"],
        usage: "[name]",
        description: "add a contact",
        handler: add,
    },
    CommandSpec {
        names: &["search"],
        usage: "[text]",
        description: "search contacts by any field",
        handler: search,
    },
    CommandSpec {
        names: &["edit"],
        usage: "[name]",
        description: "edit a contact",
        handler: edit,
    },
    CommandSpec {
        names: &["delete"],
        usage: "[name]",
        description: "delete a contact",
        handler: delete,
    },
    CommandSpec {
        names: &["birthdays", "bds"],
        usage: "[days]",
        description: "birthdays in the next days (7 by default)",
        handler: birthdays,
    },
    CommandSpec {
        names: &["all"],
        usage: "",
        description: "show all contacts",
        handler: all,
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

/// Runs the address book module against the snapshot store in `conn`.
///
/// Returns `Flow::Exit` when the user asked to leave the program and
/// `Flow::Continue` when they went back to the main menu.
pub fn enter(conn: &Connection, prompt: &mut dyn Prompt) -> AppResult<Flow> {
    let repo = SqliteSnapshotRepository::try_new(conn)?;
    let book: AddressBook = repo.load_or_default(ADDRESS_BOOK_SNAPSHOT)?;
    let greeting = format!("Address book contains {} contacts.", book.len());
    prompt.print(&greeting.cyan().to_string());

    let mut state = BookState::new(book);
    let persist = |state: &BookState| -> AppResult<()> {
        repo.save(ADDRESS_BOOK_SNAPSHOT, &state.book)?;
        Ok(())
    };
    let flow = run_module(&mut state, prompt, LABEL, BOOK_COMMANDS, &persist);

    persist(&state)?;
    info!(
        "event=book_module module=cli status=ok contacts={}",
        state.book.len()
    );
    Ok(match flow {
        Flow::Exit => Flow::Exit,
        Flow::Back | Flow::Continue | Flow::Changed => Flow::Continue,
    })
}

fn add(state: &mut BookState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let name = required(prompt, "Name", args)?;
    let name = Name::new(&name);
    if state.book.contains(name.as_str()) {
        return Err(AppError::already_exists(RecordKind::Contact, name.as_str()));
    }

    let mut details = ContactDraft::default();
    let phones = read_list::<PhoneFactory>(prompt, "Phones", "")?;
    if !phones.is_empty() {
        details.phones = Some(phones);
    }
    let emails = read_list::<EmailFactory>(prompt, "Emails", "")?;
    if !emails.is_empty() {
        details.emails = Some(emails);
    }
    if let Some(birthday) = read_birthday(prompt, "")? {
        details.birthday = Some(Some(birthday));
    }
    if let Some(address) = read_address(prompt, "")? {
        details.address = Some(Some(address));
    }

    create_contact(&mut state.book, name.as_str(), details)?;
    prompt.print(&format!("Contact '{name}' added.").green().to_string());
    Ok(Flow::Changed)
}

fn search(state: &mut BookState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let criteria = required(prompt, "Search", args)?;
    let found = state.book.find(&criteria);
    if found.is_empty() {
        prompt.print("No contacts found.");
    } else {
        let caption = format!("Found {} contact(s)", found.len());
        prompt.print(&render::contacts_table(&caption, &found));
    }
    Ok(Flow::Continue)
}

fn edit(state: &mut BookState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let target = required(prompt, "Name", args)?;
    let record = state
        .book
        .get(&target)
        .ok_or_else(|| AppError::not_found(RecordKind::Contact, target.trim()))?;

    let draft = stage_edit(record, prompt)?;
    if draft.is_empty() {
        prompt.print("Nothing to change.");
        return Ok(Flow::Continue);
    }

    prompt.print(&format!("Changed: {}", draft.changed_fields().join(", ")));
    if !prompt.confirm("Apply changes?")? {
        prompt.print("Changes discarded.");
        return Ok(Flow::Continue);
    }

    apply_contact_draft(&mut state.book, &target, draft)?;
    prompt.print(&"Contact updated.".green().to_string());
    Ok(Flow::Changed)
}

/// Prompts for every field with the current value as default and keeps only
/// the fields that actually differ.
fn stage_edit(record: &ContactRecord, prompt: &mut dyn Prompt) -> AppResult<ContactDraft> {
    let mut draft = ContactDraft::default();

    let name = prompt.prompt("Name", record.name().as_str())?;
    if Name::new(&name) != *record.name() {
        draft.name = Some(name);
    }

    let phones = read_list::<PhoneFactory>(prompt, "Phones", &list_text(record.phones()))?;
    if &phones != record.phones() {
        draft.phones = Some(phones);
    }

    let emails = read_list::<EmailFactory>(prompt, "Emails", &list_text(record.emails()))?;
    if &emails != record.emails() {
        draft.emails = Some(emails);
    }

    let birthday = read_birthday(prompt, &record.birthday_text())?;
    if birthday.as_ref() != record.birthday() {
        draft.birthday = Some(birthday);
    }

    let address = read_address(prompt, record.address_text())?;
    if address.as_ref() != record.address() {
        draft.address = Some(address);
    }

    Ok(draft)
}

fn delete(state: &mut BookState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let target = required(prompt, "Name", args)?;
    let Some(record) = state.book.get(&target) else {
        return Err(AppError::not_found(RecordKind::Contact, target.trim()));
    };

    let question = format!("Delete contact '{}'?", record.name());
    if !prompt.confirm(&question)? {
        prompt.print("Contact kept.");
        return Ok(Flow::Continue);
    }

    let removed = delete_contact(&mut state.book, &target)?;
    prompt.print(&format!("Contact '{}' deleted.", removed.name()).green().to_string());
    Ok(Flow::Changed)
}

fn birthdays(state: &mut BookState, prompt: &mut dyn Prompt, args: &str) -> AppResult<Flow> {
    let days = match args.split_whitespace().next() {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or_else(|| AppError::InvalidInput(format!("Wrong number of days '{raw}'.")))?,
        None => DEFAULT_BIRTHDAY_WINDOW_DAYS,
    };

    let today = (state.today)();
    let entries = state.book.upcoming_birthday_entries(today, days);
    if entries.is_empty() {
        prompt.print(&format!("No birthdays in the next {days} days."));
    } else {
        let caption = format!("Birthdays in the next {days} days");
        prompt.print(&render::birthdays_table(&caption, &entries));
    }
    Ok(Flow::Continue)
}

fn all(state: &mut BookState, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    if state.book.is_empty() {
        prompt.print("Address book is empty.");
        return Ok(Flow::Continue);
    }
    let records: Vec<_> = state.book.iter().collect();
    prompt.print(&render::contacts_table("All contacts", &records));
    Ok(Flow::Continue)
}

fn hello(_: &mut BookState, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    prompt.print("How can I help you?");
    Ok(Flow::Continue)
}

fn help(_: &mut BookState, prompt: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    prompt.print(&render::help_table("Address book commands", BOOK_COMMANDS));
    Ok(Flow::Continue)
}

fn back(_: &mut BookState, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    Ok(Flow::Back)
}

fn exit(_: &mut BookState, _: &mut dyn Prompt, _: &str) -> AppResult<Flow> {
    Ok(Flow::Exit)
}

/// Reads a delimited list until every item is valid.
fn read_list<F>(
    prompt: &mut dyn Prompt,
    label: &str,
    default: &str,
) -> AppResult<UniqueList<F::Field>>
where
    F: FieldFactory,
    F::Field: PartialEq,
{
    loop {
        let line = prompt.prompt(label, default)?;
        if line == CLEAR {
            return Ok(UniqueList::new());
        }
        let parsed = F::create(&line);
        if !parsed.has_errors() {
            return Ok(parsed.items.into_iter().collect());
        }
        for error in &parsed.errors {
            prompt.print(&error.red().to_string());
        }
    }
}

fn read_birthday(prompt: &mut dyn Prompt, default: &str) -> AppResult<Option<Birthday>> {
    loop {
        let line = prompt.prompt("Birthday (DD.MM.YYYY)", default)?;
        if line.is_empty() || line == CLEAR {
            return Ok(None);
        }
        match Birthday::parse(&line) {
            Ok(birthday) => return Ok(Some(birthday)),
            Err(err) => prompt.print(&err.to_string().red().to_string()),
        }
    }
}

fn read_address(prompt: &mut dyn Prompt, default: &str) -> AppResult<Option<Address>> {
    let line = prompt.prompt("Address", default)?;
    if line.is_empty() || line == CLEAR {
        return Ok(None);
    }
    Ok(Some(Address::new(&line)))
}

fn list_text<T: Display>(list: &UniqueList<T>) -> String {
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
