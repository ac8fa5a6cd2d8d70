//! Core domain logic for the personal assistant.
//! Contacts and notes, their stores, and snapshot persistence.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use error::{AppError, AppResult, RecordKind};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::contact::ContactRecord;
pub use model::factory::{EmailFactory, FieldFactory, ParsedFields, PhoneFactory};
pub use model::field::{Address, Birthday, Email, FieldError, Name, Phone};
pub use model::note::{NoteId, NoteRecord};
pub use model::unique_list::UniqueList;
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository, ADDRESS_BOOK_SNAPSHOT,
    NOTES_SNAPSHOT,
};
pub use service::contact_service::{
    apply_contact_draft, create_contact, delete_contact, ContactDraft,
};
pub use service::note_service::{apply_note_draft, create_note, delete_note, NoteDraft};
pub use store::address_book::{AddressBook, UpcomingBirthday, DEFAULT_BIRTHDAY_WINDOW_DAYS};
pub use store::notes::NotesStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
