use assistant_core::db::{open_db, open_db_in_memory};
use assistant_core::{
    AddressBook, Birthday, ContactRecord, Email, NoteRecord, NotesStore, Phone, RepoError,
    SnapshotRepository, SqliteSnapshotRepository, ADDRESS_BOOK_SNAPSHOT, NOTES_SNAPSHOT,
};
use rusqlite::Connection;

fn sample_book() -> AddressBook {
    let mut record = ContactRecord::new("john doe");
    record.phones_mut().push(Phone::parse("22222222").unwrap());
    record.phones_mut().push(Phone::parse("11111111").unwrap());
    record
        .emails_mut()
        .push(Email::parse("John@Example.com").unwrap());
    record.set_birthday(Some(Birthday::parse("29.02.2000").unwrap()));

    let mut book = AddressBook::new();
    book.add_record(record);
    book.add_record(ContactRecord::new("Ann"));
    book
}

#[test]
fn missing_snapshot_loads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    let loaded: Option<AddressBook> = repo.load(ADDRESS_BOOK_SNAPSHOT).unwrap();
    assert!(loaded.is_none());
    let fresh: NotesStore = repo.load_or_default(NOTES_SNAPSHOT).unwrap();
    assert!(fresh.is_empty());
}

#[test]
fn address_book_survives_save_and_load() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let book = sample_book();

    repo.save(ADDRESS_BOOK_SNAPSHOT, &book).unwrap();
    let loaded: AddressBook = repo.load(ADDRESS_BOOK_SNAPSHOT).unwrap().unwrap();

    assert_eq!(loaded, book);
    let record = loaded.get("JOHN DOE").unwrap();
    assert_eq!(record.phones().to_string(), "22222222; 11111111");
    assert_eq!(record.emails().to_string(), "john@example.com");
    assert_eq!(record.birthday_text(), "29.02.2000");
    let order: Vec<_> = loaded.iter().map(|r| r.name().to_string()).collect();
    assert_eq!(order, ["John Doe", "Ann"]);
}

#[test]
fn notes_survive_save_and_load_with_tags_rebuilt() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let mut notes = NotesStore::new();
    let note = NoteRecord::new("Plan", "ship #release then #Party");
    let id = note.id().clone();
    notes.add(note).unwrap();

    repo.save(NOTES_SNAPSHOT, &notes).unwrap();
    let json: String = conn
        .query_row(
            "SELECT payload FROM snapshots WHERE name = ?1;",
            [NOTES_SNAPSHOT],
            |row| row.get(0),
        )
        .unwrap();
    let wire: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(wire[0].get("tags").is_none());

    let loaded: NotesStore = repo.load(NOTES_SNAPSHOT).unwrap().unwrap();
    let restored = loaded.get(id.as_str()).unwrap();
    assert!(restored.tags().contains("release"));
    assert!(restored.tags().contains("Party"));
}

#[test]
fn save_replaces_previous_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    repo.save(ADDRESS_BOOK_SNAPSHOT, &sample_book()).unwrap();
    repo.save(ADDRESS_BOOK_SNAPSHOT, &AddressBook::new())
        .unwrap();

    let loaded: AddressBook = repo.load(ADDRESS_BOOK_SNAPSHOT).unwrap().unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn invalid_field_in_payload_fails_to_decode() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO snapshots (name, payload, saved_at) VALUES (?1, ?2, 0);",
        [
            ADDRESS_BOOK_SNAPSHOT,
            r#"[{"name":"Bad","phones":["123"],"emails":[],"birthday":null,"address":null}]"#,
        ],
    )
    .unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();

    let err = repo.load::<AddressBook>(ADDRESS_BOOK_SNAPSHOT).unwrap_err();
    assert!(matches!(err, RepoError::Decode { .. }));
    assert!(err.to_string().contains("Wrong phone number format '123'."));
}

#[test]
fn snapshots_persist_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assistant.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
        repo.save(ADDRESS_BOOK_SNAPSHOT, &sample_book()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteSnapshotRepository::try_new(&conn).unwrap();
    let loaded: AddressBook = repo.load(ADDRESS_BOOK_SNAPSHOT).unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteSnapshotRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("snapshots")));
}
