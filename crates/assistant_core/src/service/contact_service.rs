//! Contact use-case service.
//!
//! # Responsibility
//! - Create contacts with all initial fields in one step.
//! - Apply staged multi-field edits only after the caller confirmed them.
//!
//! # Invariants
//! - A draft is applied completely or not at all.
//! - Renames go through `AddressBook::rename` so keys stay in sync.

use crate::error::{AppError, AppResult, RecordKind};
use crate::model::contact::ContactRecord;
use crate::model::field::{normalize_name_key, Address, Birthday, Email, Name, Phone};
use crate::model::unique_list::UniqueList;
use crate::store::address_book::AddressBook;
use log::info;

/// Staged replacement values for one contact.
///
/// `None` leaves a field untouched. For birthday and address the inner
/// `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub phones: Option<UniqueList<Phone>>,
    pub emails: Option<UniqueList<Email>>,
    pub birthday: Option<Option<Birthday>>,
    pub address: Option<Option<Address>>,
}

impl ContactDraft {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the staged fields, in display order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.phones.is_some() {
            fields.push("phones");
        }
        if self.emails.is_some() {
            fields.push("emails");
        }
        if self.birthday.is_some() {
            fields.push("birthday");
        }
        if self.address.is_some() {
            fields.push("address");
        }
        fields
    }

    fn apply_fields(self, record: &mut ContactRecord) {
        if let Some(phones) = self.phones {
            *record.phones_mut() = phones;
        }
        if let Some(emails) = self.emails {
            *record.emails_mut() = emails;
        }
        if let Some(birthday) = self.birthday {
            record.set_birthday(birthday);
        }
        if let Some(address) = self.address {
            record.set_address(address);
        }
    }
}

/// Adds a new contact named `name` with the staged fields of `details`.
///
/// `details.name` is ignored.
///
/// # Errors
/// - `AlreadyExists` when a contact with the same normalized name exists.
pub fn create_contact(
    book: &mut AddressBook,
    name: &str,
    details: ContactDraft,
) -> AppResult<()> {
    let name = Name::new(name);
    if book.contains(name.as_str()) {
        return Err(AppError::already_exists(RecordKind::Contact, name.as_str()));
    }

    let mut record = ContactRecord::new(name.as_str());
    let fields = details.changed_fields().len();
    details.apply_fields(&mut record);
    book.add_record(record);

    info!("event=contact_create module=service status=ok fields={fields}");
    Ok(())
}

/// Applies a confirmed draft to the contact currently named `name`.
///
/// # Errors
/// - `NotFound` when there is no such contact.
/// - `AlreadyExists` when the staged name belongs to another contact.
pub fn apply_contact_draft(
    book: &mut AddressBook,
    name: &str,
    draft: ContactDraft,
) -> AppResult<()> {
    if !book.contains(name) {
        return Err(AppError::not_found(RecordKind::Contact, name.trim()));
    }

    let fields = draft.changed_fields().len();
    let mut target = normalize_name_key(name);
    if let Some(new_name) = draft.name.as_deref() {
        book.rename(name, new_name)?;
        target = normalize_name_key(new_name);
    }

    let record = book
        .get_mut(&target)
        .ok_or_else(|| AppError::not_found(RecordKind::Contact, target.clone()))?;
    draft.apply_fields(record);

    info!("event=contact_edit module=service status=ok fields={fields}");
    Ok(())
}

/// Deletes a contact by name.
///
/// # Errors
/// - `NotFound` when there is no such contact.
pub fn delete_contact(book: &mut AddressBook, name: &str) -> AppResult<ContactRecord> {
    let removed = book
        .delete(name)
        .ok_or_else(|| AppError::not_found(RecordKind::Contact, name.trim()))?;
    info!("event=contact_delete module=service status=ok");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::{apply_contact_draft, create_contact, ContactDraft};
    use crate::error::AppError;
    use crate::model::factory::{FieldFactory, PhoneFactory};
    use crate::model::field::Birthday;
    use crate::store::address_book::AddressBook;

    #[test]
    fn empty_draft_reports_no_changes() {
        assert!(ContactDraft::default().is_empty());
    }

    #[test]
    fn create_rejects_existing_name() {
        let mut book = AddressBook::new();
        create_contact(&mut book, "Ann", ContactDraft::default()).unwrap();
        let err = create_contact(&mut book, " ANN ", ContactDraft::default()).unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { .. }));
    }

    #[test]
    fn draft_applies_rename_and_fields_together() {
        let mut book = AddressBook::new();
        create_contact(&mut book, "Ann", ContactDraft::default()).unwrap();

        let draft = ContactDraft {
            name: Some("Anna Lee".to_string()),
            phones: Some(PhoneFactory::create("11111111").items.into_iter().collect()),
            birthday: Some(Some(Birthday::parse("01.01.1990").unwrap())),
            ..ContactDraft::default()
        };
        apply_contact_draft(&mut book, "ann", draft).unwrap();

        assert!(book.get("ann").is_none());
        let record = book.get("anna lee").unwrap();
        assert_eq!(record.phones().len(), 1);
        assert_eq!(record.birthday_text(), "01.01.1990");
    }

    #[test]
    fn failed_rename_leaves_record_untouched() {
        let mut book = AddressBook::new();
        create_contact(&mut book, "Ann", ContactDraft::default()).unwrap();
        create_contact(&mut book, "Bob", ContactDraft::default()).unwrap();

        let draft = ContactDraft {
            name: Some("bob".to_string()),
            birthday: Some(Some(Birthday::parse("01.01.1990").unwrap())),
            ..ContactDraft::default()
        };
        let err = apply_contact_draft(&mut book, "Ann", draft).unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { .. }));
        assert_eq!(book.get("ann").unwrap().birthday_text(), "");
    }
}
