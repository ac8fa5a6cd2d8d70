//! Address book contact record.
//!
//! # Invariants
//! - `name` changes only through `AddressBook::rename`, which re-keys the store.
//! - Phone and email lists never contain duplicates.

use crate::model::field::{normalize_name_key, Address, Birthday, Email, Name, Phone};
use crate::model::unique_list::UniqueList;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    name: Name,
    #[serde(default)]
    phones: UniqueList<Phone>,
    #[serde(default)]
    emails: UniqueList<Email>,
    #[serde(default)]
    birthday: Option<Birthday>,
    #[serde(default)]
    address: Option<Address>,
}

impl ContactRecord {
    /// Creates a record with only a name set.
    pub fn new(name: &str) -> Self {
        Self {
            name: Name::new(name),
            phones: UniqueList::new(),
            emails: UniqueList::new(),
            birthday: None,
            address: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    /// Store key for this record.
    pub fn key(&self) -> String {
        self.name.key()
    }

    pub fn phones(&self) -> &UniqueList<Phone> {
        &self.phones
    }

    pub fn phones_mut(&mut self) -> &mut UniqueList<Phone> {
        &mut self.phones
    }

    pub fn emails(&self) -> &UniqueList<Email> {
        &self.emails
    }

    pub fn emails_mut(&mut self) -> &mut UniqueList<Email> {
        &mut self.emails
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    pub fn set_birthday(&mut self, birthday: Option<Birthday>) {
        self.birthday = birthday;
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn set_address(&mut self, address: Option<Address>) {
        self.address = address;
    }

    /// Birthday as `DD.MM.YYYY`, or empty when unset.
    pub fn birthday_text(&self) -> String {
        self.birthday
            .map(|birthday| birthday.to_string())
            .unwrap_or_default()
    }

    /// Address text, or empty when unset.
    pub fn address_text(&self) -> &str {
        self.address.as_ref().map_or("", Address::as_str)
    }

    /// Substring match of an already-lowercased needle against name, phones,
    /// emails and address.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        normalize_name_key(self.name.as_str()).contains(needle)
            || self.phones.to_string().contains(needle)
            || self.emails.to_string().contains(needle)
            || self.address_text().to_lowercase().contains(needle)
    }
}

impl Display for ContactRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Name: {}, birthday: {}, phones: {}, emails: {}, address: {}",
            self.name,
            self.birthday_text(),
            self.phones,
            self.emails,
            self.address_text()
        )
    }
}
