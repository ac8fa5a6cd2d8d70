//! Address book store keyed by normalized contact name.
//!
//! # Responsibility
//! - Hold contact records under `name.trim().to_lowercase()` keys.
//! - Provide substring search and the upcoming-birthday query.
//!
//! # Invariants
//! - A record's key always equals `record.key()`; there is no raw keyed write.
//! - Upcoming birthdays never roll over into the next year.
//! - The weekend roll-forward is applied after the window check, so an
//!   effective date may fall past the window end.

use crate::error::{AppError, AppResult, RecordKind};
use crate::model::contact::ContactRecord;
use crate::model::field::{normalize_name_key, Name};
use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default window for [`AddressBook::upcoming_birthdays`].
pub const DEFAULT_BIRTHDAY_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ContactRecord>", into = "Vec<ContactRecord>")]
pub struct AddressBook {
    records: IndexMap<String, ContactRecord>,
}

/// One ranked upcoming-birthday match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingBirthday<'a> {
    pub record: &'a ContactRecord,
    /// Birthday projected onto the current year.
    pub birthday_date: NaiveDate,
    /// `birthday_date`, moved to Monday when it falls on a weekend.
    pub congratulation_date: NaiveDate,
    /// Days from today until `congratulation_date`.
    pub days_until: i64,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` under its own normalized name, replacing any record
    /// with the same key. Returns the replaced record.
    pub fn add_record(&mut self, record: ContactRecord) -> Option<ContactRecord> {
        self.records.insert(record.key(), record)
    }

    pub fn get(&self, name: &str) -> Option<&ContactRecord> {
        self.records.get(&normalize_name_key(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ContactRecord> {
        self.records.get_mut(&normalize_name_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(&normalize_name_key(name))
    }

    /// Removes a record by name. Absent names are ignored.
    pub fn delete(&mut self, name: &str) -> Option<ContactRecord> {
        self.records.shift_remove(&normalize_name_key(name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactRecord> {
        self.records.values()
    }

    /// Case-insensitive substring search over name, phones, emails and
    /// address. `criteria` is used as given, whitespace included. Results
    /// keep insertion order.
    pub fn find(&self, criteria: &str) -> Vec<&ContactRecord> {
        let needle = criteria.to_lowercase();
        self.records
            .values()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    /// Renames a contact and moves it to the new key, keeping its position.
    ///
    /// # Errors
    /// - `NotFound` when `current` is not in the book.
    /// - `AlreadyExists` when another record already owns the new key.
    pub fn rename(&mut self, current: &str, new_name: &str) -> AppResult<()> {
        let current_key = normalize_name_key(current);
        let Some(index) = self.records.get_index_of(&current_key) else {
            return Err(AppError::not_found(RecordKind::Contact, current.trim()));
        };

        let name = Name::new(new_name);
        let new_key = name.key();
        if new_key != current_key && self.records.contains_key(&new_key) {
            return Err(AppError::already_exists(RecordKind::Contact, name.as_str()));
        }

        let Some((_, mut record)) = self.records.shift_remove_index(index) else {
            return Err(AppError::not_found(RecordKind::Contact, current.trim()));
        };
        record.set_name(name);
        self.records.shift_insert(index, new_key, record);
        Ok(())
    }

    /// Contacts whose birthday falls within the next `days` days from the
    /// local current date.
    pub fn upcoming_birthdays(&self, days: u32) -> Vec<&ContactRecord> {
        self.upcoming_birthdays_from(Local::now().date_naive(), days)
    }

    /// Same as [`Self::upcoming_birthdays`] with an explicit `today`.
    pub fn upcoming_birthdays_from(&self, today: NaiveDate, days: u32) -> Vec<&ContactRecord> {
        self.upcoming_birthday_entries(today, days)
            .into_iter()
            .map(|entry| entry.record)
            .collect()
    }

    /// Ranked matches with their effective dates.
    ///
    /// Window is `[today, today + days - 1]`. Ordering is by `days_until`,
    /// then by name.
    pub fn upcoming_birthday_entries(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Vec<UpcomingBirthday<'_>> {
        let Some(end_date) = days
            .checked_sub(1)
            .and_then(|span| today.checked_add_days(Days::new(u64::from(span))))
        else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for record in self.records.values() {
            let Some(birthday) = record.birthday() else {
                continue;
            };
            let Some(birthday_date) = birthday.in_year(today.year()) else {
                continue;
            };
            if birthday_date < today || birthday_date > end_date {
                continue;
            }

            let congratulation_date = roll_past_weekend(birthday_date);
            entries.push(UpcomingBirthday {
                record,
                birthday_date,
                congratulation_date,
                days_until: (congratulation_date - today).num_days(),
            });
        }

        entries.sort_by(|left, right| {
            left.days_until
                .cmp(&right.days_until)
                .then_with(|| left.record.name().as_str().cmp(right.record.name().as_str()))
        });
        entries
    }
}

fn roll_past_weekend(date: NaiveDate) -> NaiveDate {
    let shift = match date.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(shift)).unwrap_or(date)
}

impl From<Vec<ContactRecord>> for AddressBook {
    fn from(value: Vec<ContactRecord>) -> Self {
        let mut book = Self::new();
        for record in value {
            book.add_record(record);
        }
        book
    }
}

impl From<AddressBook> for Vec<ContactRecord> {
    fn from(value: AddressBook) -> Self {
        value.records.into_values().collect()
    }
}
