//! Notes store keyed by upper-cased note id.
//!
//! # Responsibility
//! - Hold note records and reject duplicate ids.
//! - Rank notes by tag overlap with a search query.
//!
//! # Invariants
//! - Keys equal `normalize_note_key(note.id())`.
//! - Search ordering is deterministic: overlap size (desc), overlapping tags
//!   (asc), title case-insensitive (asc), then insertion order.

use crate::error::{AppError, AppResult, RecordKind};
use crate::model::note::{normalize_note_key, NoteRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NoteRecord>", into = "Vec<NoteRecord>")]
pub struct NotesStore {
    notes: IndexMap<String, NoteRecord>,
}

impl NotesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a note under its own id.
    ///
    /// # Errors
    /// - `AlreadyExists` when a note with the same id is present.
    pub fn add(&mut self, note: NoteRecord) -> AppResult<()> {
        let key = normalize_note_key(note.id().as_str());
        if self.notes.contains_key(&key) {
            return Err(AppError::already_exists(RecordKind::Note, key));
        }
        self.notes.insert(key, note);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&NoteRecord> {
        self.notes.get(&normalize_note_key(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut NoteRecord> {
        self.notes.get_mut(&normalize_note_key(id))
    }

    /// Removes and returns a note; `None` when the id is unknown.
    pub fn delete(&mut self, id: &str) -> Option<NoteRecord> {
        self.notes.shift_remove(&normalize_note_key(id))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteRecord> {
        self.notes.values()
    }

    /// Notes sharing at least one tag with the whitespace-separated `criteria`.
    ///
    /// Matching is case-insensitive on both sides.
    pub fn find(&self, criteria: &str) -> Vec<&NoteRecord> {
        let wanted: BTreeSet<String> = criteria.split_whitespace().map(str::to_lowercase).collect();
        if wanted.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<(Vec<String>, &NoteRecord)> = self
            .notes
            .values()
            .filter_map(|note| {
                let overlap: Vec<String> = note
                    .lowercase_tags()
                    .intersection(&wanted)
                    .cloned()
                    .collect();
                (!overlap.is_empty()).then_some((overlap, note))
            })
            .collect();

        ranked.sort_by(|(left_tags, left), (right_tags, right)| {
            right_tags
                .len()
                .cmp(&left_tags.len())
                .then_with(|| left_tags.cmp(right_tags))
                .then_with(|| left.title().to_lowercase().cmp(&right.title().to_lowercase()))
        });
        ranked.into_iter().map(|(_, note)| note).collect()
    }
}

impl TryFrom<Vec<NoteRecord>> for NotesStore {
    type Error = AppError;

    fn try_from(value: Vec<NoteRecord>) -> Result<Self, Self::Error> {
        let mut store = Self::new();
        for note in value {
            store.add(note)?;
        }
        Ok(store)
    }
}

impl From<NotesStore> for Vec<NoteRecord> {
    fn from(value: NotesStore) -> Self {
        value.notes.into_values().collect()
    }
}
