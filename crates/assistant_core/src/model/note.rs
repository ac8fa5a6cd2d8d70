//! Note record with tags derived from its text.
//!
//! # Invariants
//! - `id` is generated once and never changes; it is stored upper-cased.
//! - `tags` always equals `extract_tags(text)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Returns the lookup key for a note id.
pub fn normalize_note_key(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Opaque note identifier, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string().to_uppercase())
    }

    /// Wraps an existing id, normalizing its case.
    pub fn parse(value: &str) -> Self {
        Self(normalize_note_key(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<NoteId> for String {
    fn from(value: NoteId) -> Self {
        value.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collects `#word` tokens from `text`, without the `#` markers.
///
/// Tokens are whitespace-delimited; case is preserved and bare `#` is ignored.
pub fn extract_tags(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .filter(|word| word.starts_with('#'))
        .map(|word| word.trim_matches('#'))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredNote", into = "StoredNote")]
pub struct NoteRecord {
    id: NoteId,
    title: String,
    text: String,
    tags: BTreeSet<String>,
}

/// Persisted note shape; tags are rebuilt on load.
#[derive(Serialize, Deserialize)]
struct StoredNote {
    id: NoteId,
    title: String,
    text: String,
}

impl From<StoredNote> for NoteRecord {
    fn from(value: StoredNote) -> Self {
        Self::with_id(value.id, value.title, value.text)
    }
}

impl From<NoteRecord> for StoredNote {
    fn from(value: NoteRecord) -> Self {
        Self {
            id: value.id,
            title: value.title,
            text: value.text,
        }
    }
}

impl NoteRecord {
    /// Creates a note with a freshly generated id.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_id(NoteId::generate(), title, text)
    }

    /// Creates a note with a caller-provided id, used by snapshot restore.
    pub fn with_id(id: NoteId, title: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            title: title.into(),
            tags: extract_tags(&text),
            text,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text and recomputes tags.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.tags = extract_tags(&self.text);
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn lowercase_tags(&self) -> BTreeSet<String> {
        self.tags.iter().map(|tag| tag.to_lowercase()).collect()
    }
}

impl Display for NoteRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tags = self.tags.iter().cloned().collect::<Vec<_>>().join(", ");
        write!(
            f,
            "id: {}, title: {}, text: {}, tags: {}",
            self.id, self.title, self.text, tags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_tags, NoteId, NoteRecord};

    #[test]
    fn tags_are_collected_once_per_distinct_token() {
        let note = NoteRecord::new("Title", "Message \n asdasd\n#tag1 #tag2 tag1");
        let tags: Vec<_> = note.tags().iter().map(String::as_str).collect();
        assert_eq!(tags, ["tag1", "tag2"]);
    }

    #[test]
    fn tags_keep_case_and_drop_bare_markers() {
        let tags = extract_tags("#Work # ##urgent# plain#tag");
        let tags: Vec<_> = tags.iter().map(String::as_str).collect();
        assert_eq!(tags, ["Work", "urgent"]);
    }

    #[test]
    fn set_text_recomputes_tags() {
        let mut note = NoteRecord::new("t", "#one");
        note.set_text("#two #three");
        assert!(!note.tags().contains("one"));
        assert!(note.tags().contains("two"));
        assert_eq!(note.tags().len(), 2);
    }

    #[test]
    fn ids_are_unique_and_upper_cased() {
        let first = NoteRecord::new("a", "");
        let second = NoteRecord::new("b", "");
        assert_ne!(first.id(), second.id());
        assert_eq!(first.id().as_str(), first.id().as_str().to_uppercase());
        assert_eq!(NoteId::parse(&first.id().as_str().to_lowercase()), *first.id());
    }
}
