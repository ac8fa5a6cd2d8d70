//! Note use-case service.
//!
//! # Responsibility
//! - Create notes and apply confirmed title/text edits.
//!
//! # Invariants
//! - Text edits go through `NoteRecord::set_text` so tags are recomputed.

use crate::error::{AppError, AppResult, RecordKind};
use crate::model::note::{NoteId, NoteRecord};
use crate::store::notes::NotesStore;
use log::info;

/// Staged replacement values for one note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: Option<String>,
    pub text: Option<String>,
}

impl NoteDraft {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none()
    }
}

/// Creates and stores a note, returning its generated id.
pub fn create_note(
    notes: &mut NotesStore,
    title: impl Into<String>,
    text: impl Into<String>,
) -> AppResult<NoteId> {
    let note = NoteRecord::new(title, text);
    let id = note.id().clone();
    let tags = note.tags().len();
    notes.add(note)?;
    info!("event=note_create module=service status=ok tags={tags}");
    Ok(id)
}

/// Applies a confirmed draft to the note with `id`.
///
/// # Errors
/// - `NotFound` when the id is unknown.
pub fn apply_note_draft(notes: &mut NotesStore, id: &str, draft: NoteDraft) -> AppResult<()> {
    let note = notes
        .get_mut(id)
        .ok_or_else(|| AppError::not_found(RecordKind::Note, id.trim()))?;
    if let Some(title) = draft.title {
        note.set_title(title);
    }
    if let Some(text) = draft.text {
        note.set_text(text);
    }
    info!("event=note_edit module=service status=ok");
    Ok(())
}

/// Deletes a note by id.
///
/// # Errors
/// - `NotFound` when the id is unknown.
pub fn delete_note(notes: &mut NotesStore, id: &str) -> AppResult<NoteRecord> {
    let removed = notes
        .delete(id)
        .ok_or_else(|| AppError::not_found(RecordKind::Note, id.trim()))?;
    info!("event=note_delete module=service status=ok");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::{apply_note_draft, create_note, NoteDraft};
    use crate::error::AppError;
    use crate::store::notes::NotesStore;

    #[test]
    fn text_edit_recomputes_tags() {
        let mut notes = NotesStore::new();
        let id = create_note(&mut notes, "Plan", "#todo write").unwrap();

        let draft = NoteDraft {
            title: None,
            text: Some("#done shipped".to_string()),
        };
        apply_note_draft(&mut notes, &id.as_str().to_lowercase(), draft).unwrap();

        let note = notes.get(id.as_str()).unwrap();
        assert_eq!(note.title(), "Plan");
        assert!(note.tags().contains("done"));
        assert!(!note.tags().contains("todo"));
    }

    #[test]
    fn editing_unknown_note_fails() {
        let mut notes = NotesStore::new();
        let err = apply_note_draft(&mut notes, "missing", NoteDraft::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
