//! Position-safe edit composition.
//!
//! Refactor algorithms queue insert/delete/replace operations against the
//! *original* buffer offsets, without knowing about each other's edits. The
//! [`EditSet`] then applies all of them in one shot: sorted by start offset
//! descending, so mutating the buffer never invalidates the offsets of edits
//! not yet applied, and threads an external cursor offset through every edit
//! so the host can restore the caret after the rewrite.
//!
//! Producers are responsible for non-overlap: each algorithm must guarantee
//! by construction that it never edits the same span twice. The composer
//! validates bounds, not intersection.

use serde::{Serialize, Deserialize};

use crate::diagnostics::RefactorError;

/// What an [`Edit`] does to its span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditKind {
    /// Insert `text` at `start` (`start == end`).
    Insert { text: String },
    /// Remove the span.
    Delete,
    /// Remove the span and insert `text` in its place.
    Replace { text: String },
}

/// A single edit against original source offsets. `end` is exclusive, like
/// every span in this crate; an insert has `start == end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: EditKind,
    /// Human-readable description, for diagnostics and host UIs only.
    pub description: String,
}

impl Edit {
    /// The text this edit puts in place of its span ("" for deletes).
    pub fn new_text(&self) -> &str {
        match &self.kind {
            EditKind::Insert { text } | EditKind::Replace { text } => text,
            EditKind::Delete => "",
        }
    }

    /// Number of bytes this edit removes from the original buffer.
    pub fn deleted_len(&self) -> usize {
        self.end - self.start
    }
}

/// An ordered collection of edits plus the apply/remap machinery.
///
/// Created fresh per refactor invocation, filled through the append-only
/// producer methods, and consumed exactly once by [`EditSet::apply`] — which
/// takes `self` by value, so reuse after application is a compile error.
#[derive(Debug, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>, description: impl Into<String>) {
        self.edits.push(Edit {
            start: at,
            end: at,
            kind: EditKind::Insert { text: text.into() },
            description: description.into(),
        });
    }

    pub fn delete(&mut self, start: usize, end: usize, description: impl Into<String>) {
        self.edits.push(Edit {
            start,
            end,
            kind: EditKind::Delete,
            description: description.into(),
        });
    }

    pub fn replace(
        &mut self,
        start: usize,
        end: usize,
        text: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.edits.push(Edit {
            start,
            end,
            kind: EditKind::Replace { text: text.into() },
            description: description.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Apply every queued edit to `source` and remap `cursor` through them.
    ///
    /// Edits are applied in descending start order: all not-yet-applied edits
    /// have start offsets at or before the one being applied, so removing or
    /// inserting text never shifts them. The cursor is threaded through every
    /// edit in the same order, not just the nearest one — an edit earlier in
    /// the buffer still shifts a cursor that lies after it:
    ///
    /// - `cursor < start`: unaffected by this edit
    /// - `start <= cursor < end`: inside the removed span; snaps to
    ///   `start + new_text.len()` (the post-edit insertion point)
    /// - `cursor >= end`: shifts by `new_text.len() - (end - start)`
    ///
    /// An empty set returns the original text and cursor unchanged — success,
    /// not failure. Out-of-bounds or inverted spans fail with `Malformed`
    /// before any text is touched.
    pub fn apply(mut self, source: &str, cursor: usize) -> Result<(String, usize), RefactorError> {
        if self.edits.is_empty() {
            return Ok((source.to_string(), cursor));
        }

        for edit in &self.edits {
            if edit.start > edit.end {
                return Err(RefactorError::malformed(format!(
                    "edit '{}' has inverted span {}..{}",
                    edit.description, edit.start, edit.end
                )));
            }
            if edit.end > source.len() {
                return Err(RefactorError::malformed(format!(
                    "edit '{}' spans {}..{} past end of buffer (len {})",
                    edit.description,
                    edit.start,
                    edit.end,
                    source.len()
                )));
            }
        }

        // Descending start; at the same start the longer edit applies first,
        // so an insert at a deleted span's boundary lands after the deletion
        // instead of being swallowed by its original-offset range.
        self.edits
            .sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

        let mut text = source.to_string();
        let mut cursor = cursor;

        for edit in &self.edits {
            let new_len = edit.new_text().len();
            let deleted = edit.deleted_len();

            if cursor >= edit.end {
                cursor = cursor - deleted + new_len;
            } else if cursor >= edit.start {
                cursor = edit.start + new_len;
            }

            text.replace_range(edit.start..edit.end, edit.new_text());
        }

        Ok((text, cursor))
    }
}
