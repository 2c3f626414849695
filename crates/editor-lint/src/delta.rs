//! Document change sets and position mapping.
//!
//! A [`ChangeSet`] describes one document transaction as a list of **simultaneous** edits, all
//! expressed in character offsets (Unicode scalar values) of the document *before* the change.
//! Anchored state (diagnostics, the selected diagnostic, gutter markers) is carried across the
//! change with [`ChangeSet::map_position`].

use crate::error::LintError;

/// Which side of an edit boundary a position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Associate with the text before the position.
    Before,
    /// Associate with the text after the position.
    After,
}

/// How deletions affect mapped positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    /// Always produce a position.
    Simple,
    /// Report the position as deleted when the characters on both sides of it were deleted.
    TrackDel,
}

/// A single edit: replace `from..to` (pre-change offsets) with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start character offset (inclusive).
    pub from: usize,
    /// End character offset (exclusive).
    pub to: usize,
    insert: String,
    inserted_len: usize,
}

impl Edit {
    /// Create an edit replacing `from..to` with `insert`.
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        let insert = insert.into();
        let inserted_len = insert.chars().count();
        Self {
            from,
            to,
            insert,
            inserted_len,
        }
    }

    /// Length of the deleted range in characters.
    pub fn deleted_len(&self) -> usize {
        self.to - self.from
    }

    /// Inserted text (may be empty).
    pub fn insert(&self) -> &str {
        &self.insert
    }

    /// Length of the inserted text in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_len
    }
}

/// A validated set of non-overlapping edits against a document of known length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    len_before: usize,
    edits: Vec<Edit>,
}

impl ChangeSet {
    /// Build a change set, sorting edits by `(from, to)`.
    ///
    /// Insertions at an offset come before a range starting there; insertions sharing an offset
    /// keep their relative order. Edits may touch but not overlap.
    pub fn new(len_before: usize, mut edits: Vec<Edit>) -> Result<Self, LintError> {
        edits.sort_by_key(|e| (e.from, e.to));

        let mut prev_end = 0;
        for edit in &edits {
            if edit.from > edit.to || edit.to > len_before {
                return Err(LintError::InvalidChange {
                    from: edit.from,
                    to: edit.to,
                    len: len_before,
                });
            }
            if edit.from < prev_end {
                return Err(LintError::OverlappingChanges(edit.from));
            }
            prev_end = edit.to;
        }

        // No-op edits carry nothing to map.
        edits.retain(|e| e.from != e.to || e.inserted_len > 0);

        Ok(Self { len_before, edits })
    }

    /// A change set that leaves a document of `len` characters untouched.
    pub fn empty(len: usize) -> Self {
        Self {
            len_before: len,
            edits: Vec::new(),
        }
    }

    /// Insert `text` at `at`.
    pub fn insert(
        len_before: usize,
        at: usize,
        text: impl Into<String>,
    ) -> Result<Self, LintError> {
        Self::new(len_before, vec![Edit::new(at, at, text)])
    }

    /// Delete `from..to`.
    pub fn delete(len_before: usize, from: usize, to: usize) -> Result<Self, LintError> {
        Self::new(len_before, vec![Edit::new(from, to, "")])
    }

    /// Replace `from..to` with `text`.
    pub fn replace(
        len_before: usize,
        from: usize,
        to: usize,
        text: impl Into<String>,
    ) -> Result<Self, LintError> {
        Self::new(len_before, vec![Edit::new(from, to, text)])
    }

    /// Document length the change applies to.
    pub fn len_before(&self) -> usize {
        self.len_before
    }

    /// Document length after the change.
    pub fn len_after(&self) -> usize {
        self.edits.iter().fold(self.len_before, |len, e| {
            len - e.deleted_len() + e.inserted_len()
        })
    }

    /// Returns `true` if this change leaves the document untouched.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits, sorted by start offset.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Map a pre-change position to the post-change document.
    pub fn map_position(&self, pos: usize, bias: Bias) -> usize {
        self.map_position_tracking(pos, bias, MapMode::Simple)
            .unwrap_or(pos)
    }

    /// Map a pre-change position, optionally reporting it as deleted.
    ///
    /// Positions past the end of the document are clamped to the end.
    pub fn map_position_tracking(&self, pos: usize, bias: Bias, mode: MapMode) -> Option<usize> {
        let pos = pos.min(self.len_before);
        // (old, new) offsets at the end of the previous edit.
        let (mut old_end, mut new_end) = (0usize, 0usize);

        for edit in &self.edits {
            if pos < edit.from {
                break;
            }
            let new_start = new_end + (edit.from - old_end);

            if mode == MapMode::TrackDel && edit.from < pos && pos < edit.to {
                return None;
            }

            let pure_insert = edit.from == edit.to;
            if pos < edit.to || (pure_insert && pos == edit.from && bias == Bias::Before) {
                return Some(if pos == edit.from || bias == Bias::Before {
                    new_start
                } else {
                    new_start + edit.inserted_len
                });
            }

            old_end = edit.to;
            new_end = new_start + edit.inserted_len;
        }

        Some(new_end + (pos - old_end))
    }

    /// Returns `true` if every character of `from..to` is deleted by this change.
    pub fn covers_by_deletion(&self, from: usize, to: usize) -> bool {
        if from >= to {
            return false;
        }

        let mut covered_to = from;
        for edit in &self.edits {
            if edit.to <= covered_to {
                continue;
            }
            if edit.from > covered_to {
                return false;
            }
            covered_to = edit.to;
            if covered_to >= to {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_shifts_following_positions() {
        let changes = ChangeSet::insert(20, 5, "abc").unwrap();
        assert_eq!(changes.len_after(), 23);
        assert_eq!(changes.map_position(2, Bias::After), 2);
        assert_eq!(changes.map_position(10, Bias::Before), 13);
    }

    #[test]
    fn test_insert_at_position_respects_bias() {
        let changes = ChangeSet::insert(20, 5, "abc").unwrap();
        assert_eq!(changes.map_position(5, Bias::Before), 5);
        assert_eq!(changes.map_position(5, Bias::After), 8);
    }

    #[test]
    fn test_deleted_positions_collapse_to_edit() {
        let changes = ChangeSet::delete(20, 5, 10).unwrap();
        assert_eq!(changes.map_position(7, Bias::Before), 5);
        assert_eq!(changes.map_position(7, Bias::After), 5);
        assert_eq!(changes.map_position(10, Bias::Before), 5);
        assert_eq!(changes.map_position(15, Bias::After), 10);
    }

    #[test]
    fn test_replacement_interior_respects_bias() {
        let changes = ChangeSet::replace(20, 5, 10, "xy").unwrap();
        assert_eq!(changes.map_position(5, Bias::After), 5);
        assert_eq!(changes.map_position(7, Bias::Before), 5);
        assert_eq!(changes.map_position(7, Bias::After), 7);
        assert_eq!(changes.map_position(10, Bias::Before), 7);
    }

    #[test]
    fn test_track_del_reports_interior_points() {
        let changes = ChangeSet::delete(20, 5, 10).unwrap();
        assert_eq!(
            changes.map_position_tracking(7, Bias::After, MapMode::TrackDel),
            None
        );
        assert_eq!(
            changes.map_position_tracking(5, Bias::After, MapMode::TrackDel),
            Some(5)
        );
        assert_eq!(
            changes.map_position_tracking(10, Bias::After, MapMode::TrackDel),
            Some(5)
        );
    }

    #[test]
    fn test_multiple_edits_are_simultaneous() {
        let changes = ChangeSet::new(
            20,
            vec![Edit::new(10, 12, ""), Edit::new(2, 2, "____")],
        )
        .unwrap();
        assert_eq!(changes.edits()[0].from, 2);
        assert_eq!(changes.len_after(), 22);
        assert_eq!(changes.map_position(5, Bias::After), 9);
        assert_eq!(changes.map_position(15, Bias::After), 17);
    }

    #[test]
    fn test_stacked_insertions_at_same_offset() {
        let changes =
            ChangeSet::new(10, vec![Edit::new(3, 3, "a"), Edit::new(3, 3, "bb")]).unwrap();
        assert_eq!(changes.map_position(3, Bias::Before), 3);
        assert_eq!(changes.map_position(3, Bias::After), 6);
    }

    #[test]
    fn test_insert_and_delete_at_same_offset_in_any_order() {
        let insert_first =
            ChangeSet::new(10, vec![Edit::new(3, 3, "x"), Edit::new(3, 5, "")]).unwrap();
        let delete_first =
            ChangeSet::new(10, vec![Edit::new(3, 5, ""), Edit::new(3, 3, "x")]).unwrap();
        assert_eq!(insert_first, delete_first);
        assert_eq!(delete_first.edits()[0].insert(), "x");
        assert_eq!(delete_first.len_after(), 9);
        assert_eq!(delete_first.map_position(3, Bias::Before), 3);
        assert_eq!(delete_first.map_position(3, Bias::After), 4);
        assert_eq!(delete_first.map_position(5, Bias::After), 4);
    }

    #[test]
    fn test_invalid_changes_are_rejected() {
        assert!(matches!(
            ChangeSet::delete(5, 3, 9),
            Err(LintError::InvalidChange { .. })
        ));
        assert!(matches!(
            ChangeSet::new(10, vec![Edit::new(1, 5, ""), Edit::new(4, 6, "")]),
            Err(LintError::OverlappingChanges(4))
        ));
    }

    #[test]
    fn test_covers_by_deletion() {
        let changes =
            ChangeSet::new(20, vec![Edit::new(5, 7, ""), Edit::new(7, 10, "z")]).unwrap();
        assert!(changes.covers_by_deletion(5, 10));
        assert!(changes.covers_by_deletion(6, 9));
        assert!(!changes.covers_by_deletion(4, 10));
        assert!(!changes.covers_by_deletion(5, 11));
    }

    #[test]
    fn test_empty_change_is_identity() {
        let changes = ChangeSet::empty(12);
        assert!(changes.is_empty());
        for pos in 0..=12 {
            assert_eq!(changes.map_position(pos, Bias::Before), pos);
            assert_eq!(changes.map_position(pos, Bias::After), pos);
        }
        assert_eq!(changes.map_position(40, Bias::After), 12);
    }
}
