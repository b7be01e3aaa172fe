//! Edit reduction.
//!
//! Merges edits sharing a start offset into one deterministic edit.

use std::collections::BTreeMap;

use crate::error::EditError;
use crate::types::DocumentEdit;

/// Reduce `edits` to one edit per distinct start offset.
///
/// Within a group the widest overwrite supplies the replaced span, and the
/// new text is every member's new text concatenated in creation (`id`) order.
/// Callers must not issue two unrelated overwrites at the same start offset:
/// a narrower overwrite is assumed to be nested inside the widest one.
///
/// The result is sorted by start offset. No-op edits are dropped.
///
/// # Errors
///
/// [`EditError::OverlappingEdits`] when two reduced edits intersect.
pub fn reduce_edits(edits: &[DocumentEdit]) -> Result<Vec<DocumentEdit>, EditError> {
    let mut groups: BTreeMap<usize, Vec<&DocumentEdit>> = BTreeMap::new();
    for edit in edits {
        groups.entry(edit.start_offset).or_default().push(edit);
    }

    let mut reduced: Vec<DocumentEdit> = Vec::with_capacity(groups.len());
    for (start_offset, mut members) in groups {
        members.sort_by_key(|edit| edit.id);
        let Some(widest) = members.iter().max_by_key(|edit| edit.end_offset) else {
            continue;
        };
        let edit = DocumentEdit {
            file_name: widest.file_name.clone(),
            start_offset,
            end_offset: widest.end_offset,
            original_value: widest.original_value.clone(),
            new_value: members.iter().map(|edit| edit.new_value.as_str()).collect(),
            id: members[0].id,
        };
        if !edit.is_noop() {
            reduced.push(edit);
        }
    }

    ensure_disjoint(&reduced)?;
    Ok(reduced)
}

/// Check that edits sorted by start offset do not intersect.
///
/// # Errors
///
/// [`EditError::OverlappingEdits`] naming the first intersecting pair.
pub fn ensure_disjoint(sorted: &[DocumentEdit]) -> Result<(), EditError> {
    for pair in sorted.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.end_offset > second.start_offset || first.start_offset == second.start_offset {
            return Err(EditError::OverlappingEdits {
                first_start: first.start_offset,
                first_end: first.end_offset,
                second_start: second.start_offset,
                second_end: second.end_offset,
            });
        }
    }
    Ok(())
}
