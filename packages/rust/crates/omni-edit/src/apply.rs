//! Applying edits to text.
//!
//! Edits for one document are applied in descending start order so that
//! earlier offsets stay valid while later ones are rewritten.

use crate::diff::generate_unified_diff;
use crate::error::EditError;
use crate::reduce::ensure_disjoint;
use crate::types::{DocumentEdit, EditPreview};

/// Check `edits` against `original` and return them in ascending start order.
///
/// # Errors
///
/// [`EditError::OverlappingEdits`] for intersecting edits,
/// [`EditError::OriginalMismatch`] when recorded text differs from `original`
/// and [`EditError::InvalidOffset`] for spans outside the text.
pub fn validate_edits(original: &str, edits: &[DocumentEdit]) -> Result<Vec<DocumentEdit>, EditError> {
    let mut sorted = edits.to_vec();
    sorted.sort_by_key(|edit| (edit.start_offset, edit.end_offset));

    for edit in &sorted {
        if edit.end_offset < edit.start_offset {
            return Err(EditError::InvalidRange {
                start: edit.start_offset,
                end: edit.end_offset,
            });
        }
    }
    ensure_disjoint(&sorted)?;

    for edit in &sorted {
        let found = original
            .get(edit.start_offset..edit.end_offset)
            .ok_or(EditError::InvalidOffset(edit.start_offset))?;
        if found != edit.original_value {
            return Err(EditError::OriginalMismatch {
                offset: edit.start_offset,
                expected: edit.original_value.clone(),
                found: found.to_string(),
            });
        }
    }
    Ok(sorted)
}

/// Apply `edits` to `original`.
///
/// Every edit's `original_value` must match the text it replaces.
///
/// # Errors
///
/// Same as [`validate_edits`].
pub fn apply_edits(original: &str, edits: &[DocumentEdit]) -> Result<String, EditError> {
    let sorted = validate_edits(original, edits)?;
    let mut modified = original.to_string();
    for edit in sorted.iter().rev() {
        modified.replace_range(edit.start_offset..edit.end_offset, &edit.new_value);
    }
    Ok(modified)
}

/// Apply `edits` and render a diff preview.
///
/// # Errors
///
/// Same as [`apply_edits`].
pub fn preview_edits(original: &str, edits: &[DocumentEdit]) -> Result<EditPreview, EditError> {
    let modified = apply_edits(original, edits)?;
    let mut sorted = edits.to_vec();
    sorted.sort_by_key(|edit| edit.start_offset);
    let diff = generate_unified_diff(original, &modified);
    Ok(EditPreview {
        original: original.to_string(),
        modified,
        count: sorted.len(),
        diff,
        edits: sorted,
    })
}
