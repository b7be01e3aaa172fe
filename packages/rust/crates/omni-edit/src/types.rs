//! Core types for edit tracking.
//!
//! Defines the records handed from the writer to host adapters.

use serde::{Deserialize, Serialize};

/// A single replacement of a span of the original document.
///
/// Offsets are UTF-8 byte offsets into the document as it was when the
/// writer took its snapshot. `original_value` is always the exact text of
/// `[start_offset, end_offset)` in that snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdit {
    /// Document the edit targets.
    pub file_name: String,
    /// First byte replaced.
    pub start_offset: usize,
    /// One past the last byte replaced.
    pub end_offset: usize,
    /// Text of the snapshot in `[start_offset, end_offset)`.
    pub original_value: String,
    /// Replacement text.
    pub new_value: String,
    /// Creation sequence number. Orders merges only.
    #[serde(skip)]
    pub id: u64,
}

impl DocumentEdit {
    /// Number of original bytes this edit replaces.
    #[must_use]
    pub fn overwrite_len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Whether the edit inserts without replacing anything.
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Whether applying the edit leaves the document unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.original_value == self.new_value
    }
}

/// Result of previewing a set of edits against their document.
///
/// Contains both the modified content and metadata about the changes made.
#[derive(Debug, Clone, Serialize)]
pub struct EditPreview {
    /// Original content before modification.
    pub original: String,
    /// Content after every edit is applied.
    pub modified: String,
    /// Number of edits applied.
    pub count: usize,
    /// Unified diff showing changes.
    pub diff: String,
    /// The applied edits in ascending offset order.
    pub edits: Vec<DocumentEdit>,
}

impl EditPreview {
    /// Format the preview for display.
    ///
    /// Returns a human-readable summary of the changes.
    #[must_use]
    pub fn format(&self, path: Option<&str>) -> String {
        let mut output = String::new();

        if let Some(p) = path {
            output.push_str(&format!("// EDIT: {p}\n"));
        }
        output.push_str(&format!("// Edits: {}\n", self.count));

        if self.count == 0 {
            output.push_str("[No changes]\n");
            return output;
        }

        output.push_str("\n// Changes:\n");
        for edit in &self.edits {
            let (line, column) = line_column(&self.original, edit.start_offset);
            output.push_str(&format!(
                "L{line}:{column}: {:?} -> {:?}\n",
                edit.original_value, edit.new_value
            ));
        }

        output.push_str("\n// Diff:\n");
        output.push_str(&self.diff);

        output
    }
}

/// 1-indexed line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let head = text.get(..offset).unwrap_or(text);
    let line = head.matches('\n').count() + 1;
    let line_start = head.rfind('\n').map_or(0, |i| i + 1);
    (line, head[line_start..].chars().count() + 1)
}
