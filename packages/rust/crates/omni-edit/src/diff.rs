//! Diff rendering for edit previews.
//!
//! Provides unified diff output using the `similar` crate. The diff is only a
//! presentation of edits the writer already computed.

use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// Generate a unified diff between two strings.
///
/// Each hunk starts with an `@@ -l,n +l,n @@` header and carries three lines
/// of context. Returns an empty string when the inputs are equal.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old = first.old_range().start..last.old_range().end;
        let new = first.new_range().start..last.new_range().end;
        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old.start + 1,
            old.len(),
            new.start + 1,
            new.len()
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                output.push(match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                });
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}
