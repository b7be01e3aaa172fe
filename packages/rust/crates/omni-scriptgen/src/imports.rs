//! `using namespace` block detection and rendering.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static USING_NAMESPACE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*using\s+namespace\s+([\p{L}_][\p{L}\p{N}_.]*)\s*;?\s*$").ok()
});

/// The `using namespace` statements at the top of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBlock {
    /// Byte span of the first run of consecutive statements, excluding the
    /// final line break.
    pub span: Option<(usize, usize)>,
    /// Imported namespaces in document order.
    pub namespaces: Vec<String>,
    /// How many of `namespaces` lie inside `span`.
    pub spanned: usize,
}

impl ImportBlock {
    /// Find the leading import block of `document`.
    ///
    /// Blank lines and `#` comment lines may precede or separate the
    /// statements; the first other line ends the block. Only the first run
    /// of consecutive statements is spanned, so text between runs survives
    /// a rewrite of the span.
    #[must_use]
    pub fn scan(document: &str) -> Self {
        let Some(pattern) = USING_NAMESPACE.as_ref() else {
            return Self::default();
        };

        let mut block = Self::default();
        let mut in_first_run = false;
        let mut offset = 0;
        for raw_line in document.split_inclusive('\n') {
            let line_start = offset;
            offset += raw_line.len();
            let line = raw_line.trim_end_matches('\n').trim_end_matches('\r');
            let trimmed = line.trim_start();

            if let Some(captures) = pattern.captures(line) {
                if block.span.is_none() || in_first_run {
                    let start = block.span.map_or(line_start, |(start, _)| start);
                    block.span = Some((start, line_start + line.len()));
                    block.spanned += 1;
                    in_first_run = true;
                }
                block.namespaces.push(captures[1].to_string());
            } else if trimmed.is_empty() || trimmed.starts_with('#') {
                in_first_run = false;
            } else {
                break;
            }
        }
        block
    }

    /// Whether `namespace` is already imported, ignoring ASCII case.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(namespace))
    }
}

/// Sorted, case-insensitively distinct union of two namespace lists.
pub fn merge_namespaces<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    added: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut merged: BTreeMap<String, String> = BTreeMap::new();
    for namespace in existing.into_iter().chain(added) {
        merged
            .entry(namespace.to_ascii_lowercase())
            .or_insert_with(|| namespace.to_string());
    }
    merged.into_values().collect()
}

/// One `using namespace` statement per namespace, joined by `newline`.
#[must_use]
pub fn render_imports(namespaces: &[String], newline: &str) -> String {
    namespaces
        .iter()
        .map(|namespace| format!("using namespace {namespace}"))
        .collect::<Vec<_>>()
        .join(newline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_no_block() {
        let block = ImportBlock::scan("[Path]::GetFileName($x)");
        assert_eq!(block, ImportBlock::default());
    }

    #[test]
    fn test_scan_leading_block() {
        let document = "#requires -Version 5\nusing namespace System.IO\r\n\nUSING NAMESPACE System.Text;\nGet-Item\nusing namespace Late";
        let block = ImportBlock::scan(document);
        let start = document.find("using").expect("present");
        let end = document.find("System.IO").expect("present") + "System.IO".len();
        assert_eq!(block.span, Some((start, end)));
        assert_eq!(block.namespaces, vec!["System.IO", "System.Text"]);
        assert_eq!(block.spanned, 1);
        assert!(block.contains("system.io"));
        assert!(!block.contains("Late"));
    }

    #[test]
    fn test_scan_spans_first_run_only() {
        let document = "using namespace A\nusing namespace B\n# note\nusing namespace C\n\n$x";
        let block = ImportBlock::scan(document);
        let end = document.find("\n# note").expect("present");
        assert_eq!(block.span, Some((0, end)));
        assert_eq!(block.spanned, 2);
        assert_eq!(block.namespaces, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merge_sorted_distinct() {
        let merged = merge_namespaces(["System.Text", "system.io"], ["System.IO", "Microsoft.Win32"]);
        assert_eq!(merged, vec!["Microsoft.Win32", "system.io", "System.Text"]);
    }

    #[test]
    fn test_render() {
        let rendered = render_imports(&["A".to_string(), "B.C".to_string()], "\n");
        assert_eq!(rendered, "using namespace A\nusing namespace B.C");
    }
}
