//! Tests for gather module - parallel provider evaluation.

use omni_edit::EditError;
use omni_scriptgen::{ScriptWriter, Sink, WriterSettings};
use omni_workspace::{
    aggregate_edits, gather_code_actions, CodeAction, RefactorContext, RefactorProvider,
};

/// Replaces the selection with a splatted call.
struct SplatProvider;

impl RefactorProvider for SplatProvider {
    fn name(&self) -> &str {
        "splat"
    }

    fn can_handle(&self, context: &RefactorContext) -> bool {
        context.selection.is_some()
    }

    fn code_actions(&self, context: &RefactorContext) -> Result<Vec<CodeAction>, EditError> {
        let Some(selection) = &context.selection else {
            return Ok(Vec::new());
        };
        let mut writer = ScriptWriter::new(context.document.as_ref(), WriterSettings::default())
            .with_file_name(context.file_name.clone());
        writer.start_writing(selection.start_offset, selection.end_offset)?;
        writer.write_assignment("splat")?;
        writer.open_hashtable()?;
        writer.write_hashtable_key("Recurse")?;
        writer.write_bool(true)?;
        writer.close_hashtable()?;
        writer.write_line()?;
        writer.write("Get-ChildItem ")?;
        writer.write_splat("splat")?;
        writer.finish_writing()?;
        Ok(vec![CodeAction {
            title: "Convert to splat".to_string(),
            provider: self.name().to_string(),
            changes: aggregate_edits(writer.into_edits()?),
        }])
    }
}

/// Offers fixed titles.
struct TitlesProvider(&'static [&'static str]);

impl RefactorProvider for TitlesProvider {
    fn name(&self) -> &str {
        "titles"
    }

    fn code_actions(&self, _context: &RefactorContext) -> Result<Vec<CodeAction>, EditError> {
        Ok(self
            .0
            .iter()
            .map(|title| CodeAction {
                title: (*title).to_string(),
                provider: self.name().to_string(),
                changes: Vec::new(),
            })
            .collect())
    }
}

/// Always fails.
struct BrokenProvider;

impl RefactorProvider for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    fn code_actions(&self, _context: &RefactorContext) -> Result<Vec<CodeAction>, EditError> {
        Err(EditError::UnbalancedIndent)
    }
}

#[test]
fn test_actions_ordered_by_provider() {
    let providers: Vec<Box<dyn RefactorProvider>> = vec![
        Box::new(TitlesProvider(&["a1", "a2"])),
        Box::new(BrokenProvider),
        Box::new(TitlesProvider(&["b1"])),
        Box::new(TitlesProvider(&["c1", "c2", "c3"])),
    ];
    let context = RefactorContext::new("script.ps1", "Get-Item");

    let titles: Vec<String> = gather_code_actions(&providers, &context)
        .into_iter()
        .map(|action| action.title)
        .collect();
    assert_eq!(titles, vec!["a1", "a2", "b1", "c1", "c2", "c3"]);
}

#[test]
fn test_provider_skipped_when_it_cannot_handle() {
    let providers: Vec<Box<dyn RefactorProvider>> = vec![Box::new(SplatProvider)];
    let context = RefactorContext::new("script.ps1", "Get-ChildItem -Recurse");
    assert!(gather_code_actions(&providers, &context).is_empty());
}

#[test]
fn test_provider_edits_become_changes() {
    let document = "Get-ChildItem -Recurse";
    let providers: Vec<Box<dyn RefactorProvider>> = vec![Box::new(SplatProvider)];
    let context = RefactorContext::new("script.ps1", document).with_selection(0, document.len());
    assert_eq!(context.selected_text(), Some(document));

    let actions = gather_code_actions(&providers, &context);
    assert_eq!(actions.len(), 1);
    let changes = &actions[0].changes;
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].location(), Some("script.ps1"));
    let edits = changes[0].edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].original_value, document);
    assert_eq!(
        edits[0].new_value,
        "$splat = @{\n    Recurse = $true\n}\nGet-ChildItem @splat"
    );
}
