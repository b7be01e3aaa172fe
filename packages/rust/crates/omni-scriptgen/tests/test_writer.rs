//! Tests for ScriptWriter - structured output as document edits.

use omni_edit::apply_edits;
use omni_scriptgen::{
    EditError, LineEnding, ScriptWriter, Sink, StringKind, TypeName, TypeNamePolicy,
    WriterSettings,
};

fn short_names() -> WriterSettings {
    WriterSettings {
        type_name_policy: TypeNamePolicy::DropNamespace,
        ..WriterSettings::default()
    }
}

#[test]
fn test_splat_rewrite_single_edit() {
    let original = "Get-ChildItem -Recurse";
    let mut writer = ScriptWriter::new(original, WriterSettings::default());

    writer.start_writing(0, original.len()).expect("start");
    writer.write_assignment("splat").expect("assign");
    writer.open_hashtable().expect("open");
    writer.write_hashtable_key("Recurse").expect("key");
    writer.write_bool(true).expect("bool");
    writer.close_hashtable().expect("close");
    writer.write_line().expect("line");
    writer.write("Get-ChildItem ").expect("write");
    writer.write_splat("splat").expect("splat");
    writer.finish_writing().expect("finish");

    let edits = writer.edits().expect("edits");
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].start_offset, 0);
    assert_eq!(edits[0].end_offset, original.len());
    assert_eq!(edits[0].original_value, original);
    assert_eq!(
        edits[0].new_value,
        "$splat = @{\n    Recurse = $true\n}\nGet-ChildItem @splat"
    );
}

#[test]
fn test_dropped_namespace_inserts_import_block() {
    let original = "[Path]";
    let mut writer = ScriptWriter::new(original, short_names());

    writer.start_writing(0, original.len()).expect("start");
    writer
        .write_type_expression(&TypeName::parse("System.IO.Path"))
        .expect("type");
    writer.finish_writing().expect("finish");

    let edits = writer.edits().expect("edits");
    let unreduced = writer.tracker().unreduced_edits();
    assert_eq!(unreduced.len(), 2);
    assert_eq!(unreduced[0].new_value, "using namespace System.IO\n\n");
    assert!(unreduced[0].is_insertion());
    assert_eq!(unreduced[1].original_value, "[Path]");
    assert_eq!(
        apply_edits(original, &edits).expect("apply"),
        "using namespace System.IO\n\n[Path]"
    );
}

#[test]
fn test_existing_import_block_is_merged() {
    let original = "using namespace System.Text\n\n$x = $null";
    let value_at = original.find("$null").expect("present");
    let mut writer = ScriptWriter::new(original, short_names());

    writer.start_writing(value_at, original.len()).expect("start");
    writer
        .write_type_expression(&TypeName::parse("System.IO.FileInfo"))
        .expect("type");
    writer.finish_writing().expect("finish");

    let edits = writer.edits().expect("edits");
    assert_eq!(
        apply_edits(original, &edits).expect("apply"),
        "using namespace System.IO\nusing namespace System.Text\n\n$x = [FileInfo]"
    );
}

#[test]
fn test_already_imported_namespace_not_repeated() {
    let original = "using namespace System.IO\n$p = $null";
    let value_at = original.find("$null").expect("present");
    let mut writer = ScriptWriter::new(original, short_names());

    writer.start_writing(value_at, original.len()).expect("start");
    writer
        .write_type_expression(&TypeName::parse("System.IO.Path"))
        .expect("type");
    writer.finish_writing().expect("finish");

    let edits = writer.edits().expect("edits");
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_value, "[Path]");
}

#[test]
fn test_types_after_flush_keep_unimported_namespace() {
    let mut writer = ScriptWriter::new("", short_names());
    writer
        .write_type_expression(&TypeName::parse("System.IO.Path"))
        .expect("type");
    let first = writer.edits().expect("edits");

    writer.write(" ").expect("write");
    writer
        .write_type_expression(&TypeName::parse("System.Text.StringBuilder"))
        .expect("type");
    writer.write(" ").expect("write");
    writer
        .write_type_expression(&TypeName::parse("System.IO.File"))
        .expect("type");
    let second = writer.edits().expect("edits");

    assert_eq!(first.len(), 1);
    let text = apply_edits("", &second).expect("apply");
    assert_eq!(
        text,
        "using namespace System.IO\n\n[Path] [System.Text.StringBuilder] [File]"
    );
    assert_eq!(writer.pending_imports().count(), 0);
}

#[test]
fn test_comments_between_imports_survive() {
    let original = "using namespace System.Text\n# keep me\nusing namespace System.Linq\n\n$x = $null";
    let value_at = original.find("$null").expect("present");
    let mut writer = ScriptWriter::new(original, short_names());

    writer.start_writing(value_at, original.len()).expect("start");
    writer
        .write_type_expression(&TypeName::parse("System.IO.Path"))
        .expect("type");
    writer.write(" ").expect("write");
    writer
        .write_type_expression(&TypeName::parse("System.Linq.Enumerable"))
        .expect("type");
    writer.finish_writing().expect("finish");

    let edits = writer.edits().expect("edits");
    assert_eq!(
        apply_edits(original, &edits).expect("apply"),
        "using namespace System.IO\nusing namespace System.Text\n# keep me\nusing namespace System.Linq\n\n$x = [Path] [Enumerable]"
    );
}

#[test]
fn test_full_names_by_default() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    writer
        .write_type_expression(&TypeName::parse("System.IO.Path"))
        .expect("type");
    writer.write(" ").expect("write");
    writer
        .write_type_expression(&TypeName::parse("System.Collections.Hashtable"))
        .expect("type");
    let edits = writer.edits().expect("edits");
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_value, "[System.IO.Path] [hashtable]");
}

#[test]
fn test_accelerators_can_be_disabled() {
    let settings = WriterSettings {
        use_type_accelerators: false,
        ..WriterSettings::default()
    };
    let mut writer = ScriptWriter::new("", settings);
    writer
        .write_type_expression(&TypeName::parse("System.String"))
        .expect("type");
    let edits = writer.edits().expect("edits");
    assert_eq!(edits[0].new_value, "[System.String]");
}

#[test]
fn test_non_public_type_lookup() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    let hidden = TypeName::parse("System.Management.Automation.Internal.Hidden")
        .non_public(Some(TypeName::parse("System.Management.Automation.PSObject")));
    writer.write_type_expression(&hidden).expect("type");
    writer.write_line().expect("line");
    let unanchored = TypeName::parse("Contoso.Internal.Widget").non_public(None);
    writer.write_type_expression(&unanchored).expect("type");

    let edits = writer.edits().expect("edits");
    assert_eq!(
        edits[0].new_value,
        "([psobject].Assembly.GetType('System.Management.Automation.Internal.Hidden'))\n\
         ([type]::GetType('Contoso.Internal.Widget'))"
    );
}

#[test]
fn test_enum_literals() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    let ty = TypeName::parse("System.IO.FileAttributes");
    writer.write_enum(&ty, &["Hidden"]).expect("enum");
    writer.write_line().expect("line");
    writer.write_enum(&ty, &["Hidden", "ReadOnly"]).expect("enum");
    writer.write_line().expect("line");
    writer.write_enum(&ty, &[]).expect("enum");
    let edits = writer.edits().expect("edits");
    assert_eq!(
        edits[0].new_value,
        "[System.IO.FileAttributes]::Hidden\n\
         [System.IO.FileAttributes]'Hidden, ReadOnly'\n\
         [System.IO.FileAttributes]0"
    );
}

#[test]
fn test_param_block() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    writer.open_param_block().expect("open");
    writer.write_attribute("Parameter", &["Mandatory"]).expect("attr");
    writer.write_line().expect("line");
    writer
        .write_parameter(Some(&TypeName::parse("System.String")), "Path")
        .expect("param");
    writer.separate_parameters().expect("sep");
    writer.write_parameter(None, "Force").expect("param");
    writer.close_param_block().expect("close");

    let edits = writer.edits().expect("edits");
    assert_eq!(
        edits[0].new_value,
        "param(\n    [Parameter(Mandatory)]\n    [string] $Path,\n\n    $Force\n)"
    );
}

#[test]
fn test_here_string_keeps_column_zero() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    writer.open_named_block("process").expect("open");
    writer.write_assignment("text").expect("assign");
    writer
        .write_string("one\ntwo", StringKind::LiteralHere)
        .expect("string");
    writer.close_script_block().expect("close");

    let edits = writer.edits().expect("edits");
    assert_eq!(
        edits[0].new_value,
        "process {\n    $text = @'\none\ntwo\n'@\n}"
    );
}

#[test]
fn test_comments_wrap_to_line_length() {
    let settings = WriterSettings {
        max_line_length: 24,
        ..WriterSettings::default()
    };
    let mut writer = ScriptWriter::new("", settings);
    writer
        .write_comment("Collect every file below the root folder")
        .expect("comment");
    let edits = writer.edits().expect("edits");
    assert_eq!(
        edits[0].new_value,
        "# Collect every file\n# below the root folder"
    );
}

#[test]
fn test_short_line_length_is_respected() {
    let settings = WriterSettings {
        max_line_length: 10,
        ..WriterSettings::default()
    };
    let mut writer = ScriptWriter::new("", settings);
    writer
        .write_comment("aaaa bbbb abcdefghij")
        .expect("comment");
    let edits = writer.edits().expect("edits");
    let text = &edits[0].new_value;
    assert_eq!(text, "# aaaa\n# bbbb\n# abcdefgh\n# ij");
    assert!(text.lines().all(|line| line.len() <= 10));
}

#[test]
fn test_block_comment() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    writer.write_block_comment("Synopsis.").expect("comment");
    let edits = writer.edits().expect("edits");
    assert_eq!(edits[0].new_value, "<#\n    Synopsis.\n#>");
}

#[test]
fn test_aligned_start_adopts_line_indent() {
    let original = "function f {\n    Get-Item\n}";
    let start = original.find("Get-Item").expect("present");
    let end = start + "Get-Item".len();
    let mut writer = ScriptWriter::new(original, WriterSettings::default());

    writer.start_writing_aligned(start, end).expect("start");
    writer.write("if ($x) ").expect("write");
    writer.open_script_block().expect("open");
    writer.write("Get-Item").expect("write");
    writer.close_script_block().expect("close");
    writer.finish_writing().expect("finish");

    let edits = writer.edits().expect("edits");
    assert_eq!(
        apply_edits(original, &edits).expect("apply"),
        "function f {\n    if ($x) {\n        Get-Item\n    }\n}"
    );
}

#[test]
fn test_crlf_and_tabs() {
    let settings = WriterSettings::from_yaml_str(
        "writer:\n  indent_style: tabs\n  line_ending: crlf\n",
    )
    .expect("settings");
    assert_eq!(settings.line_ending, LineEnding::Crlf);
    let mut writer = ScriptWriter::new("", settings);
    writer.open_script_block().expect("open");
    writer.write_null().expect("null");
    writer.close_script_block().expect("close");
    let edits = writer.edits().expect("edits");
    assert_eq!(edits[0].new_value, "{\r\n\t$null\r\n}");
}

#[test]
fn test_crlf_here_string() {
    let settings =
        WriterSettings::from_yaml_str("writer:\n  line_ending: crlf\n").expect("settings");
    let mut writer = ScriptWriter::new("", settings);
    writer.open_script_block().expect("open");
    writer
        .write_string("a\nb", StringKind::LiteralHere)
        .expect("string");
    writer.close_script_block().expect("close");
    let edits = writer.edits().expect("edits");
    assert_eq!(edits[0].new_value, "{\r\n    @'\r\na\r\nb\r\n'@\r\n}");
}

#[test]
fn test_into_edits_closes_session() {
    let mut writer = ScriptWriter::new("abc", WriterSettings::default()).with_file_name("a.ps1");
    writer.write_int(1).expect("int");
    let edits = writer.into_edits().expect("edits");
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].file_name, "a.ps1");
    assert_eq!(edits[0].new_value, "1");
}

#[test]
fn test_unbalanced_indent_reported() {
    let mut writer = ScriptWriter::new("", WriterSettings::default());
    writer.open_script_block().expect("open");
    writer.close_script_block().expect("close");
    assert_eq!(writer.close_script_block(), Err(EditError::UnbalancedIndent));
}
