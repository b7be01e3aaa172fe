//! Structured script writer.
//!
//! Adds language-aware output on top of the edit-tracking writer: lazy
//! indentation, structural blocks, literals, type expressions and the
//! `using namespace` block. Everything is written through the tracker's
//! public operations, so the result is always a set of document edits.

use std::collections::BTreeSet;

use omni_edit::{DocumentEdit, EditError, EditTrackingWriter, IndentWriter, Sink, Snapshot};
use tracing::debug;

use crate::chain::MethodChainWriter;
use crate::imports::{merge_namespaces, render_imports, ImportBlock};
use crate::literals::{
    render_bool, render_float, render_int, render_key, render_string, render_variable, quote_literal,
    StringKind,
};
use crate::settings::{TypeNamePolicy, WriterSettings};
use crate::types::{TypeAccelerators, TypeName};
use crate::wrap::wrap_text;

const COMMENT_PREFIX: &str = "# ";

/// Language-aware writer producing edits against one document.
///
/// # Example
///
/// ```rust,ignore
/// use omni_scriptgen::{ScriptWriter, Sink, WriterSettings};
///
/// let original = "Get-ChildItem -Recurse";
/// let mut writer = ScriptWriter::new(original, WriterSettings::default());
/// writer.start_writing(0, original.len())?;
/// writer.write_assignment("splat")?;
/// writer.open_hashtable()?;
/// writer.write_hashtable_key("Recurse")?;
/// writer.write_bool(true)?;
/// writer.close_hashtable()?;
/// writer.write_line()?;
/// writer.write("Get-ChildItem ")?;
/// writer.write_splat("splat")?;
/// writer.finish_writing()?;
/// let edits = writer.edits()?;
/// ```
#[derive(Debug)]
pub struct ScriptWriter {
    out: IndentWriter<EditTrackingWriter>,
    settings: WriterSettings,
    accelerators: TypeAccelerators,
    pending_imports: BTreeSet<String>,
    /// Namespaces in the import block once it has been written.
    imported: Option<Vec<String>>,
}

impl ScriptWriter {
    /// Start a session over `document`.
    pub fn new(document: impl Into<Snapshot>, settings: WriterSettings) -> Self {
        let tracker = EditTrackingWriter::new(document).with_newline(settings.line_ending.as_str());
        Self {
            out: IndentWriter::new(tracker, settings.indent_text()),
            settings,
            accelerators: TypeAccelerators::builtin(),
            pending_imports: BTreeSet::new(),
            imported: None,
        }
    }

    /// Set the file name stamped onto every edit.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.out.inner_mut().set_file_name(file_name);
        self
    }

    /// Replace the type accelerator table.
    #[must_use]
    pub fn with_accelerators(mut self, accelerators: TypeAccelerators) -> Self {
        self.accelerators = accelerators;
        self
    }

    /// Settings for this session.
    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// The original document.
    pub fn document(&self) -> &str {
        self.out.inner().snapshot().as_str()
    }

    /// The underlying edit tracker.
    pub fn tracker(&self) -> &EditTrackingWriter {
        self.out.inner()
    }

    /// Namespaces waiting to be written to the import block.
    pub fn pending_imports(&self) -> impl Iterator<Item = &str> {
        self.pending_imports.iter().map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Positioning
    // ------------------------------------------------------------------

    /// Seek and adopt the indentation of the original line at `offset`.
    ///
    /// # Errors
    ///
    /// Fails when `offset` is invalid or pending output cannot be finalized.
    pub fn set_position_aligned(&mut self, offset: usize) -> Result<(), EditError> {
        self.out.set_position(offset)?;
        let whitespace = self
            .out
            .inner()
            .snapshot()
            .leading_whitespace(offset)
            .to_string();
        self.out.align_to(&whitespace);
        Ok(())
    }

    /// Begin replacing the original span `[start, end)`.
    ///
    /// # Errors
    ///
    /// Fails when the range is invalid.
    pub fn start_writing(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        self.out.set_position(start)?;
        self.out.inner_mut().start_writing(start, end)
    }

    /// Like [`start_writing`](Self::start_writing), also adopting the
    /// indentation of the line containing `start`.
    ///
    /// # Errors
    ///
    /// Fails when the range is invalid.
    pub fn start_writing_aligned(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        self.set_position_aligned(start)?;
        self.out.inner_mut().start_writing(start, end)
    }

    /// Finalize the span declared by [`start_writing`](Self::start_writing).
    ///
    /// # Errors
    ///
    /// Fails when the span no longer fits the snapshot.
    pub fn finish_writing(&mut self) -> Result<(), EditError> {
        self.out.inner_mut().finish_writing()
    }

    /// Finalize the current session replacing `overwrite` original bytes.
    ///
    /// # Errors
    ///
    /// Fails when the span runs past the end of the snapshot.
    pub fn finish_writing_with(&mut self, overwrite: usize) -> Result<(), EditError> {
        self.out.inner_mut().finish_writing_with(overwrite)
    }

    // ------------------------------------------------------------------
    // Indentation
    // ------------------------------------------------------------------

    /// Indent one level deeper.
    pub fn push_indent(&mut self) {
        self.out.push_indent();
    }

    /// Undo the matching [`push_indent`](Self::push_indent).
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] when nothing was pushed.
    pub fn pop_indent(&mut self) -> Result<(), EditError> {
        self.out.pop_indent()
    }

    /// Number of indent pushes not yet popped.
    pub fn indent_depth(&self) -> usize {
        self.out.depth()
    }

    /// Pop until `depth` pushes remain.
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] when fewer pushes exist.
    pub fn restore_indent_depth(&mut self, depth: usize) -> Result<(), EditError> {
        self.out.restore_depth(depth)
    }

    /// Write text whose line breaks must not be indented.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_raw(&mut self, text: &str) -> Result<(), EditError> {
        self.out.write_raw(text)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    fn open(&mut self, token: &str) -> Result<(), EditError> {
        self.out.write(token)?;
        self.out.push_indent();
        self.out.write_line()
    }

    fn close(&mut self, token: &str) -> Result<(), EditError> {
        if self.out.depth() == 0 {
            return Err(EditError::UnbalancedIndent);
        }
        self.out.write_line()?;
        self.out.pop_indent()?;
        self.out.write(token)
    }

    /// `{` and an indented line.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn open_script_block(&mut self) -> Result<(), EditError> {
        self.open("{")
    }

    /// A line break and `}`.
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] without a matching open.
    pub fn close_script_block(&mut self) -> Result<(), EditError> {
        self.close("}")
    }

    /// `keyword {`, for `begin`, `process`, `end` and friends.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn open_named_block(&mut self, keyword: &str) -> Result<(), EditError> {
        self.out.write(keyword)?;
        self.out.write(" ")?;
        self.open("{")
    }

    /// `@{` and an indented line.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn open_hashtable(&mut self) -> Result<(), EditError> {
        self.open("@{")
    }

    /// A line break and `}`.
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] without a matching open.
    pub fn close_hashtable(&mut self) -> Result<(), EditError> {
        self.close("}")
    }

    /// `param(` and an indented line.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn open_param_block(&mut self) -> Result<(), EditError> {
        self.open("param(")
    }

    /// A line break and `)`.
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] without a matching open.
    pub fn close_param_block(&mut self) -> Result<(), EditError> {
        self.close(")")
    }

    /// `[Name(arguments)]` or `[Name()]`.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_attribute(&mut self, name: &str, arguments: &[&str]) -> Result<(), EditError> {
        self.out.write("[")?;
        self.out.write(name)?;
        self.out.write("(")?;
        self.out.write(&arguments.join(", "))?;
        self.out.write(")]")
    }

    /// `[type] $name`, or `$name` when untyped.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_parameter(&mut self, ty: Option<&TypeName>, name: &str) -> Result<(), EditError> {
        if let Some(ty) = ty {
            self.write_type_expression(ty)?;
            self.out.write(" ")?;
        }
        self.write_variable(name)
    }

    /// `,` followed by a blank line, between parameters.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn separate_parameters(&mut self) -> Result<(), EditError> {
        self.out.write(",")?;
        self.out.write_line()?;
        self.out.write_line()
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    /// String literal in the requested quoting style.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_string(&mut self, value: &str, kind: StringKind) -> Result<(), EditError> {
        self.out.write_raw(&render_string(value, kind))
    }

    /// Integer literal.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_int(&mut self, value: i64) -> Result<(), EditError> {
        self.out.write(&render_int(value))
    }

    /// Floating point literal.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_float(&mut self, value: f64) -> Result<(), EditError> {
        self.out.write(&render_float(value))
    }

    /// `$true` or `$false`.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_bool(&mut self, value: bool) -> Result<(), EditError> {
        self.out.write(render_bool(value))
    }

    /// `$null`.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_null(&mut self) -> Result<(), EditError> {
        self.out.write("$null")
    }

    /// Variable reference.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_variable(&mut self, name: &str) -> Result<(), EditError> {
        self.out.write_raw(&render_variable(name))
    }

    /// `$name = `.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_assignment(&mut self, name: &str) -> Result<(), EditError> {
        self.write_variable(name)?;
        self.out.write(" = ")
    }

    /// `@name`.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_splat(&mut self, name: &str) -> Result<(), EditError> {
        self.out.write("@")?;
        self.out.write(name)
    }

    /// `Key = `, quoting the key when needed.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_hashtable_key(&mut self, key: &str) -> Result<(), EditError> {
        self.out.write_raw(&render_key(key))?;
        self.out.write(" = ")
    }

    /// Enum value: `[Type]::Member`, or `[Type]'A, B'` for combined flags.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_enum(&mut self, ty: &TypeName, members: &[&str]) -> Result<(), EditError> {
        self.write_type_expression(ty)?;
        match members {
            [] => self.out.write("0"),
            [member] => {
                self.out.write("::")?;
                self.out.write(member)
            }
            many => self.out.write_raw(&quote_literal(&many.join(", "))),
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    /// `[Name]`, or a runtime lookup for types that cannot be named.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_type_expression(&mut self, ty: &TypeName) -> Result<(), EditError> {
        if !ty.is_public {
            let lookup = self.render_type_lookup(ty);
            return self.out.write(&lookup);
        }
        let name = self.render_type_name(ty);
        self.out.write("[")?;
        self.out.write(&name)?;
        self.out.write("]")
    }

    /// The bare type name, as used inside generic arguments or strings.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_type_name(&mut self, ty: &TypeName) -> Result<(), EditError> {
        let name = self.render_type_name(ty);
        self.out.write(&name)
    }

    fn render_type_name(&mut self, ty: &TypeName) -> String {
        let full_name = ty.full_name();
        let accelerated = if self.settings.use_type_accelerators && ty.generic_args.is_empty() {
            self.accelerators.lookup(&full_name).map(str::to_string)
        } else {
            None
        };

        let mut rendered = match (accelerated, &ty.namespace, self.settings.type_name_policy) {
            (Some(alias), _, _) => alias,
            (None, Some(namespace), TypeNamePolicy::DropNamespace) => match &self.imported {
                None => {
                    self.pending_imports.insert(namespace.clone());
                    ty.name.clone()
                }
                Some(imported)
                    if imported
                        .iter()
                        .any(|existing| existing.eq_ignore_ascii_case(namespace)) =>
                {
                    ty.name.clone()
                }
                // The block is already written; only a qualified name resolves.
                Some(_) => {
                    debug!(namespace = %namespace, "import block written; keeping namespace");
                    full_name
                }
            },
            (None, _, _) => full_name,
        };

        if !ty.generic_args.is_empty() {
            let args: Vec<String> = ty
                .generic_args
                .iter()
                .map(|arg| self.render_type_name(arg))
                .collect();
            rendered.push('[');
            rendered.push_str(&args.join(", "));
            rendered.push(']');
        }
        rendered.push_str(&ty.array_suffix());
        rendered
    }

    fn render_type_lookup(&mut self, ty: &TypeName) -> String {
        let literal = quote_literal(&ty.full_name());
        match ty.lookup_anchor.as_deref() {
            Some(anchor) => {
                let anchor_name = self.render_type_name(anchor);
                format!("([{anchor_name}].Assembly.GetType({literal}))")
            }
            None => {
                let system_type = self.render_type_name(&TypeName::new("System", "Type"));
                format!("([{system_type}]::GetType({literal}))")
            }
        }
    }

    // ------------------------------------------------------------------
    // Comments and wrapped text
    // ------------------------------------------------------------------

    fn wrap_width(&self, reserved: usize) -> usize {
        self.settings
            .max_line_length
            .saturating_sub(self.out.indent_columns() + reserved)
            .max(1)
    }

    /// Write `text` wrapped to the configured line length.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_wrapped(&mut self, text: &str) -> Result<(), EditError> {
        let width = self.wrap_width(0);
        self.write_lines(&wrap_text(text, width), "")
    }

    /// `# ` comment lines wrapped to the configured line length.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_comment(&mut self, text: &str) -> Result<(), EditError> {
        let width = self.wrap_width(COMMENT_PREFIX.len());
        self.write_lines(&wrap_text(text, width), COMMENT_PREFIX)
    }

    /// `<#` ... `#>` block comment with indented, wrapped content.
    ///
    /// # Errors
    ///
    /// Fails when the writer is closed.
    pub fn write_block_comment(&mut self, text: &str) -> Result<(), EditError> {
        self.open("<#")?;
        let width = self.wrap_width(0);
        self.write_lines(&wrap_text(text, width), "")?;
        self.close("#>")
    }

    fn write_lines(&mut self, lines: &[String], prefix: &str) -> Result<(), EditError> {
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                self.out.write_line()?;
            }
            if line.is_empty() {
                self.out.write(prefix.trim_end())?;
            } else {
                self.out.write(prefix)?;
                self.out.write(line)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Chains
    // ------------------------------------------------------------------

    /// Start writing a chain of method calls on the expression just written.
    pub fn method_chain(&mut self) -> MethodChainWriter<'_> {
        MethodChainWriter::new(self)
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Write the pending namespaces into the document's import block.
    ///
    /// Runs once per session. New namespaces are merged into the first run
    /// of consecutive `using` lines, which is replaced as a whole; comments
    /// and later statements are left alone. Without a block, a new block and
    /// one blank line are inserted at the top. Namespaces already imported
    /// are not repeated. Types written afterwards keep their namespace
    /// unless it is already imported.
    ///
    /// The block edit shares offset 0 with any rewrite starting there. A
    /// caller replacing the whole document must not write the old `using`
    /// lines again, or the document ends up with two blocks.
    ///
    /// # Errors
    ///
    /// Fails when pending output cannot be finalized.
    pub fn flush_imports(&mut self) -> Result<(), EditError> {
        if self.imported.is_some() {
            return Ok(());
        }

        let pending = std::mem::take(&mut self.pending_imports);
        let existing = ImportBlock::scan(self.document());
        let added: Vec<String> = pending
            .into_iter()
            .filter(|namespace| !existing.contains(namespace))
            .collect();
        if added.is_empty() {
            self.imported = Some(existing.namespaces);
            return Ok(());
        }

        let namespaces = merge_namespaces(
            existing.namespaces.iter().take(existing.spanned).map(String::as_str),
            added.iter().map(String::as_str),
        );
        let newline = self.settings.line_ending.as_str();
        let block = render_imports(&namespaces, newline);
        debug!(
            count = namespaces.len(),
            added = added.len(),
            replace = existing.span.is_some(),
            "writing import block"
        );
        self.imported = Some(existing.namespaces.iter().cloned().chain(added).collect());

        let tracker = self.out.inner_mut();
        match existing.span {
            Some((start, end)) => tracker.replace_before(start, end, &block),
            None => tracker.insert_before(0, &format!("{block}{newline}{newline}")),
        }
    }

    /// Flush imports and return the reduced edits.
    ///
    /// Unbalanced structure is not detected here.
    ///
    /// # Errors
    ///
    /// Fails when pending output cannot be finalized or the edits overlap.
    pub fn edits(&mut self) -> Result<Vec<DocumentEdit>, EditError> {
        self.flush_imports()?;
        self.out.inner_mut().edits()
    }

    /// Flush, close the session and return the reduced edits.
    ///
    /// # Errors
    ///
    /// Same as [`edits`](Self::edits).
    pub fn into_edits(mut self) -> Result<Vec<DocumentEdit>, EditError> {
        self.flush_imports()?;
        let tracker = self.out.inner_mut();
        tracker.close()?;
        tracker.edits()
    }
}

impl Sink for ScriptWriter {
    fn write(&mut self, text: &str) -> Result<(), EditError> {
        self.out.write(text)
    }

    fn write_line(&mut self) -> Result<(), EditError> {
        self.out.write_line()
    }

    fn set_position(&mut self, offset: usize) -> Result<(), EditError> {
        self.out.set_position(offset)
    }
}
