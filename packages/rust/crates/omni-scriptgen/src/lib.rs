#![allow(clippy::doc_markdown)]

//! omni-scriptgen - Structured script writer
//!
//! Language-aware layer over [`omni_edit::EditTrackingWriter`]: lazy
//! indentation, structural blocks, literal rendering, type expressions,
//! comment wrapping and `using namespace` batching. Output is always a set of
//! document edits, never a whole new file.
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-scriptgen/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # SettingsError
//! ├── settings.rs # WriterSettings, layered YAML loading
//! ├── types.rs    # TypeName, TypeAccelerators
//! ├── literals.rs # Strings, numbers, variables, keys
//! ├── wrap.rs     # Word wrapping
//! ├── imports.rs  # using namespace block
//! ├── writer.rs   # ScriptWriter
//! └── chain.rs    # MethodChainWriter
//! ```

mod chain;
mod error;
mod imports;
mod literals;
mod settings;
mod types;
mod wrap;
mod writer;

pub use chain::MethodChainWriter;
pub use error::SettingsError;
pub use imports::{merge_namespaces, render_imports, ImportBlock};
pub use literals::{
    here_string, quote_expandable, quote_literal, render_bool, render_float, render_int,
    render_key, render_string, render_variable, StringKind,
};
pub use settings::{
    load_settings_from_paths, IndentStyle, LineEnding, TypeNamePolicy, WriterSettings,
    WriterSettingsOverlay,
};
pub use types::{TypeAccelerators, TypeName};
pub use wrap::wrap_text;
pub use writer::ScriptWriter;

pub use omni_edit::{DocumentEdit, EditError, Sink};
