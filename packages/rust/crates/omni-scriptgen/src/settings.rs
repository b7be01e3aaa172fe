//! Writer settings loader.
//!
//! Loads and merges:
//! - System defaults: usually shipped next to the host
//! - User overrides: usually under the user's config home
//!
//! Merge precedence is user over system. Paths are always passed in
//! explicitly; there is no process-wide settings instance.
//!
//! ```yaml
//! writer:
//!   indent_style: spaces
//!   indent_size: 4
//!   line_ending: lf
//!   max_line_length: 120
//!   type_name_policy: drop_namespace
//!   use_type_accelerators: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

const DEFAULT_INDENT_SIZE: usize = 4;
const DEFAULT_MAX_LINE_LENGTH: usize = 120;

/// How type names are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNamePolicy {
    /// `System.IO.Path`
    #[default]
    FullName,
    /// `Path`, with `System.IO` added to the import block.
    DropNamespace,
}

/// Indentation character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    /// Runs of spaces.
    #[default]
    Spaces,
    /// One tab per level.
    Tabs,
}

/// Line break sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    /// The line break characters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Resolved settings for one writer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterSettings {
    /// Indentation character.
    pub indent_style: IndentStyle,
    /// Spaces per level when indenting with spaces.
    pub indent_size: usize,
    /// Line break sequence.
    pub line_ending: LineEnding,
    /// Column limit for wrapped comments and text.
    pub max_line_length: usize,
    /// How type names are written.
    pub type_name_policy: TypeNamePolicy,
    /// Whether accelerators like `string` replace full type names.
    pub use_type_accelerators: bool,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Spaces,
            indent_size: DEFAULT_INDENT_SIZE,
            line_ending: LineEnding::Lf,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            type_name_policy: TypeNamePolicy::FullName,
            use_type_accelerators: true,
        }
    }
}

impl WriterSettings {
    /// Text written once per indent level.
    #[must_use]
    pub fn indent_text(&self) -> String {
        match self.indent_style {
            IndentStyle::Spaces => " ".repeat(self.indent_size),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }

    /// Parse settings from YAML, filling unset values with defaults.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Yaml`] when the text does not match the schema.
    pub fn from_yaml_str(raw: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_yaml::from_str(raw)?;
        Ok(Self::default().apply(file.writer))
    }

    /// Read and parse one settings file.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Io`] when the file cannot be read and
    /// [`SettingsError::Yaml`] when it cannot be parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Overlay the values set in `overlay`.
    #[must_use]
    pub fn apply(self, overlay: WriterSettingsOverlay) -> Self {
        Self {
            indent_style: overlay.indent_style.unwrap_or(self.indent_style),
            indent_size: overlay.indent_size.unwrap_or(self.indent_size),
            line_ending: overlay.line_ending.unwrap_or(self.line_ending),
            max_line_length: overlay.max_line_length.unwrap_or(self.max_line_length),
            type_name_policy: overlay.type_name_policy.unwrap_or(self.type_name_policy),
            use_type_accelerators: overlay
                .use_type_accelerators
                .unwrap_or(self.use_type_accelerators),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    writer: WriterSettingsOverlay,
}

/// Partially specified settings as read from one file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriterSettingsOverlay {
    /// Indentation character.
    pub indent_style: Option<IndentStyle>,
    /// Spaces per level.
    pub indent_size: Option<usize>,
    /// Line break sequence.
    pub line_ending: Option<LineEnding>,
    /// Column limit.
    pub max_line_length: Option<usize>,
    /// Type name policy.
    pub type_name_policy: Option<TypeNamePolicy>,
    /// Accelerator use.
    pub use_type_accelerators: Option<bool>,
}

impl WriterSettingsOverlay {
    fn merge(self, overlay: Self) -> Self {
        Self {
            indent_style: overlay.indent_style.or(self.indent_style),
            indent_size: overlay.indent_size.or(self.indent_size),
            line_ending: overlay.line_ending.or(self.line_ending),
            max_line_length: overlay.max_line_length.or(self.max_line_length),
            type_name_policy: overlay.type_name_policy.or(self.type_name_policy),
            use_type_accelerators: overlay.use_type_accelerators.or(self.use_type_accelerators),
        }
    }
}

/// Load merged writer settings (user overrides system).
///
/// Missing files contribute nothing. Unreadable or invalid files are logged
/// and ignored.
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> WriterSettings {
    let merged = load_one(system).merge(load_one(user));
    WriterSettings::default().apply(merged)
}

fn load_one(path: &Path) -> WriterSettingsOverlay {
    if !path.exists() {
        return WriterSettingsOverlay::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return WriterSettingsOverlay::default();
        }
    };
    match serde_yaml::from_str::<SettingsFile>(&raw) {
        Ok(value) => value.writer,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            WriterSettingsOverlay::default()
        }
    }
}
