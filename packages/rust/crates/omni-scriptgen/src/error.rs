//! Error types for writer settings.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for loading writer settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid YAML for the settings schema.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
