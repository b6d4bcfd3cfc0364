// Application layer - Use case interactors

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::DomainError;

pub mod concat_interactor;
pub mod container;
pub mod inspect_interactor;
pub mod mix_interactor;

// Re-export interactors
pub use concat_interactor::ConcatInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use inspect_interactor::InspectInteractor;
pub use mix_interactor::MixInteractor;

/// How reports are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse an output format from user input
    pub fn parse(format_str: &str) -> Result<Self, DomainError> {
        match format_str.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid output format: {}. Valid formats: text, json, yaml",
                format_str
            ))),
        }
    }

    /// Render `value` as JSON or YAML; `None` for text, which each report formats itself
    pub(crate) fn render<T: Serialize>(&self, value: &T) -> Result<Option<String>, DomainError> {
        match self {
            OutputFormat::Text => Ok(None),
            OutputFormat::Json => serde_json::to_string_pretty(value)
                .map(Some)
                .map_err(|e| DomainError::Serialization(format!("JSON serialization failed: {}", e))),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map(Some)
                .map_err(|e| DomainError::Serialization(format!("YAML serialization failed: {}", e))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

/// Whether two spellings name the same file.
///
/// Existing files are compared by their canonical path, so symlinks and
/// `./` prefixes resolve; a path that does not exist yet is made absolute
/// against the working directory.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).or_else(|_| std::path::absolute(path)).ok()
}
