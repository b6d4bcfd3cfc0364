// Domain errors - Error types for the domain layer

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::model::Dimension;

/// Why a probe could not produce usable metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailureKind {
    /// The file does not exist or cannot be opened
    FileNotFound,
    /// The file has no stream the planner can work with
    NoDecodableStream,
    /// The probing tool could not be run, timed out or exited non-zero
    ToolExecution,
    /// The tool ran but a required field was missing or not a finite positive number
    MalformedMetadata,
}

impl fmt::Display for ProbeFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProbeFailureKind::FileNotFound => "file not found",
            ProbeFailureKind::NoDecodableStream => "no decodable stream",
            ProbeFailureKind::ToolExecution => "probe tool failed",
            ProbeFailureKind::MalformedMetadata => "malformed metadata",
        };
        f.write_str(text)
    }
}

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Input could not be probed; never retried
    #[error("Probe failed for {path}: {kind}: {detail}")]
    Probe {
        path: PathBuf,
        kind: ProbeFailureKind,
        detail: String,
    },

    /// A multi-file operation received too few inputs
    #[error("At least {required} inputs are required, got {actual}")]
    InsufficientInputs { required: usize, actual: usize },

    /// A lossless join was requested on inputs that differ
    #[error("Inputs cannot be stream-copied, mismatched: {}", format_dimensions(.mismatches))]
    IncompatibleInputs { mismatches: BTreeSet<Dimension> },

    /// A volume parameter was outside [0, 1]
    #[error("Invalid {parameter}: {value} (expected a value between 0.0 and 1.0)")]
    InvalidVolume { parameter: &'static str, value: f64 },

    /// An explicit re-encode target was unusable
    #[error("Invalid {parameter}: {value}")]
    InvalidTarget { parameter: &'static str, value: String },

    /// Blending was requested but the video carries no audio track
    #[error("Cannot blend audio: {path} has no audio track")]
    MissingAudioTrack { path: PathBuf },

    /// A descriptor was built with values that break its invariants
    #[error("Invalid media descriptor: {0}")]
    InvalidDescriptor(String),

    /// Configuration file or value is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// A report could not be rendered
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Shorthand for a probe failure
    pub fn probe(path: impl Into<PathBuf>, kind: ProbeFailureKind, detail: impl Into<String>) -> Self {
        DomainError::Probe {
            path: path.into(),
            kind,
            detail: detail.into(),
        }
    }

    /// Probe failure kind, if this is a probe error
    pub fn probe_kind(&self) -> Option<ProbeFailureKind> {
        match self {
            DomainError::Probe { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

fn format_dimensions(dimensions: &BTreeSet<Dimension>) -> String {
    dimensions
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
