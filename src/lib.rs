//! JoinX CLI Video Joiner Library
//!
//! Plans and runs ffmpeg jobs that join video files in order, losslessly when
//! every input shares the same format and through a common re-encode profile
//! otherwise, and that replace or blend a video's audio with another track.
//!
//! # Features
//!
//! - Parallel media inspection through ffprobe
//! - Compatibility verdicts with the exact mismatching properties
//! - Stream-copy or harmonizing re-encode joins
//! - Looping, padding and volume control for background audio
//! - Written files re-inspected against the planned duration
//!
//! # Usage
//!
//! ```bash
//! joiner check intro.mp4 talk.mp4
//! joiner concat intro.mp4 talk.mp4 -o joined.mp4
//! joiner mix --video joined.mp4 --audio music.mp3 -o final.mp4
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod output;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use adapters::ToolConfig;
pub use domain::errors::{DomainError, ProbeFailureKind};
pub use domain::model::{
    AudioCoverage, AudioDescriptor, AudioMixPlan, AudioMixRequest, CompatibilityVerdict, ConcatenationPlan,
    Dimension, ExecutionPlan, JoinMode, MediaDescriptor, OperationResult, ReencodeTargets, Resolution,
};
pub use output::OutputVerifier;
pub use planner::{AudioMixPlanner, ConcatenationPlanner};
pub use probe::MediaInspector;
