// Domain models - Core types and data structures

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Frame size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels in one frame
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Both sides are non-zero
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = DomainError;

    /// Parse `WIDTHxHEIGHT` (e.g. `1920x1080`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| DomainError::BadArgs(format!("Invalid resolution '{}', expected WIDTHxHEIGHT", s)))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid resolution width in '{}'", s)))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid resolution height in '{}'", s)))?;
        Ok(Self { width, height })
    }
}

/// Measured properties of one media file with a video stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    path: PathBuf,
    duration_seconds: f64,
    resolution: Resolution,
    frame_rate: f64,
    video_codec: String,
    audio_codec: Option<String>,
    video_bitrate: Option<u64>,
    audio_bitrate: Option<u64>,
}

impl MediaDescriptor {
    /// Create a descriptor, rejecting values that would corrupt comparisons
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        path: impl Into<PathBuf>,
        duration_seconds: f64,
        resolution: Resolution,
        frame_rate: f64,
        video_codec: impl Into<String>,
        audio_codec: Option<String>,
        video_bitrate: Option<u64>,
        audio_bitrate: Option<u64>,
    ) -> Result<Self, DomainError> {
        if !is_finite_positive(duration_seconds) {
            return Err(DomainError::InvalidDescriptor(format!(
                "duration must be a finite positive number, got {}",
                duration_seconds
            )));
        }
        if !is_finite_positive(frame_rate) {
            return Err(DomainError::InvalidDescriptor(format!(
                "frame rate must be a finite positive number, got {}",
                frame_rate
            )));
        }
        if !resolution.is_valid() {
            return Err(DomainError::InvalidDescriptor(format!(
                "resolution cannot have a zero side, got {}",
                resolution
            )));
        }
        let video_codec = video_codec.into();
        if video_codec.is_empty() {
            return Err(DomainError::InvalidDescriptor("video codec cannot be empty".to_string()));
        }

        Ok(Self {
            path: path.into(),
            duration_seconds,
            resolution,
            frame_rate,
            video_codec,
            audio_codec,
            video_bitrate,
            audio_bitrate,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn video_codec(&self) -> &str {
        &self.video_codec
    }

    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    pub fn video_bitrate(&self) -> Option<u64> {
        self.video_bitrate
    }

    pub fn audio_bitrate(&self) -> Option<u64> {
        self.audio_bitrate
    }

    /// Whether the file carries an audio stream
    pub fn has_audio(&self) -> bool {
        self.audio_codec.is_some()
    }
}

/// Measured properties of an audio source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDescriptor {
    path: PathBuf,
    duration_seconds: f64,
    codec: String,
    bitrate: Option<u64>,
}

impl AudioDescriptor {
    /// Create an audio descriptor; duration must be finite and positive
    pub fn new(
        path: impl Into<PathBuf>,
        duration_seconds: f64,
        codec: impl Into<String>,
        bitrate: Option<u64>,
    ) -> Result<Self, DomainError> {
        if !is_finite_positive(duration_seconds) {
            return Err(DomainError::InvalidDescriptor(format!(
                "audio duration must be a finite positive number, got {}",
                duration_seconds
            )));
        }
        Ok(Self {
            path: path.into(),
            duration_seconds,
            codec: codec.into(),
            bitrate,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    pub fn bitrate(&self) -> Option<u64> {
        self.bitrate
    }
}

/// A stream property that must match for a stream-copy join
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Resolution,
    FrameRate,
    VideoCodec,
    AudioCodec,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Dimension::Resolution => "resolution",
            Dimension::FrameRate => "frame_rate",
            Dimension::VideoCodec => "video_codec",
            Dimension::AudioCodec => "audio_codec",
        };
        f.write_str(text)
    }
}

/// How inputs are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    /// Copy encoded bitstreams (fast, lossless)
    StreamCopy,
    /// Decode and re-encode every input to a common profile
    Reencode,
}

impl JoinMode {
    /// Parse a join mode from user input
    pub fn parse(mode_str: &str) -> Result<Self, DomainError> {
        match mode_str.to_lowercase().as_str() {
            "copy" | "stream_copy" | "stream-copy" => Ok(JoinMode::StreamCopy),
            "reencode" | "re-encode" => Ok(JoinMode::Reencode),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid join mode: {}. Valid modes: copy, reencode",
                mode_str
            ))),
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinMode::StreamCopy => f.write_str("stream_copy"),
            JoinMode::Reencode => f.write_str("reencode"),
        }
    }
}

/// Result of comparing a set of inputs against each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityVerdict {
    mismatches: BTreeSet<Dimension>,
}

impl CompatibilityVerdict {
    /// Build a verdict from the accumulated mismatches
    pub fn from_mismatches(mismatches: BTreeSet<Dimension>) -> Self {
        Self { mismatches }
    }

    pub fn is_compatible(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn mismatches(&self) -> &BTreeSet<Dimension> {
        &self.mismatches
    }

    pub fn recommended_mode(&self) -> JoinMode {
        if self.is_compatible() {
            JoinMode::StreamCopy
        } else {
            JoinMode::Reencode
        }
    }
}

/// Encoder settings for re-encoding, in ffmpeg syntax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub video_bitrate: String,
    pub audio_bitrate: String,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            video_bitrate: "5000k".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Target all inputs are converted to before a re-encode join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonizationProfile {
    pub resolution: Resolution,
    pub frame_rate: f64,
    pub codecs: CodecSettings,
}

/// Per-call encoder settings; `None` keeps the configured default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecOverrides {
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub video_bitrate: Option<String>,
    pub audio_bitrate: Option<String>,
}

impl CodecOverrides {
    /// `defaults` with every set override applied
    pub fn apply(&self, defaults: &CodecSettings) -> CodecSettings {
        let pick = |value: &Option<String>, default: &String| value.clone().unwrap_or_else(|| default.clone());
        CodecSettings {
            video_codec: pick(&self.video_codec, &defaults.video_codec),
            audio_codec: pick(&self.audio_codec, &defaults.audio_codec),
            video_bitrate: pick(&self.video_bitrate, &defaults.video_bitrate),
            audio_bitrate: pick(&self.audio_bitrate, &defaults.audio_bitrate),
        }
    }
}

/// Explicit re-encode targets; `None` means "use the maximum observed"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReencodeTargets {
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<f64>,
    pub codecs: CodecOverrides,
}

/// One ordered input of a concatenation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedInput {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub has_audio: bool,
}

impl From<&MediaDescriptor> for PlannedInput {
    fn from(descriptor: &MediaDescriptor) -> Self {
        Self {
            path: descriptor.path().to_path_buf(),
            duration_seconds: descriptor.duration_seconds(),
            has_audio: descriptor.has_audio(),
        }
    }
}

/// Join strategy; the harmonization profile only exists for re-encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JoinStrategy {
    StreamCopy,
    Reencode(HarmonizationProfile),
}

/// Executable plan for joining inputs in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcatenationPlan {
    inputs: Vec<PlannedInput>,
    strategy: JoinStrategy,
}

impl ConcatenationPlan {
    /// Stream-copy plan; only the planner builds these after a clean verdict
    pub(crate) fn stream_copy(inputs: Vec<PlannedInput>) -> Self {
        Self {
            inputs,
            strategy: JoinStrategy::StreamCopy,
        }
    }

    /// Re-encode plan with a complete harmonization profile
    pub(crate) fn reencode(inputs: Vec<PlannedInput>, profile: HarmonizationProfile) -> Self {
        Self {
            inputs,
            strategy: JoinStrategy::Reencode(profile),
        }
    }

    pub fn inputs(&self) -> &[PlannedInput] {
        &self.inputs
    }

    /// Input paths in join order
    pub fn paths(&self) -> Vec<&Path> {
        self.inputs.iter().map(|i| i.path.as_path()).collect()
    }

    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    pub fn mode(&self) -> JoinMode {
        match self.strategy {
            JoinStrategy::StreamCopy => JoinMode::StreamCopy,
            JoinStrategy::Reencode(_) => JoinMode::Reencode,
        }
    }

    pub fn profile(&self) -> Option<&HarmonizationProfile> {
        match &self.strategy {
            JoinStrategy::StreamCopy => None,
            JoinStrategy::Reencode(profile) => Some(profile),
        }
    }

    /// Sum of input durations, the expected output length
    pub fn total_duration_seconds(&self) -> f64 {
        self.inputs.iter().map(|i| i.duration_seconds).sum()
    }
}

/// What happens to the video's own audio track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AudioTrackMode {
    /// The external audio becomes the only audio track
    Replace,
    /// Original and external audio are mixed at their own volumes
    Blend { original_volume: f64 },
}

/// How the external audio covers the video's duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioCoverage {
    /// The audio is at least as long as the video
    Full,
    /// The audio repeats from its start `passes` times, then is cut at the video's end
    Looped { passes: u32 },
    /// The audio is shorter and looping is off; the remainder is silent
    Padded,
}

/// Request parameters for an audio mix
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMixRequest {
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
    pub replace_original: bool,
    pub loop_audio: bool,
    pub audio_volume: f64,
    pub original_volume: f64,
    /// Encoder for the new audio track; configured default when `None`
    pub audio_codec: Option<String>,
    pub audio_bitrate: Option<String>,
}

impl AudioMixRequest {
    /// Request with the usual background-music defaults: replace, loop, full volume
    pub fn new(video_path: impl Into<PathBuf>, audio_path: impl Into<PathBuf>) -> Self {
        Self {
            video_path: video_path.into(),
            audio_path: audio_path.into(),
            replace_original: true,
            loop_audio: true,
            audio_volume: 1.0,
            original_volume: 0.0,
            audio_codec: None,
            audio_bitrate: None,
        }
    }
}

/// Executable plan for overlaying or replacing a video's audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMixPlan {
    video_path: PathBuf,
    audio_path: PathBuf,
    track_mode: AudioTrackMode,
    loop_audio: bool,
    audio_volume: f64,
    video_duration_seconds: f64,
    audio_duration_seconds: f64,
    coverage: AudioCoverage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_bitrate: Option<String>,
}

impl AudioMixPlan {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        video_path: PathBuf,
        audio_path: PathBuf,
        track_mode: AudioTrackMode,
        loop_audio: bool,
        audio_volume: f64,
        video_duration_seconds: f64,
        audio_duration_seconds: f64,
        coverage: AudioCoverage,
    ) -> Self {
        Self {
            video_path,
            audio_path,
            track_mode,
            loop_audio,
            audio_volume,
            video_duration_seconds,
            audio_duration_seconds,
            coverage,
            audio_codec: None,
            audio_bitrate: None,
        }
    }

    /// Encoder settings for the new audio track that override the configured defaults
    pub(crate) fn with_audio_encoding(mut self, codec: Option<String>, bitrate: Option<String>) -> Self {
        self.audio_codec = codec;
        self.audio_bitrate = bitrate;
        self
    }

    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    pub fn audio_bitrate(&self) -> Option<&str> {
        self.audio_bitrate.as_deref()
    }

    pub fn video_path(&self) -> &Path {
        &self.video_path
    }

    pub fn audio_path(&self) -> &Path {
        &self.audio_path
    }

    pub fn track_mode(&self) -> AudioTrackMode {
        self.track_mode
    }

    pub fn replace_original(&self) -> bool {
        matches!(self.track_mode, AudioTrackMode::Replace)
    }

    /// Volume of the original track; `None` when it is replaced
    pub fn original_volume(&self) -> Option<f64> {
        match self.track_mode {
            AudioTrackMode::Replace => None,
            AudioTrackMode::Blend { original_volume } => Some(original_volume),
        }
    }

    pub fn loop_audio(&self) -> bool {
        self.loop_audio
    }

    pub fn audio_volume(&self) -> f64 {
        self.audio_volume
    }

    pub fn video_duration_seconds(&self) -> f64 {
        self.video_duration_seconds
    }

    pub fn audio_duration_seconds(&self) -> f64 {
        self.audio_duration_seconds
    }

    pub fn coverage(&self) -> AudioCoverage {
        self.coverage
    }

    /// Whether the executor must repeat the audio stream
    pub fn audio_looped(&self) -> bool {
        matches!(self.coverage, AudioCoverage::Looped { .. })
    }

    /// Exact output length; audio is truncated here and never overshoots
    pub fn output_duration_seconds(&self) -> f64 {
        self.video_duration_seconds
    }
}

/// Any plan the execution collaborator can run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "plan", rename_all = "snake_case")]
pub enum ExecutionPlan {
    Concatenation(ConcatenationPlan),
    AudioMix(AudioMixPlan),
}

impl ExecutionPlan {
    /// Length the written file should have
    pub fn expected_duration_seconds(&self) -> f64 {
        match self {
            ExecutionPlan::Concatenation(plan) => plan.total_duration_seconds(),
            ExecutionPlan::AudioMix(plan) => plan.output_duration_seconds(),
        }
    }
}

impl From<ConcatenationPlan> for ExecutionPlan {
    fn from(plan: ConcatenationPlan) -> Self {
        ExecutionPlan::Concatenation(plan)
    }
}

impl From<AudioMixPlan> for ExecutionPlan {
    fn from(plan: AudioMixPlan) -> Self {
        ExecutionPlan::AudioMix(plan)
    }
}

/// Outcome of one execution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub output_path: PathBuf,
    pub succeeded: bool,
    pub error_detail: Option<String>,
    pub elapsed: Duration,
    /// Duration of the written file, once it has been checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_size_bytes: Option<u64>,
}

impl OperationResult {
    /// Successful execution
    pub fn success(output_path: impl Into<PathBuf>, elapsed: Duration) -> Self {
        Self {
            output_path: output_path.into(),
            succeeded: true,
            error_detail: None,
            elapsed,
            output_duration_seconds: None,
            output_size_bytes: None,
        }
    }

    /// Failed execution with captured diagnostics
    pub fn failure(output_path: impl Into<PathBuf>, detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            output_path: output_path.into(),
            succeeded: false,
            error_detail: Some(detail.into()),
            elapsed,
            output_duration_seconds: None,
            output_size_bytes: None,
        }
    }

    /// Record what was measured on the written file
    pub fn with_output_metadata(mut self, duration_seconds: Option<f64>, size_bytes: Option<u64>) -> Self {
        self.output_duration_seconds = duration_seconds;
        self.output_size_bytes = size_bytes;
        self
    }

    /// Turn a run that exited cleanly into a failure because its output is unusable
    pub fn rejected(mut self, detail: impl Into<String>) -> Self {
        self.succeeded = false;
        self.error_detail = Some(detail.into());
        self
    }
}

pub(crate) fn is_finite_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
