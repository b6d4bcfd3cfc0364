//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Media files to inspect
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Report format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Video files, in join order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Report format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the concat command
#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// Video files, in join order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Join mode (auto, copy, reencode)
    #[arg(long, default_value = "auto")]
    pub mode: String,

    /// Re-encode resolution as WIDTHxHEIGHT (default: largest input)
    #[arg(long)]
    pub resolution: Option<String>,

    /// Re-encode frame rate (default: highest input)
    #[arg(long)]
    pub fps: Option<f64>,

    /// Video encoder for re-encoding (default: from configuration)
    #[arg(long)]
    pub video_codec: Option<String>,

    /// Audio encoder for re-encoding
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Video bitrate for re-encoding, e.g. 5000k
    #[arg(long)]
    pub video_bitrate: Option<String>,

    /// Audio bitrate for re-encoding, e.g. 192k
    #[arg(long)]
    pub audio_bitrate: Option<String>,

    /// Print the plan as JSON instead of running ffmpeg
    #[arg(long)]
    pub plan_only: bool,
}

/// Arguments for the mix command
#[derive(Args, Debug)]
pub struct MixArgs {
    /// Video file
    #[arg(long)]
    pub video: PathBuf,

    /// Audio file laid under the video
    #[arg(long)]
    pub audio: PathBuf,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Blend with the video's own audio instead of replacing it
    #[arg(long)]
    pub keep_original: bool,

    /// Play the audio once; a shorter track leaves trailing silence
    #[arg(long)]
    pub no_loop: bool,

    /// Volume of the added audio (0.0 to 1.0)
    #[arg(long, default_value_t = 1.0)]
    pub audio_volume: f64,

    /// Volume of the video's own audio when blending (0.0 to 1.0)
    #[arg(long, default_value_t = 0.0)]
    pub original_volume: f64,

    /// Encoder for the new audio track (default: from configuration)
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Bitrate for the new audio track, e.g. 192k
    #[arg(long)]
    pub audio_bitrate: Option<String>,

    /// Print the plan as JSON instead of running ffmpeg
    #[arg(long)]
    pub plan_only: bool,
}
