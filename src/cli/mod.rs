//! CLI module for JoinX
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{CheckArgs, ConcatArgs, InspectArgs, MixArgs};

/// JoinX CLI Video Joiner
///
/// Joins video files losslessly when they match and re-encodes them to a
/// common profile when they don't. Also lays background audio under a video.
#[derive(Parser, Debug)]
#[command(name = "joiner")]
#[command(about = "JoinX CLI Video Joiner - Safe video concatenation and audio mixing")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, env = "JOINX_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: String,

    /// Configuration file (default: ./joinx.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, global = true)]
    pub ffmpeg: Option<String>,

    /// ffprobe executable
    #[arg(long, global = true)]
    pub ffprobe: Option<String>,

    /// Time limit for one ffmpeg run, in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory for concat list files
    #[arg(long, global = true)]
    pub temp_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the measured properties of media files
    Inspect(InspectArgs),
    /// Check whether files can be joined without re-encoding
    Check(CheckArgs),
    /// Join files in the given order
    Concat(ConcatArgs),
    /// Replace or blend a video's audio with another track
    Mix(MixArgs),
    /// Check that ffmpeg and ffprobe can be run and show their versions
    Doctor,
}
