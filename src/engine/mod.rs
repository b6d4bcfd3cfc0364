//! ffmpeg command construction
//!
//! Each plan kind has its own builder producing the argument vector (without
//! the executable name). Builders are pure; writing the concat list file and
//! spawning the process is the adapter's job. Paths are passed through as raw
//! OS strings, so file names that are not valid UTF-8 reach ffmpeg unchanged.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::model::CodecSettings;

pub mod audio_mix;
pub mod copy;
pub mod reencode;

/// Sample rate every re-encoded or synthesized audio leg is converted to
pub const AUDIO_SAMPLE_RATE: u32 = 48_000;

/// Channel layout every re-encoded or synthesized audio leg is converted to
pub const AUDIO_CHANNEL_LAYOUT: &str = "stereo";

/// Settings shared by all command builders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Value passed to `-loglevel`
    pub log_level: String,
    /// Encoder settings for audio written by a mix
    pub codecs: CodecSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "error".to_string(),
            codecs: CodecSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Leading arguments of every invocation
    pub(crate) fn base_args(&self) -> ArgList {
        let mut args = ArgList::default();
        args.args(["-y", "-loglevel", self.log_level.as_str()]);
        args
    }
}

/// Argument vector under construction
#[derive(Debug, Default)]
pub(crate) struct ArgList(Vec<OsString>);

impl ArgList {
    pub(crate) fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.0.push(arg.as_ref().to_os_string());
        self
    }

    pub(crate) fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.0.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub(crate) fn into_vec(self) -> Vec<OsString> {
        self.0
    }
}

/// Shortest decimal form of a number (`30`, `29.97`, `0.8`)
pub fn format_decimal(value: f64) -> String {
    let text = format!("{:.6}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Seconds floored to whole microseconds, so a `-t` cut never overshoots
pub fn format_duration(seconds: f64) -> String {
    let micros = (seconds.max(0.0) * 1_000_000.0).floor() as u64;
    format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}

/// Printable form of an argument vector, for logs and tests
pub fn display_args(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

/// Raw bytes of a path as ffmpeg's text inputs expect them
#[cfg(unix)]
pub(crate) fn path_bytes(path: &Path) -> Option<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Some(path.as_os_str().as_bytes().to_vec())
}

/// Raw bytes of a path as ffmpeg's text inputs expect them; `None` when not representable
#[cfg(not(unix))]
pub(crate) fn path_bytes(path: &Path) -> Option<Vec<u8>> {
    path.to_str().map(|s| s.as_bytes().to_vec())
}
