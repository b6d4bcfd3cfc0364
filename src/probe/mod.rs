//! Media file inspection and validation module
//!
//! [`ProbeOutput`] mirrors the JSON written by
//! `ffprobe -print_format json -show_format -show_streams`. Every field is
//! optional because ffprobe omits whatever a container does not carry;
//! the [`inspector`] decides which absences are fatal.

use serde::{Deserialize, Serialize};

pub mod inspector;
pub mod validator;

pub use inspector::MediaInspector;

/// Raw probe result for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeOutput {
    /// Container-level information
    pub format: ProbeFormat,
    /// All streams, in file order
    pub streams: Vec<ProbeStream>,
}

/// Container-level fields (numbers arrive as strings)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeFormat {
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
    pub size: Option<String>,
}

/// One stream entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeStream {
    pub index: u32,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub r_frame_rate: Option<String>,
    pub avg_frame_rate: Option<String>,
    pub bit_rate: Option<String>,
    pub duration: Option<String>,
    pub disposition: Option<ProbeDisposition>,
}

/// Stream disposition flags we care about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeDisposition {
    pub attached_pic: u8,
}

impl ProbeOutput {
    /// Parse ffprobe's JSON output
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// First real video stream; cover art (attached pictures) is skipped
    pub fn video_stream(&self) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|s| s.is_type("video") && !s.is_attached_picture())
    }

    /// First audio stream
    pub fn audio_stream(&self) -> Option<&ProbeStream> {
        self.streams.iter().find(|s| s.is_type("audio"))
    }
}

impl ProbeStream {
    fn is_type(&self, codec_type: &str) -> bool {
        self.codec_type.as_deref() == Some(codec_type)
    }

    /// Embedded cover image rather than real video
    pub fn is_attached_picture(&self) -> bool {
        self.disposition.as_ref().is_some_and(|d| d.attached_pic == 1)
    }
}
