// Inspect interactor - Orchestrates media file inspection use case

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::info;

use crate::app::OutputFormat;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::probe::MediaInspector;

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    inspector: MediaInspector,
}

impl InspectInteractor {
    /// Create new inspect interactor
    pub fn new(inspector: MediaInspector) -> Self {
        Self { inspector }
    }

    /// Inspect every requested file and render a summary
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        if request.paths.is_empty() {
            return Err(DomainError::BadArgs("No input files given".to_string()));
        }
        info!("Starting media file inspection for {} files", request.paths.len());

        let descriptors = self.inspector.inspect_all(&request.paths).await?;
        let summary = match request.format.render(&descriptors)? {
            Some(rendered) => rendered,
            None => format_as_text(&descriptors),
        };

        Ok(InspectResponse { descriptors, summary })
    }
}

fn format_as_text(descriptors: &[MediaDescriptor]) -> String {
    let mut output = String::new();
    for descriptor in descriptors {
        let _ = writeln!(output, "{}:", descriptor.path().display());
        let _ = writeln!(output, "  Duration:   {:.3}s", descriptor.duration_seconds());
        let _ = writeln!(
            output,
            "  Video:      {} {} @ {:.3} fps{}",
            descriptor.video_codec(),
            descriptor.resolution(),
            descriptor.frame_rate(),
            bitrate_suffix(descriptor.video_bitrate())
        );
        match descriptor.audio_codec() {
            Some(codec) => {
                let _ = writeln!(output, "  Audio:      {}{}", codec, bitrate_suffix(descriptor.audio_bitrate()));
            }
            None => {
                let _ = writeln!(output, "  Audio:      none");
            }
        }
    }
    output
}

fn bitrate_suffix(bitrate: Option<u64>) -> String {
    bitrate
        .map(|bits| format!(", {} kb/s", bits / 1000))
        .unwrap_or_default()
}

/// Request for media file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
}

/// Response from media file inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub descriptors: Vec<MediaDescriptor>,
    pub summary: String,
}
