//! Media inspection: raw probe output to validated descriptors

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::ProbePort;
use crate::probe::validator::{parse_bitrate, parse_frame_rate, parse_positive_finite};
use crate::probe::{ProbeOutput, ProbeStream};

/// Inspector that turns probe output into [`MediaDescriptor`]s
///
/// Holds no cache; every call re-probes since files may change between calls.
#[derive(Clone)]
pub struct MediaInspector {
    probe: Arc<dyn ProbePort>,
    max_concurrent: usize,
}

impl MediaInspector {
    /// Create a new inspector probing at most one file per CPU at a time
    pub fn new(probe: Arc<dyn ProbePort>) -> Self {
        Self::with_concurrency(probe, num_cpus::get())
    }

    /// Create an inspector with an explicit cap on in-flight probes
    pub fn with_concurrency(probe: Arc<dyn ProbePort>, max_concurrent: usize) -> Self {
        Self {
            probe,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Inspect a single video file
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn inspect(&self, path: &Path) -> Result<MediaDescriptor, DomainError> {
        let output = self.probe.probe(path).await?;
        let descriptor = describe_video(path, &output)?;
        debug!(
            "Inspected {}: {} @ {:.3} fps, {} video, audio {:?}, {:.3}s",
            path.display(),
            descriptor.resolution(),
            descriptor.frame_rate(),
            descriptor.video_codec(),
            descriptor.audio_codec(),
            descriptor.duration_seconds()
        );
        Ok(descriptor)
    }

    /// Inspect an audio source (may be audio-only)
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn inspect_audio(&self, path: &Path) -> Result<AudioDescriptor, DomainError> {
        let output = self.probe.probe(path).await?;
        describe_audio(path, &output)
    }

    /// Inspect every file concurrently, preserving input order.
    ///
    /// The first failure aborts all inspections still in flight and is returned.
    pub async fn inspect_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<MediaDescriptor>, DomainError> {
        info!("Inspecting {} input files", paths.len());

        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();
        // A task that panics or is cancelled returns nothing; remember its path by task id
        let mut task_paths = HashMap::new();

        for (index, path) in paths.iter().enumerate() {
            let inspector = self.clone();
            let path = path.as_ref().to_path_buf();
            let permits = Arc::clone(&permits);
            let task_path = path.clone();
            let handle = tasks.spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return (index, Err(DomainError::probe(path, ProbeFailureKind::ToolExecution, e.to_string())))
                    }
                };
                (index, inspector.inspect(&path).await)
            });
            task_paths.insert(handle.id(), task_path);
        }

        let mut slots: Vec<Option<MediaDescriptor>> = vec![None; paths.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(descriptor))) => slots[index] = Some(descriptor),
                Ok((_, Err(e))) => {
                    tasks.abort_all();
                    debug!("Aborted {} pending inspections after failure", tasks.len());
                    return Err(e);
                }
                Err(join_error) => {
                    tasks.abort_all();
                    let path = task_paths.remove(&join_error.id()).unwrap_or_default();
                    return Err(DomainError::probe(
                        path,
                        ProbeFailureKind::ToolExecution,
                        format!("inspection task failed: {}", join_error),
                    ));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

fn malformed(path: &Path, detail: impl Into<String>) -> DomainError {
    DomainError::probe(path, ProbeFailureKind::MalformedMetadata, detail)
}

fn undecodable(path: &Path, detail: impl Into<String>) -> DomainError {
    DomainError::probe(path, ProbeFailureKind::NoDecodableStream, detail)
}

/// Container duration, falling back to the stream's own duration
fn duration_of(output: &ProbeOutput, stream: &ProbeStream) -> Option<f64> {
    output
        .format
        .duration
        .as_deref()
        .and_then(parse_positive_finite)
        .or_else(|| stream.duration.as_deref().and_then(parse_positive_finite))
}

fn describe_video(path: &Path, output: &ProbeOutput) -> Result<MediaDescriptor, DomainError> {
    let video = output
        .video_stream()
        .ok_or_else(|| undecodable(path, "no video stream"))?;

    let resolution = match (video.width, video.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Resolution::new(width, height),
        _ => return Err(undecodable(path, "video stream has no frame size")),
    };
    let video_codec = video
        .codec_name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| undecodable(path, "video stream has no codec"))?;

    let duration = duration_of(output, video)
        .ok_or_else(|| malformed(path, format!("duration {:?} is not a positive number", output.format.duration)))?;
    let frame_rate = video
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video.avg_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| malformed(path, format!("frame rate {:?} is not a positive number", video.r_frame_rate)))?;

    let audio = output.audio_stream();
    let audio_codec = audio.map(|a| a.codec_name.clone().unwrap_or_else(|| "unknown".to_string()));

    MediaDescriptor::new(
        path,
        duration,
        resolution,
        frame_rate,
        video_codec,
        audio_codec,
        video.bit_rate.as_deref().and_then(parse_bitrate),
        audio.and_then(|a| a.bit_rate.as_deref()).and_then(parse_bitrate),
    )
    .map_err(|e| malformed(path, e.to_string()))
}

fn describe_audio(path: &Path, output: &ProbeOutput) -> Result<AudioDescriptor, DomainError> {
    let audio = output
        .audio_stream()
        .ok_or_else(|| undecodable(path, "no audio stream"))?;

    let duration = duration_of(output, audio)
        .ok_or_else(|| malformed(path, format!("duration {:?} is not a positive number", output.format.duration)))?;
    let codec = audio.codec_name.clone().unwrap_or_else(|| "unknown".to_string());
    let bitrate = audio
        .bit_rate
        .as_deref()
        .and_then(parse_bitrate)
        .or_else(|| output.format.bit_rate.as_deref().and_then(parse_bitrate));

    AudioDescriptor::new(path, duration, codec, bitrate).map_err(|e| malformed(path, e.to_string()))
}
