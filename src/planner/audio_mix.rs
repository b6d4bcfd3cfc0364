//! Audio mix planning: replace or blend a video's audio with an external track

use tracing::{info, instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{audio_coverage, validate_codec_overrides, validate_volume};
use crate::probe::MediaInspector;

/// Planner for background-audio overlays
#[derive(Clone)]
pub struct AudioMixPlanner {
    inspector: MediaInspector,
}

impl AudioMixPlanner {
    /// Create a new audio mix planner
    pub fn new(inspector: MediaInspector) -> Self {
        Self { inspector }
    }

    /// Build a mix plan.
    ///
    /// Volumes and encoder overrides are checked before anything is probed. Both inputs are then
    /// inspected concurrently and the first failure cancels the other.
    #[instrument(skip_all, fields(video = %request.video_path.display(), audio = %request.audio_path.display()))]
    pub async fn plan(&self, request: &AudioMixRequest) -> Result<AudioMixPlan, DomainError> {
        let audio_volume = validate_volume("audio_volume", request.audio_volume)?;
        let original_volume = validate_volume("original_volume", request.original_volume)?;
        validate_codec_overrides(&CodecOverrides {
            audio_codec: request.audio_codec.clone(),
            audio_bitrate: request.audio_bitrate.clone(),
            ..CodecOverrides::default()
        })?;

        let (video, audio) = tokio::try_join!(
            self.inspector.inspect(&request.video_path),
            self.inspector.inspect_audio(&request.audio_path),
        )?;

        let track_mode = if request.replace_original {
            AudioTrackMode::Replace
        } else {
            if !video.has_audio() {
                return Err(DomainError::MissingAudioTrack {
                    path: request.video_path.clone(),
                });
            }
            AudioTrackMode::Blend { original_volume }
        };

        let coverage = audio_coverage(video.duration_seconds(), audio.duration_seconds(), request.loop_audio);
        info!(
            "Audio {:.3}s over video {:.3}s: {:?}",
            audio.duration_seconds(),
            video.duration_seconds(),
            coverage
        );

        Ok(AudioMixPlan::new(
            request.video_path.clone(),
            request.audio_path.clone(),
            track_mode,
            request.loop_audio,
            audio_volume,
            video.duration_seconds(),
            audio.duration_seconds(),
            coverage,
        )
        .with_audio_encoding(request.audio_codec.clone(), request.audio_bitrate.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::mock::{audio_probe, video_probe, MockProbeAdapter};

    fn planner() -> (AudioMixPlanner, Arc<MockProbeAdapter>) {
        let mock = Arc::new(
            MockProbeAdapter::new()
                .with_output("video.mp4", video_probe(1920, 1080, "30/1", "h264", Some("aac"), 10.0))
                .with_output("silent.mp4", video_probe(1920, 1080, "30/1", "h264", None, 10.0))
                .with_output("music.mp3", audio_probe("mp3", 4.0))
                .with_output("long.mp3", audio_probe("mp3", 25.0)),
        );
        let inspector = MediaInspector::with_concurrency(mock.clone(), 2);
        (AudioMixPlanner::new(inspector), mock)
    }

    #[tokio::test]
    async fn test_short_audio_is_looped() {
        let (planner, _) = planner();
        let plan = planner.plan(&AudioMixRequest::new("video.mp4", "music.mp3")).await.unwrap();
        assert_eq!(plan.coverage(), AudioCoverage::Looped { passes: 3 });
        assert!(plan.audio_looped());
        assert_eq!(plan.output_duration_seconds(), 10.0);
        assert_eq!(plan.original_volume(), None);
    }

    #[tokio::test]
    async fn test_long_audio_is_not_looped() {
        let (planner, _) = planner();
        let plan = planner.plan(&AudioMixRequest::new("video.mp4", "long.mp3")).await.unwrap();
        assert_eq!(plan.coverage(), AudioCoverage::Full);
        assert_eq!(plan.output_duration_seconds(), 10.0);
    }

    #[tokio::test]
    async fn test_no_loop_pads() {
        let (planner, _) = planner();
        let request = AudioMixRequest {
            loop_audio: false,
            ..AudioMixRequest::new("video.mp4", "music.mp3")
        };
        let plan = planner.plan(&request).await.unwrap();
        assert_eq!(plan.coverage(), AudioCoverage::Padded);
    }

    #[tokio::test]
    async fn test_blend_keeps_original_volume() {
        let (planner, _) = planner();
        let request = AudioMixRequest {
            replace_original: false,
            audio_volume: 0.8,
            original_volume: 0.3,
            ..AudioMixRequest::new("video.mp4", "music.mp3")
        };
        let plan = planner.plan(&request).await.unwrap();
        assert_eq!(plan.track_mode(), AudioTrackMode::Blend { original_volume: 0.3 });
        assert_eq!(plan.audio_volume(), 0.8);
    }

    #[tokio::test]
    async fn test_blend_requires_original_audio() {
        let (planner, _) = planner();
        let request = AudioMixRequest {
            replace_original: false,
            ..AudioMixRequest::new("silent.mp4", "music.mp3")
        };
        let err = planner.plan(&request).await.unwrap_err();
        assert!(matches!(err, DomainError::MissingAudioTrack { .. }));
    }

    #[tokio::test]
    async fn test_invalid_volume_fails_before_probing() {
        let (planner, mock) = planner();
        let request = AudioMixRequest {
            audio_volume: 1.5,
            ..AudioMixRequest::new("video.mp4", "music.mp3")
        };
        let err = planner.plan(&request).await.unwrap_err();
        assert_eq!(err, DomainError::InvalidVolume { parameter: "audio_volume", value: 1.5 });
        assert_eq!(mock.probe_count(), 0);

        let request = AudioMixRequest {
            original_volume: -0.5,
            ..AudioMixRequest::new("video.mp4", "music.mp3")
        };
        assert!(matches!(
            planner.plan(&request).await,
            Err(DomainError::InvalidVolume { parameter: "original_volume", .. })
        ));
    }

    #[tokio::test]
    async fn test_audio_encoding_override_is_planned() {
        let (planner, _) = planner();
        let request = AudioMixRequest {
            audio_codec: Some("libopus".to_string()),
            audio_bitrate: Some("96k".to_string()),
            ..AudioMixRequest::new("video.mp4", "music.mp3")
        };
        let plan = planner.plan(&request).await.unwrap();
        assert_eq!(plan.audio_codec(), Some("libopus"));
        assert_eq!(plan.audio_bitrate(), Some("96k"));

        let plain = planner.plan(&AudioMixRequest::new("video.mp4", "music.mp3")).await.unwrap();
        assert_eq!(plain.audio_codec(), None);
    }

    #[tokio::test]
    async fn test_bad_audio_bitrate_fails_before_inspecting() {
        let (planner, mock) = planner();
        let request = AudioMixRequest {
            audio_bitrate: Some("loud".to_string()),
            ..AudioMixRequest::new("video.mp4", "music.mp3")
        };
        let err = planner.plan(&request).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTarget {
                parameter: "audio_bitrate",
                value: "loud".to_string()
            }
        );
        assert_eq!(mock.probe_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_audio_file() {
        let (planner, _) = planner();
        let err = planner.plan(&AudioMixRequest::new("video.mp4", "gone.mp3")).await.unwrap_err();
        assert_eq!(err.probe_kind(), Some(ProbeFailureKind::FileNotFound));
    }
}
