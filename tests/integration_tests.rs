use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use joinx_cli::adapters::mock::{audio_probe, video_probe, MockExecutionAdapter, MockProbeAdapter};
use joinx_cli::app::concat_interactor::{CheckRequest, ConcatRequest};
use joinx_cli::app::mix_interactor::MixRequest;
use joinx_cli::app::{AppContainer, DefaultAppContainer, OutputFormat};
use joinx_cli::domain::model::{AudioTrackMode, CodecSettings, JoinStrategy};
use joinx_cli::*;

/// Fixtures shared by the scenarios below
mod test_utils {
    use super::*;

    pub fn probe() -> MockProbeAdapter {
        MockProbeAdapter::new()
            .with_output("a.mp4", video_probe(1920, 1080, "30/1", "h264", Some("aac"), 12.5))
            .with_output("b.mp4", video_probe(1920, 1080, "30/1", "h264", Some("aac"), 7.5))
            .with_output("small.mp4", video_probe(1280, 720, "24/1", "h264", Some("aac"), 5.0))
            .with_output("silent.mp4", video_probe(1920, 1080, "30/1", "h264", None, 10.0))
            .with_output("clip.mp4", video_probe(1920, 1080, "30/1", "h264", Some("aac"), 10.0))
            .with_output("music.mp3", audio_probe("mp3", 4.0))
            .with_output("joined.mp4", video_probe(1920, 1080, "30/1", "h264", Some("aac"), 17.5))
            .with_output("final.mp4", video_probe(1920, 1080, "30/1", "h264", Some("aac"), 10.0))
    }

    pub fn container(probe: MockProbeAdapter) -> (DefaultAppContainer, Arc<MockExecutionAdapter>) {
        let execute = Arc::new(MockExecutionAdapter::new());
        let container = DefaultAppContainer::with_ports(Arc::new(probe), execute.clone(), CodecSettings::default());
        (container, execute)
    }

    pub fn planner(probe: MockProbeAdapter) -> ConcatenationPlanner {
        ConcatenationPlanner::new(MediaInspector::new(Arc::new(probe)), CodecSettings::default())
    }

    pub fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }
}

use test_utils::*;

#[tokio::test]
async fn test_identical_inputs_join_by_stream_copy() {
    let planner = planner(probe());
    let inputs = paths(&["a.mp4", "b.mp4"]);

    let verdict = planner.check_compatibility(&inputs).await.unwrap();
    assert!(verdict.is_compatible());
    assert_eq!(verdict.recommended_mode(), JoinMode::StreamCopy);

    let plan = planner.plan_auto(&inputs).await.unwrap();
    assert_eq!(plan.strategy(), &JoinStrategy::StreamCopy);
    assert_eq!(plan.paths(), vec![Path::new("a.mp4"), Path::new("b.mp4")]);
    assert!((plan.total_duration_seconds() - 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_mismatched_inputs_reencode_to_maximum() {
    let planner = planner(probe());
    let inputs = paths(&["small.mp4", "a.mp4"]);

    let verdict = planner.check_compatibility(&inputs).await.unwrap();
    let mismatches: Vec<Dimension> = verdict.mismatches().iter().copied().collect();
    assert_eq!(mismatches, vec![Dimension::Resolution, Dimension::FrameRate]);

    let plan = planner.plan_auto(&inputs).await.unwrap();
    let profile = plan.profile().expect("re-encode plan has a profile");
    assert_eq!(profile.resolution, Resolution::new(1920, 1080));
    assert_eq!(profile.frame_rate, 30.0);
    // order is the caller's, not sorted by size
    assert_eq!(plan.inputs()[0].path, PathBuf::from("small.mp4"));
}

#[tokio::test]
async fn test_copy_refused_where_reencode_succeeds() {
    let planner = planner(probe());
    let inputs = paths(&["a.mp4", "small.mp4"]);

    let err = planner.plan_copy(&inputs).await.unwrap_err();
    assert!(matches!(err, DomainError::IncompatibleInputs { .. }));

    let plan = planner.plan_reencode(&inputs, ReencodeTargets::default()).await.unwrap();
    assert_eq!(plan.mode(), JoinMode::Reencode);
}

#[tokio::test]
async fn test_missing_audio_track_is_a_mismatch() {
    let planner = planner(probe());
    let verdict = planner.check_compatibility(&paths(&["a.mp4", "silent.mp4"])).await.unwrap();
    assert!(verdict.mismatches().contains(&Dimension::AudioCodec));
    assert_eq!(verdict.recommended_mode(), JoinMode::Reencode);
}

#[tokio::test]
async fn test_check_is_repeatable() {
    let planner = planner(probe());
    let inputs = paths(&["small.mp4", "a.mp4", "b.mp4"]);
    let first = planner.check_compatibility(&inputs).await.unwrap();
    let second = planner.check_compatibility(&inputs).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_auto_matches_explicit_mode_choice() {
    let planner = planner(probe());
    for names in [&["a.mp4", "b.mp4"][..], &["a.mp4", "small.mp4"][..]] {
        let inputs = paths(names);
        let verdict = planner.check_compatibility(&inputs).await.unwrap();
        let auto = planner.plan_auto(&inputs).await.unwrap();
        let explicit = match verdict.recommended_mode() {
            JoinMode::StreamCopy => planner.plan_copy(&inputs).await.unwrap(),
            JoinMode::Reencode => planner.plan_reencode(&inputs, ReencodeTargets::default()).await.unwrap(),
        };
        assert_eq!(auto, explicit);
    }
}

#[tokio::test]
async fn test_single_input_is_rejected_without_probing() {
    let probe = Arc::new(probe());
    let planner = ConcatenationPlanner::new(MediaInspector::new(probe.clone()), CodecSettings::default());

    let err = planner.plan_auto(&paths(&["a.mp4"])).await.unwrap_err();
    assert_eq!(err, DomainError::InsufficientInputs { required: 2, actual: 1 });
    assert_eq!(probe.probe_count(), 0);
}

#[tokio::test]
async fn test_probe_failure_cancels_remaining_inspections() {
    let probe = Arc::new(
        probe()
            .with_failure("broken.mp4", ProbeFailureKind::MalformedMetadata)
            .with_delay("b.mp4", Duration::from_secs(5)),
    );
    let planner = ConcatenationPlanner::new(MediaInspector::with_concurrency(probe.clone(), 4), CodecSettings::default());

    let started = Instant::now();
    let err = planner.plan_auto(&paths(&["a.mp4", "broken.mp4", "b.mp4"])).await.unwrap_err();

    assert_eq!(err.probe_kind(), Some(ProbeFailureKind::MalformedMetadata));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(probe.completed_count() < 3);
}

#[tokio::test]
async fn test_background_music_loops_and_truncates() {
    let planner = AudioMixPlanner::new(MediaInspector::new(Arc::new(probe())));
    let plan = planner.plan(&AudioMixRequest::new("clip.mp4", "music.mp3")).await.unwrap();

    assert_eq!(plan.track_mode(), AudioTrackMode::Replace);
    assert_eq!(plan.coverage(), AudioCoverage::Looped { passes: 3 });
    assert!(plan.audio_looped());
    assert!((plan.output_duration_seconds() - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_loud_volume_rejected_before_probing() {
    let probe = Arc::new(probe());
    let planner = AudioMixPlanner::new(MediaInspector::new(probe.clone()));
    let request = AudioMixRequest {
        audio_volume: 1.5,
        ..AudioMixRequest::new("clip.mp4", "music.mp3")
    };

    let err = planner.plan(&request).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidVolume { parameter: "audio_volume", .. }));
    assert_eq!(probe.probe_count(), 0);
}

#[tokio::test]
async fn test_blending_into_silent_video_fails() {
    let planner = AudioMixPlanner::new(MediaInspector::new(Arc::new(probe())));
    let request = AudioMixRequest {
        replace_original: false,
        original_volume: 0.5,
        ..AudioMixRequest::new("silent.mp4", "music.mp3")
    };

    let err = planner.plan(&request).await.unwrap_err();
    assert!(matches!(err, DomainError::MissingAudioTrack { .. }));
}

#[tokio::test]
async fn test_container_runs_join_then_mix() {
    let (container, execute) = container(probe());

    let joined = container
        .concat_interactor()
        .execute(ConcatRequest {
            paths: paths(&["a.mp4", "small.mp4"]),
            output_path: "joined.mp4".into(),
            mode: None,
            targets: ReencodeTargets::default(),
            plan_only: false,
        })
        .await
        .unwrap();
    let joined = joined.result.unwrap();
    assert!(joined.succeeded);
    assert_eq!(joined.output_duration_seconds, Some(17.5));

    let mixed = container
        .mix_interactor()
        .execute(MixRequest {
            mix: AudioMixRequest::new("clip.mp4", "music.mp3"),
            output_path: "final.mp4".into(),
            plan_only: false,
        })
        .await
        .unwrap();
    assert!(mixed.result.unwrap().succeeded);

    let executed = execute.executed();
    assert_eq!(executed.len(), 2);
    assert!(matches!(executed[0].0, ExecutionPlan::Concatenation(_)));
    assert!(matches!(executed[1].0, ExecutionPlan::AudioMix(_)));
    assert_eq!(executed[1].1, PathBuf::from("final.mp4"));
}

#[tokio::test]
async fn test_join_with_missing_output_is_reported_failed() {
    let (container, execute) = container(probe());
    let response = container
        .concat_interactor()
        .execute(ConcatRequest {
            paths: paths(&["a.mp4", "b.mp4"]),
            output_path: "vanished.mp4".into(),
            mode: None,
            targets: ReencodeTargets::default(),
            plan_only: false,
        })
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert!(!result.succeeded);
    assert_eq!(execute.executed().len(), 1);
    assert!(result.error_detail.unwrap().contains("no decodable video"));
}

#[tokio::test]
async fn test_check_renders_json_verdict() {
    let (container, _) = container(probe());
    let response = container
        .concat_interactor()
        .check(CheckRequest {
            paths: paths(&["a.mp4", "small.mp4"]),
            format: OutputFormat::Json,
        })
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&response.summary).unwrap();
    assert!(value.is_object());
    assert!(response.summary.contains("frame_rate"));
}
