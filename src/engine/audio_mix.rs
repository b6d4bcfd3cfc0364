//! Audio replacement and blending

use std::ffi::OsString;
use std::path::Path;

use crate::domain::model::{AudioCoverage, AudioMixPlan, AudioTrackMode};
use crate::engine::{format_decimal, format_duration, EngineConfig};

/// Arguments for applying `plan`; video is copied, audio is re-encoded
pub fn build_args(config: &EngineConfig, plan: &AudioMixPlan, output: &Path) -> Vec<OsString> {
    let mut args = config.base_args();

    args.arg("-i").arg(plan.video_path());
    if plan.audio_looped() {
        // Repeat forever; the -t cut below ends it
        args.args(["-stream_loop", "-1"]);
    }
    args.arg("-i").arg(plan.audio_path());

    args.arg("-filter_complex").arg(filter_graph(plan));

    let audio_codec = plan.audio_codec().unwrap_or(config.codecs.audio_codec.as_str());
    let audio_bitrate = plan.audio_bitrate().unwrap_or(config.codecs.audio_bitrate.as_str());
    args.args(["-map", "0:v", "-map", "[aout]", "-c:v", "copy"])
        .args(["-c:a", audio_codec, "-b:a", audio_bitrate, "-t"])
        .arg(format_duration(plan.output_duration_seconds()))
        .arg(output);
    args.into_vec()
}

fn filter_graph(plan: &AudioMixPlan) -> String {
    let volume = format_decimal(plan.audio_volume());

    match plan.track_mode() {
        AudioTrackMode::Replace => {
            let pad = if plan.coverage() == AudioCoverage::Padded { ",apad" } else { "" };
            format!("[1:a]volume={volume}{pad}[aout]")
        }
        AudioTrackMode::Blend { original_volume } => format!(
            "[0:a]volume={}[orig];[1:a]volume={volume}[bgm];\
             [orig][bgm]amix=inputs=2:duration=first:normalize=0[aout]",
            format_decimal(original_volume)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::display_args;

    fn plan(track_mode: AudioTrackMode, audio_seconds: f64, coverage: AudioCoverage) -> AudioMixPlan {
        AudioMixPlan::new(
            "video.mp4".into(),
            "music.mp3".into(),
            track_mode,
            matches!(coverage, AudioCoverage::Looped { .. }),
            0.8,
            10.0,
            audio_seconds,
            coverage,
        )
    }

    fn graph(args: &[String]) -> &str {
        let at = args.iter().position(|a| a == "-filter_complex").unwrap();
        &args[at + 1]
    }

    #[test]
    fn test_looped_replace() {
        let plan = plan(AudioTrackMode::Replace, 4.0, AudioCoverage::Looped { passes: 3 });
        let args = display_args(&build_args(&EngineConfig::default(), &plan, Path::new("out.mp4")));

        let loop_at = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_at + 1], "-1");
        assert_eq!(args[loop_at + 3], "music.mp3");
        assert_eq!(graph(&args), "[1:a]volume=0.8[aout]");
        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "10.000000"));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "copy"));
    }

    #[test]
    fn test_padded_replace() {
        let plan = plan(AudioTrackMode::Replace, 4.0, AudioCoverage::Padded);
        let args = display_args(&build_args(&EngineConfig::default(), &plan, Path::new("out.mp4")));
        assert!(!args.iter().any(|a| a == "-stream_loop"));
        assert_eq!(graph(&args), "[1:a]volume=0.8,apad[aout]");
    }

    #[test]
    fn test_blend_keeps_both_tracks() {
        let plan = plan(AudioTrackMode::Blend { original_volume: 0.3 }, 20.0, AudioCoverage::Full);
        let args = display_args(&build_args(&EngineConfig::default(), &plan, Path::new("out.mp4")));
        assert_eq!(
            graph(&args),
            "[0:a]volume=0.3[orig];[1:a]volume=0.8[bgm];[orig][bgm]amix=inputs=2:duration=first:normalize=0[aout]"
        );
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "[aout]"));
    }

    #[test]
    fn test_audio_encoding_override_beats_config() {
        let config = EngineConfig::default();
        let defaults = display_args(&build_args(
            &config,
            &plan(AudioTrackMode::Replace, 20.0, AudioCoverage::Full),
            Path::new("out.mp4"),
        ));
        assert!(defaults
            .windows(2)
            .any(|w| w[0] == "-c:a" && w[1] == config.codecs.audio_codec));

        let plan = plan(AudioTrackMode::Replace, 20.0, AudioCoverage::Full)
            .with_audio_encoding(Some("libopus".to_string()), Some("96k".to_string()));
        let args = display_args(&build_args(&config, &plan, Path::new("out.mp4")));
        assert!(args.windows(2).any(|w| w[0] == "-c:a" && w[1] == "libopus"));
        assert!(args.windows(2).any(|w| w[0] == "-b:a" && w[1] == "96k"));
    }
}
