//! Re-encode join through a concat filter graph
//!
//! Every input is scaled into the target frame (letterboxed, aspect ratio kept),
//! resampled to the target frame rate and joined with the `concat` filter.
//! Inputs without audio get a synthesized silent leg so the audio timeline
//! stays aligned with the video.

use std::ffi::OsString;
use std::path::Path;

use crate::domain::model::{ConcatenationPlan, HarmonizationProfile};
use crate::engine::{format_decimal, format_duration, EngineConfig, AUDIO_CHANNEL_LAYOUT, AUDIO_SAMPLE_RATE};

/// Arguments for joining `plan`'s inputs into the harmonization profile
pub fn build_args(
    config: &EngineConfig,
    plan: &ConcatenationPlan,
    profile: &HarmonizationProfile,
    output: &Path,
) -> Vec<OsString> {
    let inputs = plan.inputs();
    let with_audio = inputs.iter().any(|input| input.has_audio);

    let mut args = config.base_args();
    for input in inputs {
        args.arg("-i").arg(&input.path);
    }

    // Silent sources follow the real inputs, in input order
    let mut silent_sources = Vec::new();
    if with_audio {
        let silence = format!("anullsrc=r={}:cl={}", AUDIO_SAMPLE_RATE, AUDIO_CHANNEL_LAYOUT);
        for (index, input) in inputs.iter().enumerate().filter(|(_, i)| !i.has_audio) {
            silent_sources.push((index, inputs.len() + silent_sources.len()));
            args.args(["-f", "lavfi", "-t"])
                .arg(format_duration(input.duration_seconds))
                .args(["-i", silence.as_str()]);
        }
    }

    args.arg("-filter_complex")
        .arg(filter_graph(plan, profile, with_audio, &silent_sources));

    args.args(["-map", "[outv]"]);
    if with_audio {
        args.args(["-map", "[outa]"]);
    }

    let codecs = &profile.codecs;
    args.args(["-c:v", codecs.video_codec.as_str(), "-b:v", codecs.video_bitrate.as_str()]);
    if with_audio {
        args.args(["-c:a", codecs.audio_codec.as_str(), "-b:a", codecs.audio_bitrate.as_str()]);
    } else {
        args.arg("-an");
    }

    args.arg(output);
    args.into_vec()
}

/// The `-filter_complex` graph; `silent_sources` maps input index to its anullsrc input index
fn filter_graph(
    plan: &ConcatenationPlan,
    profile: &HarmonizationProfile,
    with_audio: bool,
    silent_sources: &[(usize, usize)],
) -> String {
    let (width, height) = (profile.resolution.width, profile.resolution.height);
    let fps = format_decimal(profile.frame_rate);

    let mut chains = Vec::new();
    let mut concat_pads = String::new();

    for (index, input) in plan.inputs().iter().enumerate() {
        chains.push(format!(
            "[{index}:v]scale={width}:{height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps}[v{index}]"
        ));
        concat_pads.push_str(&format!("[v{index}]"));

        if with_audio {
            let source = if input.has_audio {
                index
            } else {
                silent_sources
                    .iter()
                    .find(|(owner, _)| *owner == index)
                    .map(|(_, source)| *source)
                    .unwrap_or(index)
            };
            chains.push(format!(
                "[{source}:a]aformat=sample_rates={}:channel_layouts={}[a{index}]",
                AUDIO_SAMPLE_RATE, AUDIO_CHANNEL_LAYOUT
            ));
            concat_pads.push_str(&format!("[a{index}]"));
        }
    }

    let count = plan.inputs().len();
    if with_audio {
        chains.push(format!("{concat_pads}concat=n={count}:v=1:a=1[outv][outa]"));
    } else {
        chains.push(format!("{concat_pads}concat=n={count}:v=1:a=0[outv]"));
    }

    chains.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CodecSettings, PlannedInput, Resolution};
    use crate::engine::display_args;

    fn profile() -> HarmonizationProfile {
        HarmonizationProfile {
            resolution: Resolution::new(1920, 1080),
            frame_rate: 30.0,
            codecs: CodecSettings::default(),
        }
    }

    fn input(path: &str, duration: f64, has_audio: bool) -> PlannedInput {
        PlannedInput {
            path: path.into(),
            duration_seconds: duration,
            has_audio,
        }
    }

    fn position(args: &[String], flag: &str) -> usize {
        args.iter().position(|a| a == flag).unwrap()
    }

    #[test]
    fn test_reencode_graph_with_audio() {
        let plan = ConcatenationPlan::reencode(
            vec![input("a.mp4", 5.0, true), input("b.mp4", 7.0, true)],
            profile(),
        );
        let args = display_args(&build_args(&EngineConfig::default(), &plan, &profile(), Path::new("out.mp4")));
        let graph = &args[position(&args, "-filter_complex") + 1];

        assert!(graph.starts_with(
            "[0:v]scale=1920:1080:force_original_aspect_ratio=decrease,pad=1920:1080:(ow-iw)/2:(oh-ih)/2,setsar=1,fps=30[v0]"
        ));
        assert!(graph.contains("[1:a]aformat=sample_rates=48000:channel_layouts=stereo[a1]"));
        assert!(graph.ends_with("[v0][a0][v1][a1]concat=n=2:v=1:a=1[outv][outa]"));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libx264"));
        assert!(args.windows(2).any(|w| w[0] == "-b:a" && w[1] == "192k"));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_silent_input_gets_synthesized_audio() {
        let plan = ConcatenationPlan::reencode(
            vec![input("a.mp4", 5.0, true), input("silent.mp4", 2.5, false)],
            profile(),
        );
        let args = display_args(&build_args(&EngineConfig::default(), &plan, &profile(), Path::new("out.mp4")));

        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "2.500000"));
        assert!(args.iter().any(|a| a == "anullsrc=r=48000:cl=stereo"));
        let graph = &args[position(&args, "-filter_complex") + 1];
        assert!(graph.contains("[2:a]aformat=sample_rates=48000:channel_layouts=stereo[a1]"));
    }

    #[test]
    fn test_all_silent_inputs_join_video_only() {
        let plan = ConcatenationPlan::reencode(
            vec![input("a.mp4", 5.0, false), input("b.mp4", 7.0, false)],
            profile(),
        );
        let args = display_args(&build_args(&EngineConfig::default(), &plan, &profile(), Path::new("out.mp4")));
        let graph = &args[position(&args, "-filter_complex") + 1];

        assert!(graph.ends_with("[v0][v1]concat=n=2:v=1:a=0[outv]"));
        assert!(!graph.contains("aformat"));
        assert!(args.iter().any(|a| a == "-an"));
        assert!(!args.iter().any(|a| a == "[outa]"));
    }
}
