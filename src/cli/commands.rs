//! Command implementations

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::adapters::runner::tool_version;
use crate::adapters::ToolConfig;
use crate::app::concat_interactor::{CheckRequest, ConcatRequest};
use crate::app::inspect_interactor::InspectRequest;
use crate::app::mix_interactor::MixRequest;
use crate::app::{AppContainer, OutputFormat};
use crate::cli::args::{CheckArgs, ConcatArgs, InspectArgs, MixArgs};
use crate::domain::model::{AudioMixRequest, CodecOverrides, JoinMode, OperationResult, ReencodeTargets, Resolution};

/// Execute the inspect command
pub async fn inspect(container: &dyn AppContainer, args: InspectArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let response = container
        .inspect_interactor()
        .execute(InspectRequest {
            paths: args.inputs,
            format,
        })
        .await
        .context("Failed to inspect media files")?;

    print!("{}", response.summary);
    Ok(())
}

/// Execute the check command
pub async fn check(container: &dyn AppContainer, args: CheckArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let response = container
        .concat_interactor()
        .check(CheckRequest {
            paths: args.inputs,
            format,
        })
        .await
        .context("Failed to check compatibility")?;

    print!("{}", response.summary);
    Ok(())
}

/// Execute the concat command
pub async fn concat(container: &dyn AppContainer, args: ConcatArgs) -> Result<()> {
    let mode = parse_mode(&args.mode)?;
    let targets = ReencodeTargets {
        resolution: args
            .resolution
            .as_deref()
            .map(str::parse::<Resolution>)
            .transpose()?,
        frame_rate: args.fps,
        codecs: CodecOverrides {
            video_codec: args.video_codec,
            audio_codec: args.audio_codec,
            video_bitrate: args.video_bitrate,
            audio_bitrate: args.audio_bitrate,
        },
    };

    info!("Joining {} inputs into {}", args.inputs.len(), args.output.display());
    let response = container
        .concat_interactor()
        .execute(ConcatRequest {
            paths: args.inputs,
            output_path: args.output,
            mode,
            targets,
            plan_only: args.plan_only,
        })
        .await
        .context("Failed to plan concatenation")?;

    match response.result {
        None => print_json(&response.plan),
        Some(result) => report(result),
    }
}

/// Execute the mix command
pub async fn mix(container: &dyn AppContainer, args: MixArgs) -> Result<()> {
    let mix = AudioMixRequest {
        replace_original: !args.keep_original,
        loop_audio: !args.no_loop,
        audio_volume: args.audio_volume,
        original_volume: args.original_volume,
        audio_codec: args.audio_codec,
        audio_bitrate: args.audio_bitrate,
        ..AudioMixRequest::new(args.video, args.audio)
    };

    info!(
        "Mixing {} under {}",
        mix.audio_path.display(),
        mix.video_path.display()
    );
    let response = container
        .mix_interactor()
        .execute(MixRequest {
            mix,
            output_path: args.output,
            plan_only: args.plan_only,
        })
        .await
        .context("Failed to plan audio mix")?;

    match response.result {
        None => print_json(&response.plan),
        Some(result) => report(result),
    }
}

/// Execute the doctor command
pub async fn doctor(config: &ToolConfig) -> Result<()> {
    let tools = [
        ("ffmpeg", &config.executables.ffmpeg),
        ("ffprobe", &config.executables.ffprobe),
    ];

    let mut broken = Vec::new();
    for (name, program) in tools {
        match tool_version(program, config.probe_timeout()).await {
            Ok(version) => {
                info!("{} at '{}' is usable", name, program);
                println!("{}: {}", name, version);
            }
            Err(e) => {
                error!("{} is not usable: {}", name, e);
                println!("{}: unavailable ({})", name, e);
                broken.push(name);
            }
        }
    }

    if !broken.is_empty() {
        bail!("Required tools are not usable: {}", broken.join(", "));
    }
    Ok(())
}

/// `auto` defers the choice to the compatibility verdict
fn parse_mode(mode: &str) -> Result<Option<JoinMode>> {
    if mode.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    Ok(Some(JoinMode::parse(mode)?))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize plan")?;
    println!("{}", rendered);
    Ok(())
}

fn report(result: OperationResult) -> Result<()> {
    if !result.succeeded {
        let detail = result.error_detail.unwrap_or_else(|| "unknown error".to_string());
        error!("ffmpeg failed for {}: {}", result.output_path.display(), detail);
        bail!("Failed to write {}: {}", result.output_path.display(), detail);
    }

    info!(
        "Finished in {:.2}s: {:.3}s of media, {} bytes",
        result.elapsed.as_secs_f64(),
        result.output_duration_seconds.unwrap_or_default(),
        result.output_size_bytes.unwrap_or_default()
    );
    println!("{}", result.output_path.display());
    Ok(())
}
