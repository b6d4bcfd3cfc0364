// Domain rules - Business logic and policies

use std::collections::BTreeSet;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Frame rates closer than this (in fps) are considered equal
pub const FRAME_RATE_TOLERANCE: f64 = 0.01;

/// Minimum number of inputs for any multi-file operation
pub const MIN_JOIN_INPUTS: usize = 2;

/// Fail fast when a multi-file operation gets fewer than two inputs
pub fn ensure_enough_inputs(count: usize) -> Result<(), DomainError> {
    if count < MIN_JOIN_INPUTS {
        return Err(DomainError::InsufficientInputs {
            required: MIN_JOIN_INPUTS,
            actual: count,
        });
    }
    Ok(())
}

/// Decides whether a set of inputs can be stream-copy joined
pub struct CompatibilityAnalyzer;

impl CompatibilityAnalyzer {
    /// Compare every descriptor against the first one and collect mismatched dimensions.
    ///
    /// Only baseline pairs are compared. Two later inputs that each sit within
    /// the frame-rate tolerance of the baseline are not compared with each other.
    pub fn analyze(descriptors: &[MediaDescriptor]) -> Result<CompatibilityVerdict, DomainError> {
        ensure_enough_inputs(descriptors.len())?;

        let baseline = &descriptors[0];
        let mismatches = descriptors[1..]
            .iter()
            .flat_map(|other| Self::compare(baseline, other))
            .collect::<BTreeSet<_>>();

        Ok(CompatibilityVerdict::from_mismatches(mismatches))
    }

    /// Dimensions in which `other` differs from `baseline`
    pub fn compare(baseline: &MediaDescriptor, other: &MediaDescriptor) -> Vec<Dimension> {
        let mut differences = Vec::new();

        if baseline.resolution() != other.resolution() {
            differences.push(Dimension::Resolution);
        }
        if !frame_rates_match(baseline.frame_rate(), other.frame_rate()) {
            differences.push(Dimension::FrameRate);
        }
        if baseline.video_codec() != other.video_codec() {
            differences.push(Dimension::VideoCodec);
        }
        // None == None is a match; None vs Some is not
        if baseline.audio_codec() != other.audio_codec() {
            differences.push(Dimension::AudioCodec);
        }

        differences
    }
}

/// Frame-rate equality within [`FRAME_RATE_TOLERANCE`]
pub fn frame_rates_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= FRAME_RATE_TOLERANCE
}

/// Builds the target profile for a re-encode join
pub struct Harmonizer;

impl Harmonizer {
    /// Resolve the harmonization profile, filling omitted targets with the
    /// maximum observed values so source quality is never reduced implicitly
    pub fn target_profile(
        descriptors: &[MediaDescriptor],
        targets: ReencodeTargets,
        codecs: &CodecSettings,
    ) -> Result<HarmonizationProfile, DomainError> {
        Self::validate_targets(&targets)?;

        let resolution = match targets.resolution {
            Some(resolution) => resolution,
            None => Self::max_resolution(descriptors)
                .ok_or(DomainError::InsufficientInputs { required: MIN_JOIN_INPUTS, actual: 0 })?,
        };
        let frame_rate = match targets.frame_rate {
            Some(frame_rate) => frame_rate,
            None => Self::max_frame_rate(descriptors)
                .ok_or(DomainError::InsufficientInputs { required: MIN_JOIN_INPUTS, actual: 0 })?,
        };

        Ok(HarmonizationProfile {
            resolution,
            frame_rate,
            codecs: targets.codecs.apply(codecs),
        })
    }

    /// Largest resolution by pixel count; ties go to the wider frame, then to the earlier input
    pub fn max_resolution(descriptors: &[MediaDescriptor]) -> Option<Resolution> {
        let mut best: Option<Resolution> = None;
        for resolution in descriptors.iter().map(|d| d.resolution()) {
            best = match best {
                None => Some(resolution),
                Some(current) => {
                    let larger = (resolution.pixel_count(), resolution.width) > (current.pixel_count(), current.width);
                    Some(if larger { resolution } else { current })
                }
            };
        }
        best
    }

    /// Highest frame rate observed
    pub fn max_frame_rate(descriptors: &[MediaDescriptor]) -> Option<f64> {
        descriptors.iter().map(|d| d.frame_rate()).reduce(f64::max)
    }

    /// Reject unusable explicit targets; runs again inside [`Self::target_profile`]
    pub fn validate_targets(targets: &ReencodeTargets) -> Result<(), DomainError> {
        if let Some(resolution) = targets.resolution {
            if !resolution.is_valid() {
                return Err(DomainError::InvalidTarget {
                    parameter: "target_resolution",
                    value: resolution.to_string(),
                });
            }
        }
        if let Some(frame_rate) = targets.frame_rate {
            if !is_finite_positive(frame_rate) {
                return Err(DomainError::InvalidTarget {
                    parameter: "target_frame_rate",
                    value: frame_rate.to_string(),
                });
            }
        }
        validate_codec_overrides(&targets.codecs)
    }
}

/// Bitrate in ffmpeg syntax: digits with an optional `k`/`M` suffix
pub fn is_valid_bitrate(value: &str) -> bool {
    let digits = value.strip_suffix(['k', 'K', 'm', 'M']).unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Reject encoder overrides ffmpeg could not take as a single argument
pub fn validate_codec_overrides(overrides: &CodecOverrides) -> Result<(), DomainError> {
    let codecs = [
        ("video_codec", &overrides.video_codec),
        ("audio_codec", &overrides.audio_codec),
    ];
    for (parameter, codec) in codecs {
        if let Some(codec) = codec {
            if codec.is_empty() || codec.chars().any(char::is_whitespace) {
                return Err(DomainError::InvalidTarget {
                    parameter,
                    value: codec.clone(),
                });
            }
        }
    }

    let bitrates = [
        ("video_bitrate", &overrides.video_bitrate),
        ("audio_bitrate", &overrides.audio_bitrate),
    ];
    for (parameter, bitrate) in bitrates {
        if let Some(bitrate) = bitrate {
            if !is_valid_bitrate(bitrate) {
                return Err(DomainError::InvalidTarget {
                    parameter,
                    value: bitrate.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Validate a linear volume scalar; out-of-range values are rejected, never clamped
pub fn validate_volume(parameter: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(DomainError::InvalidVolume { parameter, value });
    }
    Ok(value)
}

/// How an external audio track of `audio_seconds` covers a video of `video_seconds`
pub fn audio_coverage(video_seconds: f64, audio_seconds: f64, loop_audio: bool) -> AudioCoverage {
    if audio_seconds >= video_seconds {
        return AudioCoverage::Full;
    }
    if !loop_audio {
        return AudioCoverage::Padded;
    }
    let passes = (video_seconds / audio_seconds).ceil();
    AudioCoverage::Looped {
        passes: passes.min(u32::MAX as f64) as u32,
    }
}
