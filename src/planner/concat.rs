//! Concatenation planning: stream copy, re-encode or automatic choice

use std::path::Path;

use tracing::{info, instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{ensure_enough_inputs, CompatibilityAnalyzer, Harmonizer};
use crate::probe::MediaInspector;

/// Planner for joining several files in order
#[derive(Clone)]
pub struct ConcatenationPlanner {
    inspector: MediaInspector,
    codec_defaults: CodecSettings,
}

impl ConcatenationPlanner {
    /// Create a new planner with the encoder settings used for re-encode plans
    pub fn new(inspector: MediaInspector, codec_defaults: CodecSettings) -> Self {
        Self {
            inspector,
            codec_defaults,
        }
    }

    /// Verdict only, no plan
    #[instrument(skip_all, fields(inputs = paths.len()))]
    pub async fn check_compatibility<P: AsRef<Path>>(&self, paths: &[P]) -> Result<CompatibilityVerdict, DomainError> {
        let descriptors = self.inspect(paths).await?;
        CompatibilityAnalyzer::analyze(&descriptors)
    }

    /// Lossless plan; fails with the mismatch set instead of falling back to re-encoding
    #[instrument(skip_all, fields(inputs = paths.len()))]
    pub async fn plan_copy<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ConcatenationPlan, DomainError> {
        let descriptors = self.inspect(paths).await?;
        let verdict = CompatibilityAnalyzer::analyze(&descriptors)?;
        if !verdict.is_compatible() {
            return Err(DomainError::IncompatibleInputs {
                mismatches: verdict.mismatches().clone(),
            });
        }
        Ok(Self::copy_plan(&descriptors))
    }

    /// Re-encode plan; omitted targets default to the maximum observed values
    #[instrument(skip_all, fields(inputs = paths.len()))]
    pub async fn plan_reencode<P: AsRef<Path>>(
        &self,
        paths: &[P],
        targets: ReencodeTargets,
    ) -> Result<ConcatenationPlan, DomainError> {
        Harmonizer::validate_targets(&targets)?;
        let descriptors = self.inspect(paths).await?;
        self.reencode_plan(&descriptors, targets)
    }

    /// Copy when the inputs allow it, otherwise re-encode with default targets
    #[instrument(skip_all, fields(inputs = paths.len()))]
    pub async fn plan_auto<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ConcatenationPlan, DomainError> {
        let descriptors = self.inspect(paths).await?;
        let verdict = CompatibilityAnalyzer::analyze(&descriptors)?;

        if verdict.is_compatible() {
            info!("Inputs are compatible, planning stream copy");
            Ok(Self::copy_plan(&descriptors))
        } else {
            info!(
                "Inputs differ in {:?}, planning re-encode",
                verdict.mismatches().iter().map(ToString::to_string).collect::<Vec<_>>()
            );
            self.reencode_plan(&descriptors, ReencodeTargets::default())
        }
    }

    async fn inspect<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<MediaDescriptor>, DomainError> {
        ensure_enough_inputs(paths.len())?;
        self.inspector.inspect_all(paths).await
    }

    fn copy_plan(descriptors: &[MediaDescriptor]) -> ConcatenationPlan {
        ConcatenationPlan::stream_copy(descriptors.iter().map(PlannedInput::from).collect())
    }

    fn reencode_plan(
        &self,
        descriptors: &[MediaDescriptor],
        targets: ReencodeTargets,
    ) -> Result<ConcatenationPlan, DomainError> {
        let profile = Harmonizer::target_profile(descriptors, targets, &self.codec_defaults)?;
        info!(
            "Re-encode target: {} @ {} fps ({})",
            profile.resolution, profile.frame_rate, profile.codecs.video_codec
        );
        Ok(ConcatenationPlan::reencode(
            descriptors.iter().map(PlannedInput::from).collect(),
            profile,
        ))
    }
}
