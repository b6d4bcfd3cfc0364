// Mix interactor - Orchestrates background-audio overlays

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::same_file;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::output::OutputVerifier;
use crate::planner::AudioMixPlanner;
use crate::ports::*;

/// Interactor for the audio mix use case
pub struct MixInteractor {
    planner: AudioMixPlanner,
    execute_port: Arc<dyn ExecutePort>,
    verifier: OutputVerifier,
}

impl MixInteractor {
    /// Create new mix interactor with injected collaborators
    pub fn new(planner: AudioMixPlanner, execute_port: Arc<dyn ExecutePort>, verifier: OutputVerifier) -> Self {
        Self {
            planner,
            execute_port,
            verifier,
        }
    }

    /// Plan the mix and, unless only the plan was asked for, execute it
    pub async fn execute(&self, request: MixRequest) -> Result<MixResponse, DomainError> {
        let mix = &request.mix;
        if same_file(&request.output_path, &mix.video_path) || same_file(&request.output_path, &mix.audio_path) {
            return Err(DomainError::BadArgs(format!(
                "Output {} would overwrite an input",
                request.output_path.display()
            )));
        }

        let plan = self.planner.plan(mix).await?;
        info!(
            "Planned audio {} for {} ({:?})",
            if plan.replace_original() { "replacement" } else { "blend" },
            plan.video_path().display(),
            plan.coverage()
        );

        if request.plan_only {
            return Ok(MixResponse { plan, result: None });
        }

        let result = self
            .execute_port
            .execute(&ExecutionPlan::from(plan.clone()), &request.output_path)
            .await;
        let result = self.verifier.verify(result, plan.output_duration_seconds()).await;
        if !result.succeeded {
            warn!("Mix failed: {}", result.error_detail.as_deref().unwrap_or("unknown error"));
        }
        Ok(MixResponse {
            plan,
            result: Some(result),
        })
    }
}

/// Request for an audio mix
#[derive(Debug, Clone)]
pub struct MixRequest {
    pub mix: AudioMixRequest,
    pub output_path: PathBuf,
    pub plan_only: bool,
}

/// Plan and, when executed, the execution outcome
#[derive(Debug, Clone)]
pub struct MixResponse {
    pub plan: AudioMixPlan,
    pub result: Option<OperationResult>,
}
