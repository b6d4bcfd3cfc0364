// Concat interactor - Orchestrates compatibility checks and joins

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::{same_file, OutputFormat};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::output::OutputVerifier;
use crate::planner::ConcatenationPlanner;
use crate::ports::*;

/// Interactor for the check and concat use cases
pub struct ConcatInteractor {
    planner: ConcatenationPlanner,
    execute_port: Arc<dyn ExecutePort>,
    verifier: OutputVerifier,
}

impl ConcatInteractor {
    /// Create new concat interactor with injected collaborators
    pub fn new(planner: ConcatenationPlanner, execute_port: Arc<dyn ExecutePort>, verifier: OutputVerifier) -> Self {
        Self {
            planner,
            execute_port,
            verifier,
        }
    }

    /// Compatibility verdict for the inputs, rendered
    pub async fn check(&self, request: CheckRequest) -> Result<CheckResponse, DomainError> {
        let verdict = self.planner.check_compatibility(&request.paths).await?;
        let summary = match request.format.render(&verdict)? {
            Some(rendered) => rendered,
            None => verdict_text(&verdict),
        };
        Ok(CheckResponse { verdict, summary })
    }

    /// Plan the join and, unless only the plan was asked for, execute it
    pub async fn execute(&self, request: ConcatRequest) -> Result<ConcatResponse, DomainError> {
        if let Some(input) = request.paths.iter().find(|p| same_file(p, &request.output_path)) {
            return Err(DomainError::BadArgs(format!(
                "Output {} would overwrite an input",
                input.display()
            )));
        }

        let has_targets = request.targets != ReencodeTargets::default();
        let plan = match request.mode {
            Some(JoinMode::StreamCopy) if has_targets => {
                return Err(DomainError::BadArgs(
                    "--resolution, --fps and codec overrides only apply to re-encoding".to_string(),
                ))
            }
            Some(JoinMode::StreamCopy) => self.planner.plan_copy(&request.paths).await?,
            Some(JoinMode::Reencode) => self.planner.plan_reencode(&request.paths, request.targets).await?,
            None if has_targets => self.planner.plan_reencode(&request.paths, request.targets).await?,
            None => self.planner.plan_auto(&request.paths).await?,
        };
        info!(
            "Planned {} join of {} inputs ({:.3}s)",
            plan.mode(),
            plan.inputs().len(),
            plan.total_duration_seconds()
        );

        if request.plan_only {
            return Ok(ConcatResponse { plan, result: None });
        }

        let result = self
            .execute_port
            .execute(&ExecutionPlan::from(plan.clone()), &request.output_path)
            .await;
        let result = self.verifier.verify(result, plan.total_duration_seconds()).await;
        if !result.succeeded {
            warn!("Join failed: {}", result.error_detail.as_deref().unwrap_or("unknown error"));
        }
        Ok(ConcatResponse {
            plan,
            result: Some(result),
        })
    }
}

fn verdict_text(verdict: &CompatibilityVerdict) -> String {
    let mut output = String::new();
    if verdict.is_compatible() {
        let _ = writeln!(output, "Compatible: inputs can be joined losslessly");
    } else {
        let dimensions = verdict
            .mismatches()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(output, "Incompatible: inputs differ in {}", dimensions);
    }
    let _ = writeln!(output, "Recommended mode: {}", verdict.recommended_mode());
    output
}

/// Request for a compatibility check
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
}

/// Verdict plus its rendering
#[derive(Debug, Clone)]
pub struct CheckResponse {
    pub verdict: CompatibilityVerdict,
    pub summary: String,
}

/// Request for a join
#[derive(Debug, Clone)]
pub struct ConcatRequest {
    pub paths: Vec<PathBuf>,
    pub output_path: PathBuf,
    /// `None` picks the mode from the compatibility verdict
    pub mode: Option<JoinMode>,
    pub targets: ReencodeTargets,
    pub plan_only: bool,
}

/// Plan and, when executed, the execution outcome
#[derive(Debug, Clone)]
pub struct ConcatResponse {
    pub plan: ConcatenationPlan,
    pub result: Option<OperationResult>,
}
