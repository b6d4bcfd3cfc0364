// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::probe::ProbeOutput;

/// Port for media file probing
///
/// Implementations must bound every call with a timeout and report failures as
/// [`DomainError::Probe`] with a kind that tells a missing file apart from an
/// undecodable one and from a failing tool.
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and return its raw per-stream metadata
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, DomainError>;
}

/// Port for running an execution plan
///
/// Failures are never errors here: a non-zero exit, a timeout or a missing
/// output all come back as `OperationResult { succeeded: false, .. }` with the
/// captured diagnostics.
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Execute a plan, writing the result to `output_path`
    async fn execute(&self, plan: &ExecutionPlan, output_path: &Path) -> OperationResult;
}
