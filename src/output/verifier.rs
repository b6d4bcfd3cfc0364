//! Output verification
//!
//! ffmpeg can exit 0 and still leave a truncated or empty file behind, so a
//! successful run is only reported once the output has been inspected again.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::model::OperationResult;
use crate::probe::MediaInspector;

/// Smallest allowed gap between expected and measured duration, in seconds
pub const MIN_DURATION_TOLERANCE: f64 = 0.5;

/// Allowed gap as a share of the expected duration
pub const RELATIVE_DURATION_TOLERANCE: f64 = 0.02;

/// How far the written file may drift from the planned length
pub fn duration_tolerance(expected_seconds: f64) -> f64 {
    (expected_seconds * RELATIVE_DURATION_TOLERANCE).max(MIN_DURATION_TOLERANCE)
}

/// Re-inspects a written file and compares it with the plan
#[derive(Clone)]
pub struct OutputVerifier {
    inspector: MediaInspector,
}

impl OutputVerifier {
    pub fn new(inspector: MediaInspector) -> Self {
        Self { inspector }
    }

    /// Verify the output of a run that reported success.
    ///
    /// Failed runs pass through untouched. The measured duration and size are
    /// recorded on the result whenever they can be read.
    pub async fn verify(&self, result: OperationResult, expected_seconds: f64) -> OperationResult {
        if !result.succeeded {
            return result;
        }
        info!("Verifying output: {}", result.output_path.display());

        let size = file_size(&result.output_path).await;
        let descriptor = match self.inspector.inspect(&result.output_path).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("Output {} is not a playable video: {}", result.output_path.display(), e);
                return result
                    .with_output_metadata(None, size)
                    .rejected(format!("output has no decodable video: {}", e));
            }
        };

        let actual = descriptor.duration_seconds();
        let result = result.with_output_metadata(Some(actual), size);
        let tolerance = duration_tolerance(expected_seconds);
        if (actual - expected_seconds).abs() > tolerance {
            warn!(
                "Output {} lasts {:.3}s, expected {:.3}s",
                result.output_path.display(),
                actual,
                expected_seconds
            );
            return result.rejected(format!(
                "output lasts {:.3}s but {:.3}s was planned (tolerance {:.3}s)",
                actual, expected_seconds, tolerance
            ));
        }

        info!("Verification passed: {:.3}s", actual);
        result
    }
}

async fn file_size(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}
