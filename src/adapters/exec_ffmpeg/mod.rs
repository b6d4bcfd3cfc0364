//! FFmpeg execution adapter
//!
//! Turns plans into ffmpeg invocations and runs them with the configured
//! timeout. A run only counts as successful when ffmpeg exits 0 and the output
//! file exists.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::adapters::runner::run_tool;
use crate::domain::model::*;
use crate::engine::{audio_mix, copy, reencode, EngineConfig};
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
    timeout: Duration,
    temp_dir: PathBuf,
    engine: EngineConfig,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<String>, timeout: Duration, temp_dir: PathBuf, engine: EngineConfig) -> Self {
        Self {
            program: program.into(),
            timeout,
            temp_dir,
            engine,
        }
    }

    async fn run(&self, plan: &ExecutionPlan, output: &Path) -> Result<(), String> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create output directory {}: {}", parent.display(), e))?;
        }

        // The list file must outlive the ffmpeg run
        let mut concat_list: Option<NamedTempFile> = None;
        let args = match plan {
            ExecutionPlan::Concatenation(plan) => match plan.strategy() {
                JoinStrategy::StreamCopy => {
                    let list = self.write_concat_list(plan)?;
                    let args = copy::build_args(&self.engine, list.path(), output);
                    concat_list = Some(list);
                    args
                }
                JoinStrategy::Reencode(profile) => reencode::build_args(&self.engine, plan, profile, output),
            },
            ExecutionPlan::AudioMix(plan) => audio_mix::build_args(&self.engine, plan, output),
        };

        let result = run_tool(&self.program, &args, self.timeout)
            .await
            .map_err(|e| e.to_string())?;
        drop(concat_list);

        if !result.success() {
            return Err(result.failure_detail());
        }
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(format!(
                "{} exited successfully but {} was not created",
                self.program,
                output.display()
            ));
        }
        Ok(())
    }

    fn write_concat_list(&self, plan: &ConcatenationPlan) -> Result<NamedTempFile, String> {
        let base_dir = std::env::current_dir().map_err(|e| format!("Failed to resolve working directory: {}", e))?;
        let content = copy::concat_list(&plan.paths(), &base_dir).map_err(|e| e.to_string())?;

        let mut file = tempfile::Builder::new()
            .prefix("joinx-concat-")
            .suffix(".txt")
            .tempfile_in(&self.temp_dir)
            .map_err(|e| format!("Failed to create concat list in {}: {}", self.temp_dir.display(), e))?;
        file.write_all(&content)
            .and_then(|_| file.flush())
            .map_err(|e| format!("Failed to write concat list: {}", e))?;
        Ok(file)
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn execute(&self, plan: &ExecutionPlan, output_path: &Path) -> OperationResult {
        let started = Instant::now();
        match self.run(plan, output_path).await {
            Ok(()) => {
                info!("Wrote {} in {:.2?}", output_path.display(), started.elapsed());
                OperationResult::success(output_path, started.elapsed())
            }
            Err(detail) => {
                warn!("Execution failed for {}: {}", output_path.display(), detail);
                OperationResult::failure(output_path, detail, started.elapsed())
            }
        }
    }
}
