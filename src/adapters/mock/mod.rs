//! In-memory adapters for tests
//!
//! [`MockProbeAdapter`] serves canned [`ProbeOutput`]s per path, with optional
//! failures and artificial latency. [`MockExecutionAdapter`] records every plan
//! it is asked to run instead of spawning anything.
//!
//! Only compiled for unit tests and with the `test-support` feature.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::probe::{ProbeFormat, ProbeOutput, ProbeStream};

/// Build the probe output of a video file
pub fn video_probe(
    width: u32,
    height: u32,
    frame_rate: &str,
    video_codec: &str,
    audio_codec: Option<&str>,
    duration_seconds: f64,
) -> ProbeOutput {
    let mut streams = vec![ProbeStream {
        index: 0,
        codec_type: Some("video".to_string()),
        codec_name: Some(video_codec.to_string()),
        width: Some(width),
        height: Some(height),
        r_frame_rate: Some(frame_rate.to_string()),
        avg_frame_rate: Some(frame_rate.to_string()),
        ..ProbeStream::default()
    }];
    if let Some(codec) = audio_codec {
        streams.push(ProbeStream {
            index: 1,
            codec_type: Some("audio".to_string()),
            codec_name: Some(codec.to_string()),
            ..ProbeStream::default()
        });
    }
    ProbeOutput {
        format: ProbeFormat {
            format_name: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
            duration: Some(format!("{:.6}", duration_seconds)),
            ..ProbeFormat::default()
        },
        streams,
    }
}

/// Build the probe output of an audio-only file
pub fn audio_probe(codec: &str, duration_seconds: f64) -> ProbeOutput {
    ProbeOutput {
        format: ProbeFormat {
            duration: Some(format!("{:.6}", duration_seconds)),
            ..ProbeFormat::default()
        },
        streams: vec![ProbeStream {
            index: 0,
            codec_type: Some("audio".to_string()),
            codec_name: Some(codec.to_string()),
            ..ProbeStream::default()
        }],
    }
}

/// Probe adapter backed by fixtures; unknown paths are reported as missing files
#[derive(Default)]
pub struct MockProbeAdapter {
    outputs: HashMap<PathBuf, ProbeOutput>,
    failures: HashMap<PathBuf, ProbeFailureKind>,
    delays: HashMap<PathBuf, Duration>,
    panics: HashSet<PathBuf>,
    probe_count: AtomicUsize,
    completed: AtomicUsize,
}

impl MockProbeAdapter {
    /// Create new mock probe adapter with no fixtures
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>, output: ProbeOutput) -> Self {
        self.outputs.insert(path.into(), output);
        self
    }

    pub fn with_failure(mut self, path: impl Into<PathBuf>, kind: ProbeFailureKind) -> Self {
        self.failures.insert(path.into(), kind);
        self
    }

    /// Delay the answer for `path`
    pub fn with_delay(mut self, path: impl Into<PathBuf>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    /// Panic inside the probe call for `path`
    pub fn with_panic(mut self, path: impl Into<PathBuf>) -> Self {
        self.panics.insert(path.into());
        self
    }

    /// Number of probe calls started
    pub fn probe_count(&self) -> usize {
        self.probe_count.load(Ordering::SeqCst)
    }

    /// Number of probe calls that ran to completion and returned metadata
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, DomainError> {
        self.probe_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if self.panics.contains(path) {
            panic!("probe crashed on {}", path.display());
        }
        if let Some(kind) = self.failures.get(path) {
            return Err(DomainError::probe(path, *kind, "mock failure"));
        }

        let output = self
            .outputs
            .get(path)
            .cloned()
            .ok_or_else(|| DomainError::probe(path, ProbeFailureKind::FileNotFound, "no such fixture"))?;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(output)
    }
}

/// Execution adapter that records plans and returns a fixed outcome
#[derive(Default)]
pub struct MockExecutionAdapter {
    failure: Option<String>,
    executed: Mutex<Vec<(ExecutionPlan, PathBuf)>>,
}

impl MockExecutionAdapter {
    /// Create new mock execution adapter that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every execution fail with `detail`
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            failure: Some(detail.into()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Plans executed so far, with their output paths
    pub fn executed(&self) -> Vec<(ExecutionPlan, PathBuf)> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ExecutePort for MockExecutionAdapter {
    async fn execute(&self, plan: &ExecutionPlan, output_path: &Path) -> OperationResult {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((plan.clone(), output_path.to_path_buf()));

        match &self.failure {
            Some(detail) => OperationResult::failure(output_path, detail.clone(), Duration::ZERO),
            None => OperationResult::success(output_path, Duration::ZERO),
        }
    }
}
