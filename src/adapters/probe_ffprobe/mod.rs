//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe -v error -print_format json -show_format -show_streams` and
//! classifies every failure into a [`ProbeFailureKind`].

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::runner::{run_tool, RunError};
use crate::domain::errors::*;
use crate::ports::*;
use crate::probe::ProbeOutput;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
    timeout: Duration,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn args(path: &Path) -> Vec<OsString> {
        [
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            "--",
        ]
        .iter()
        .map(OsString::from)
        .chain(std::iter::once(path.as_os_str().to_os_string()))
        .collect()
    }
}

/// Map a failed ffprobe run to a failure kind
fn classify_failure(stderr: &str) -> ProbeFailureKind {
    let lowered = stderr.to_lowercase();
    if lowered.contains("no such file or directory") {
        ProbeFailureKind::FileNotFound
    } else if lowered.contains("invalid data found") || lowered.contains("could not find codec parameters") {
        ProbeFailureKind::NoDecodableStream
    } else {
        ProbeFailureKind::ToolExecution
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<ProbeOutput, DomainError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(DomainError::probe(path, ProbeFailureKind::FileNotFound, "not a regular file")),
            Err(e) => return Err(DomainError::probe(path, ProbeFailureKind::FileNotFound, e.to_string())),
        }

        let output = run_tool(&self.program, &Self::args(path), self.timeout)
            .await
            .map_err(|e: RunError| DomainError::probe(path, ProbeFailureKind::ToolExecution, e.to_string()))?;

        if !output.success() {
            let kind = classify_failure(&output.stderr);
            debug!("ffprobe failed for {}: {:?}", path.display(), kind);
            return Err(DomainError::probe(path, kind, output.failure_detail()));
        }

        ProbeOutput::from_json(&output.stdout)
            .map_err(|e| DomainError::probe(path, ProbeFailureKind::MalformedMetadata, format!("invalid ffprobe JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_end_with_path() {
        let args = crate::engine::display_args(&FFprobeAdapter::args(Path::new("-weird name.mp4")));
        assert_eq!(args[..6], ["-v", "error", "-print_format", "json", "-show_format", "-show_streams"]);
        assert_eq!(args[6], "--");
        assert_eq!(args[7], "-weird name.mp4");
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(
            classify_failure("clip.mp4: Invalid data found when processing input"),
            ProbeFailureKind::NoDecodableStream
        );
        assert_eq!(
            classify_failure("clip.mp4: No such file or directory"),
            ProbeFailureKind::FileNotFound
        );
        assert_eq!(classify_failure("Segmentation fault"), ProbeFailureKind::ToolExecution);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_probed() {
        let adapter = FFprobeAdapter::new("joinx-no-such-ffprobe", Duration::from_secs(1));
        let err = adapter.probe(Path::new("/no/such/input.mp4")).await.unwrap_err();
        assert_eq!(err.probe_kind(), Some(ProbeFailureKind::FileNotFound));
    }

    #[cfg(unix)]
    fn fake_ffprobe(dir: &Path) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("ffprobe-fake");
        let script = r#"#!/bin/sh
for last; do :; done
[ -f "$last" ] || { echo "$last: No such file or directory" >&2; exit 1; }
echo '{"format":{"duration":"1.000000"},"streams":[]}'
"#;
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_file_name_reaches_tool_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join(OsStr::from_bytes(b"clip\xff.mp4"));
        std::fs::write(&input, b"").unwrap();

        let adapter = FFprobeAdapter::new(fake_ffprobe(dir.path()), Duration::from_secs(5));
        let output = adapter.probe(&input).await.unwrap();
        assert_eq!(output.format.duration.as_deref(), Some("1.000000"));
    }

    #[tokio::test]
    async fn test_missing_tool_is_execution_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let adapter = FFprobeAdapter::new("joinx-no-such-ffprobe", Duration::from_secs(1));
        let err = adapter.probe(file.path()).await.unwrap_err();
        assert_eq!(err.probe_kind(), Some(ProbeFailureKind::ToolExecution));
    }
}
