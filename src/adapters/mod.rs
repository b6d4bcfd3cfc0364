// Adapters - External system implementations

pub mod exec_ffmpeg;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
pub mod probe_ffprobe;
pub mod runner;
pub mod toml_config;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use mock::{MockExecutionAdapter, MockProbeAdapter};
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::ToolConfig;
