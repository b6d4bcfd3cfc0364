//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::toml_config::{ToolConfig, DEFAULT_CONFIG_FILE};
use crate::cli::Cli;

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<ToolConfig> {
    resolve_configuration(cli, |key| std::env::var(key).ok())
}

/// Same hierarchy with an injectable environment
pub fn resolve_configuration<F>(cli: &Cli, env: F) -> Result<ToolConfig>
where
    F: Fn(&str) -> Option<String>,
{
    info!("Initializing configuration hierarchy");

    let mut config = match config_file(cli) {
        Some(path) => ToolConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ToolConfig::default(),
    };

    config.apply_env_with(env)?;
    apply_cli_overrides(&mut config, cli);
    config.validate().context("Invalid configuration")?;

    info!(
        "Using ffmpeg '{}' and ffprobe '{}'",
        config.executables.ffmpeg, config.executables.ffprobe
    );
    Ok(config)
}

/// An explicit `--config` must exist; the default file is optional
fn config_file(cli: &Cli) -> Option<PathBuf> {
    if let Some(path) = &cli.config {
        return Some(path.clone());
    }
    let default = Path::new(DEFAULT_CONFIG_FILE);
    default.is_file().then(|| default.to_path_buf())
}

fn apply_cli_overrides(config: &mut ToolConfig, cli: &Cli) {
    if let Some(ffmpeg) = &cli.ffmpeg {
        config.executables.ffmpeg = ffmpeg.clone();
    }
    if let Some(ffprobe) = &cli.ffprobe {
        config.executables.ffprobe = ffprobe.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.execution.timeout_seconds = timeout;
    }
    if let Some(dir) = &cli.temp_dir {
        config.execution.temp_dir = Some(dir.clone());
    }
}
