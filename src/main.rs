use anyhow::Result;
use clap::Parser;
use tracing::info;

use joinx_cli::app::DefaultAppContainer;
use joinx_cli::cli::{commands, Cli, Commands};
use joinx_cli::config_initialization::initialize_configuration_hierarchy;
use joinx_cli::utils::{LogFormat, LogLevel, LoggingConfig, LoggingSystem};

/// Main entry point for the JoinX CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingSystem::new(LoggingConfig {
        level: LogLevel::parse(&cli.log_level)?,
        format: LogFormat::parse(&cli.log_format)?,
        ..LoggingConfig::default()
    })
    .initialize()?;

    info!("Starting JoinX CLI Video Joiner");

    let config = initialize_configuration_hierarchy(&cli)?;
    let container = DefaultAppContainer::new(&config);

    match cli.command {
        Commands::Inspect(args) => commands::inspect(&container, args).await?,
        Commands::Check(args) => commands::check(&container, args).await?,
        Commands::Concat(args) => commands::concat(&container, args).await?,
        Commands::Mix(args) => commands::mix(&container, args).await?,
        Commands::Doctor => commands::doctor(&config).await?,
    }

    info!("JoinX CLI completed successfully");
    Ok(())
}
