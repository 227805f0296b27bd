//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the loaded configuration

use anyhow::Result;
use simplelog::*;
use std::fs::OpenOptions;

use crate::core::config::BotConfig;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file (appended to, created if missing)
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to open the log file or a logger was already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup.
///
/// The bot token is never printed; only whether one is present.
pub fn log_startup_configuration(config: &BotConfig) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Job board bot configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("  database:      {}", config.database_path);
    log::info!("  port:          {}", config.port);
    log::info!("  channel:       {}", config.channel);
    log::info!("  bot url:       {}", config.bot_url);
    match &config.api_url {
        Some(url) => log::info!("  bot api:       {}", url),
        None => log::info!("  bot api:       default"),
    }
    log::info!(
        "  push batching: {} requests then {}s pause",
        config.push.batch_size,
        config.push.pause_secs
    );

    if config.has_token() {
        log::info!("✅ Bot token configured");
    } else {
        log::error!("❌ Bot token missing, set JOBBOARD_BOT_TOKEN");
    }
}
