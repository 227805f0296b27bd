use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;

use jobboard::cli::{Cli, Commands};
use jobboard::core::config::BotConfig;
use jobboard::core::types::AttributeKind;
use jobboard::core::{init_logger, log_startup_configuration, web_server};
use jobboard::push::{PushQueue, PushWorker};
use jobboard::storage::{catalog, create_pool, get_connection};
use jobboard::telegram::bot::create_bot;
use jobboard::telegram::{HandlerDeps, Messenger, TeloxideMessenger};

/// Main entry point for the job board bot
///
/// Parses CLI arguments and dispatches to the selected subcommand.
///
/// # Errors
/// Returns an error if initialization fails (config, logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    let config = BotConfig::load(cli.config.as_deref())?;

    // Initialize logger (console + file)
    init_logger(&config.log_file)?;

    match cli.command {
        Some(Commands::Run { port }) => run_bot(config, port).await,
        Some(Commands::Migrate) => run_migrate(&config),
        Some(Commands::AddAttribute { kind, name }) => run_add_attribute(&config, &kind, &name),
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(config, None).await
        }
    }
}

/// Opens the database, which applies any pending migration.
fn run_migrate(config: &BotConfig) -> Result<()> {
    create_pool(&config.database_path).map_err(|e| anyhow::anyhow!("Failed to migrate database: {}", e))?;
    log::info!("Database {} is up to date", config.database_path);
    Ok(())
}

fn run_add_attribute(config: &BotConfig, kind: &str, name: &str) -> Result<()> {
    let kind: AttributeKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let pool = create_pool(&config.database_path).map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;
    let conn = get_connection(&pool)?;
    let entry = catalog::add_attribute(&conn, kind, name)?;
    log::info!("Added {} '{}' with id {}", kind.table(), entry.name, entry.id);
    Ok(())
}

async fn run_bot(mut config: BotConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    log_startup_configuration(&config);

    let bot = create_bot(&config)?;
    let messenger: Arc<dyn Messenger> = Arc::new(TeloxideMessenger::new(bot, &config.channel));

    // Create database connection pool
    let db_pool = Arc::new(
        create_pool(&config.database_path).map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?,
    );

    let (queue, wake) = PushQueue::new(Some(Arc::clone(&db_pool)));
    let push_queue = Arc::new(queue);
    match push_queue.restore().await {
        Ok(restored) if restored > 0 => push_queue.signal(),
        Ok(_) => {}
        Err(e) => log::error!("Failed to restore push requests: {}", e),
    }

    let worker = PushWorker::new(Arc::clone(&push_queue), Arc::clone(&messenger), config.push.clone());
    tokio::spawn(worker.run(wake));

    let port = config.port;
    let deps = HandlerDeps::new(db_pool, messenger, push_queue, Arc::new(config));

    tokio::select! {
        result = web_server::start_web_server(port, deps) => result,
        _ = signal::ctrl_c() => {
            log::info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
