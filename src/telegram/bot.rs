//! Bot instance creation

use reqwest::ClientBuilder;
use teloxide::prelude::*;

use crate::core::config::BotConfig;

/// Creates a Bot with the configured token, request timeout and optional API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token, invalid API URL or HTTP client failure
pub fn create_bot(config: &BotConfig) -> anyhow::Result<Bot> {
    if !config.has_token() {
        anyhow::bail!("bot token is not configured (set JOBBOARD_BOT_TOKEN)");
    }

    let client = ClientBuilder::new().timeout(config.request_timeout()).build()?;
    let bot = Bot::with_client(config.token(), client);

    let bot = match &config.api_url {
        Some(api_url) => {
            log::info!("Using custom Bot API URL: {}", api_url);
            let url = url::Url::parse(api_url).map_err(|e| anyhow::anyhow!("Invalid api_url: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}
