use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

use crate::core::error::AppResult;

/// Runtime configuration for the bot.
///
/// Loaded once at startup and passed explicitly to the Telegram client, the
/// dispatcher and the web server. Layering (later wins):
/// 1. field defaults
/// 2. TOML file (`jobboard.toml` unless `--config` says otherwise)
/// 3. `JOBBOARD_*` environment variables (`.env` is loaded by `main`)
#[derive(Debug, Deserialize)]
pub struct BotConfig {
    /// Bot API token. `JOBBOARD_BOT_TOKEN`
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub bot_token: SecretString,

    /// Custom Bot API server (local telegram-bot-api instance)
    #[serde(default)]
    pub api_url: Option<String>,

    /// Public channel job posts are broadcast to: `@name` or a numeric chat id
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Bot deep-link base used by "Apply" buttons, e.g. `https://t.me/asseri_bot`
    #[serde(default = "default_bot_url")]
    pub bot_url: String,

    /// Web form employers use to submit a job
    #[serde(default = "default_post_job_url")]
    pub post_job_url: String,

    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Port of the webhook / push-trigger HTTP server
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout applied to every outbound Bot API request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Calling code prepended to local `0XXXXXXXXX` phone numbers
    #[serde(default = "default_country_code")]
    pub country_code: String,

    #[serde(default)]
    pub push: PushSettings,
}

/// Rate limiting of the subscriber push loop.
#[derive(Debug, Clone, Deserialize)]
pub struct PushSettings {
    /// Attempts allowed before the worker pauses
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Length of the pause, in seconds
    #[serde(default = "default_pause_secs")]
    pub pause_secs: u64,
}

impl PushSettings {
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            batch_size: push::DEFAULT_BATCH_SIZE,
            pause_secs: push::DEFAULT_PAUSE_SECS,
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: empty_secret(),
            api_url: None,
            channel: default_channel(),
            bot_url: default_bot_url(),
            post_job_url: default_post_job_url(),
            database_path: default_database_path(),
            log_file: default_log_file(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            country_code: default_country_code(),
            push: PushSettings::default(),
        }
    }
}

impl BotConfig {
    /// Loads the configuration from an optional TOML file plus `JOBBOARD_*` variables.
    ///
    /// A missing file is not an error; figment simply skips it.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let file = path.unwrap_or_else(|| Path::new("jobboard.toml"));
        let config = Figment::new()
            .merge(Toml::file(file))
            .merge(env_provider())
            .extract()?;
        Ok(config)
    }

    /// Parses configuration from TOML text only (no environment).
    pub fn from_toml_str(toml: &str) -> AppResult<Self> {
        Ok(Figment::new().merge(Toml::string(toml)).extract()?)
    }

    pub fn token(&self) -> &str {
        self.bot_token.expose_secret()
    }

    pub fn has_token(&self) -> bool {
        !self.token().trim().is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `JOBBOARD_PUSH_BATCH_SIZE` must land on `push.batch_size`, so sections are
/// mapped explicitly instead of splitting on every underscore.
fn env_provider() -> Env {
    Env::prefixed("JOBBOARD_").map(|key| key.as_str().to_ascii_lowercase().replacen("push_", "push.", 1).into())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_channel() -> String {
    "@asseri_jobs".to_string()
}

fn default_bot_url() -> String {
    "https://t.me/asseri_bot".to_string()
}

fn default_post_job_url() -> String {
    "https://www.asseri.net/job/post.html".to_string()
}

fn default_database_path() -> String {
    "database.sqlite".to_string()
}

fn default_log_file() -> String {
    "bot.log".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    network::REQUEST_TIMEOUT_SECS
}

fn default_country_code() -> String {
    "251".to_string()
}

fn default_batch_size() -> usize {
    push::DEFAULT_BATCH_SIZE
}

fn default_pause_secs() -> u64 {
    push::DEFAULT_PAUSE_SECS
}

/// Subscriber push loop constants
pub mod push {
    /// Bot API allows roughly this many messages before it starts answering 429
    pub const DEFAULT_BATCH_SIZE: usize = 16;

    /// Pause after each batch, in seconds
    pub const DEFAULT_PAUSE_SECS: u64 = 15;

    /// Pending wake signals; extra signals are dropped since one wake drains everything
    pub const WAKE_CHANNEL_CAPACITY: usize = 1000;
}

/// Network configuration
pub mod network {
    /// Timeout for outbound Bot API requests, in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Input limits
pub mod validation {
    /// Maximum length of a user or company name
    pub const MAX_NAME_LENGTH: usize = 255;

    /// Maximum length of a feedback comment
    pub const MAX_FEEDBACK_LENGTH: usize = 1000;
}
