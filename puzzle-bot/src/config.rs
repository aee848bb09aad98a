//! Bot config: chat platform connection, puzzle endpoint, schedule, logging,
//! database. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Full bot configuration. Use [`BotConfig::load`] for env-based loading and
/// call [`validate`](Self::validate) before init to fail fast.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// MATTERMOST_URL — base URL of the chat platform REST API
    pub mattermost_url: String,
    /// BOT_TOKEN — bearer token of the bot account
    pub bot_token: String,
    /// COMMAND_TOKEN — slash-command verification token; unset skips the check
    pub command_token: Option<String>,
    /// PUZZLE_API_URL — daily puzzle endpoint
    pub puzzle_api_url: String,
    /// FETCH_INTERVAL_MINS — minutes between dispatch ticks
    pub fetch_interval_mins: u64,
    /// DATABASE_URL — SQLite file holding the subscription registry
    pub database_url: String,
    /// LISTEN_ADDR — bind address for the slash-command webhook
    pub listen_addr: String,
    /// LOG_FILE — log file path
    pub log_file: String,
    /// REACTION_EMOJI — reaction added to each posted puzzle; empty disables
    pub reaction_emoji: Option<String>,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let mattermost_url = env::var("MATTERMOST_URL").context("MATTERMOST_URL not set")?;
        let command_token = env::var("COMMAND_TOKEN").ok().filter(|t| !t.is_empty());
        let puzzle_api_url = env::var("PUZZLE_API_URL")
            .unwrap_or_else(|_| chess_client::DAILY_PUZZLE_URL.to_string());
        let fetch_interval_mins = env::var("FETCH_INTERVAL_MINS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "chess_puzzle_bot.db".to_string());
        let listen_addr =
            env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3231".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/chess-puzzle-bot.log".to_string());
        let reaction_emoji = match env::var("REACTION_EMOJI") {
            Ok(emoji) if emoji.is_empty() => None,
            Ok(emoji) => Some(emoji),
            Err(_) => Some("white_check_mark".to_string()),
        };

        Ok(Self {
            mattermost_url,
            bot_token,
            command_token,
            puzzle_api_url,
            fetch_interval_mins,
            database_url,
            listen_addr,
            log_file,
            reaction_emoji,
        })
    }

    /// Validate config. Call after load() to check URLs and the schedule
    /// before init.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.mattermost_url).is_err() {
            anyhow::bail!("MATTERMOST_URL is not a valid URL: {}", self.mattermost_url);
        }
        if reqwest::Url::parse(&self.puzzle_api_url).is_err() {
            anyhow::bail!("PUZZLE_API_URL is not a valid URL: {}", self.puzzle_api_url);
        }
        if self.fetch_interval_mins == 0 {
            anyhow::bail!("FETCH_INTERVAL_MINS must be at least 1");
        }
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("LISTEN_ADDR is not a valid socket address: {}", self.listen_addr);
        }
        Ok(())
    }

    /// Interval between dispatch ticks.
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_mins * 60)
    }
}
