//! # Chess puzzle bot
//!
//! Posts the chess.com daily puzzle to subscribed channels. Wires chess-client,
//! storage, and the Mattermost adapter; channels subscribe through a slash
//! command served by the webhook, and the dispatcher fans the puzzle out on a
//! fixed interval, deduplicating per channel by the puzzle's publish timestamp.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod format;
pub mod mattermost;
pub mod runner;
pub mod webhook;

pub use cli::{load_config, Cli, Commands};
pub use commands::{Command, CommandHandler};
pub use config::BotConfig;
pub use dispatcher::{Dispatcher, TickReport};
pub use format::format_puzzle_post;
pub use mattermost::MattermostApi;
pub use runner::{build_components, run_bot, BotComponents};
pub use webhook::{router, SlashCommandRequest, SlashCommandResponse, WebhookState};

// Re-export core (from puzzle-core)
pub use puzzle_core::{init_tracing, ChatApi, CreatedPost, DeliveryError, Puzzle};
