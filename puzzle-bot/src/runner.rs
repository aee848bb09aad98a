//! Process wiring: config → tracing → components → dispatcher + webhook.

use anyhow::{Context, Result};
use chess_client::ChessClient;
use puzzle_core::{init_tracing, ChatApi};
use std::sync::Arc;
use storage::{SqliteKvStore, SubscriptionStore};
use tracing::info;

use crate::commands::CommandHandler;
use crate::config::BotConfig;
use crate::dispatcher::Dispatcher;
use crate::mattermost::MattermostApi;
use crate::webhook::{self, WebhookState};

/// Everything the bot runs on, built once at startup, owned by the process
/// entry point and shared via Arc. No global state.
pub struct BotComponents {
    pub chess: ChessClient,
    pub store: Arc<SubscriptionStore>,
    pub chat: Arc<dyn ChatApi>,
    pub commands: Arc<CommandHandler>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Builds all components from config: SQLite-backed registry, puzzle client,
/// Mattermost adapter, command handler, dispatcher.
pub async fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let kv = SqliteKvStore::new(&config.database_url)
        .await
        .context("opening subscription database")?;
    let store = Arc::new(SubscriptionStore::new(Arc::new(kv)));

    let chess = ChessClient::with_base_url(config.puzzle_api_url.clone());

    let chat: Arc<dyn ChatApi> = Arc::new(
        MattermostApi::connect(&config.mattermost_url, &config.bot_token)
            .await
            .context("connecting to chat platform")?,
    );

    let commands = Arc::new(CommandHandler::new(
        store.clone(),
        chess.clone(),
        chat.clone(),
        config.reaction_emoji.clone(),
    ));

    let dispatcher = Arc::new(Dispatcher::new(
        chess.clone(),
        store.clone(),
        chat.clone(),
        config.reaction_emoji.clone(),
        config.fetch_interval(),
    ));

    Ok(BotComponents {
        chess,
        store,
        chat,
        commands,
        dispatcher,
    })
}

/// Main entry: validate config, init logging, build components, spawn the
/// dispatch loop, then serve the slash-command webhook until shutdown.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;

    if let Some(parent) = std::path::Path::new(&config.log_file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("creating log directory")?;
        }
    }
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        puzzle_api_url = %config.puzzle_api_url,
        fetch_interval_mins = config.fetch_interval_mins,
        "Initializing chess puzzle bot"
    );

    let components = build_components(&config).await?;

    let dispatcher = components.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.run().await;
    });

    let app = webhook::router(WebhookState {
        commands: components.commands.clone(),
        command_token: config.command_token.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding webhook listener on {}", config.listen_addr))?;
    info!(listen_addr = %config.listen_addr, "Listening for slash commands");

    axum::serve(listener, app)
        .await
        .context("serving slash-command webhook")?;

    Ok(())
}
