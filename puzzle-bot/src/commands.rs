//! Slash command surface: `/chesspuzzle subscribe` and `/chesspuzzle
//! unsubscribe`, scoped to the invoking channel.

use crate::dispatcher::deliver;
use chess_client::ChessClient;
use puzzle_core::ChatApi;
use std::sync::Arc;
use storage::SubscriptionStore;
use tracing::{error, info, warn};

/// Reply for an unknown or missing subcommand.
pub const USAGE: &str = "Usage: /chesspuzzle <subscribe|unsubscribe>";

const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// A parsed subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Subscribe,
    Unsubscribe,
}

impl Command {
    /// Parses the slash-command argument text. Whitespace-trimmed,
    /// case-insensitive, exactly one word.
    pub fn parse(text: &str) -> Option<Command> {
        let mut words = text.split_whitespace();
        let command = match words.next()?.to_ascii_lowercase().as_str() {
            "subscribe" => Command::Subscribe,
            "unsubscribe" => Command::Unsubscribe,
            _ => return None,
        };
        match words.next() {
            Some(_) => None,
            None => Some(command),
        }
    }
}

/// Handles subscribe/unsubscribe for the invoking channel and answers with a
/// short acknowledgment text.
pub struct CommandHandler {
    store: Arc<SubscriptionStore>,
    chess: ChessClient,
    chat: Arc<dyn ChatApi>,
    reaction_emoji: Option<String>,
}

impl CommandHandler {
    pub fn new(
        store: Arc<SubscriptionStore>,
        chess: ChessClient,
        chat: Arc<dyn ChatApi>,
        reaction_emoji: Option<String>,
    ) -> Self {
        Self {
            store,
            chess,
            chat,
            reaction_emoji,
        }
    }

    /// Runs one command invocation and returns the reply text.
    pub async fn handle(&self, channel_id: &str, text: &str) -> String {
        match Command::parse(text) {
            Some(Command::Subscribe) => self.subscribe(channel_id).await,
            Some(Command::Unsubscribe) => self.unsubscribe(channel_id).await,
            None => USAGE.to_string(),
        }
    }

    /// Inserts the channel with timestamp 0 unless already present, then
    /// delivers the current puzzle right away, best-effort. The subscription
    /// stays committed even when the immediate delivery fails.
    async fn subscribe(&self, channel_id: &str) -> String {
        let mut already_subscribed = false;
        let update = self
            .store
            .update(|registry| {
                if registry.contains_key(channel_id) {
                    already_subscribed = true;
                } else {
                    registry.insert(channel_id.to_string(), 0);
                }
            })
            .await;

        if let Err(e) = update {
            error!(channel_id = %channel_id, error = %e, "Subscribe failed");
            return GENERIC_FAILURE.to_string();
        }
        if already_subscribed {
            return "Channel is already subscribed".to_string();
        }

        info!(channel_id = %channel_id, "Channel subscribed");

        match self.deliver_now(channel_id).await {
            Ok(()) => "Subscribed successfully.".to_string(),
            Err(reason) => {
                warn!(
                    channel_id = %channel_id,
                    error = %reason,
                    "Immediate delivery after subscribe failed"
                );
                "Subscribed successfully. Today's puzzle could not be posted yet; \
                 it will be delivered on the next scheduled run."
                    .to_string()
            }
        }
    }

    async fn unsubscribe(&self, channel_id: &str) -> String {
        let mut was_subscribed = false;
        let update = self
            .store
            .update(|registry| {
                was_subscribed = registry.remove(channel_id).is_some();
            })
            .await;

        if let Err(e) = update {
            error!(channel_id = %channel_id, error = %e, "Unsubscribe failed");
            return GENERIC_FAILURE.to_string();
        }
        if !was_subscribed {
            return "Channel is not subscribed".to_string();
        }

        info!(channel_id = %channel_id, "Channel unsubscribed");
        "Unsubscribed successfully.".to_string()
    }

    /// Fetches and posts the current puzzle to one channel, then records the
    /// delivery so the next tick does not post the same puzzle again.
    async fn deliver_now(&self, channel_id: &str) -> Result<(), String> {
        let puzzle = self
            .chess
            .daily_puzzle()
            .await
            .map_err(|e| e.to_string())?;

        deliver(
            self.chat.as_ref(),
            self.reaction_emoji.as_deref(),
            channel_id,
            &puzzle,
        )
        .await
        .map_err(|e| e.to_string())?;

        // Best-effort: a failed timestamp commit means one duplicate post on
        // the next tick, which at-least-once delivery already allows.
        if let Err(e) = self
            .store
            .update(|registry| {
                if let Some(ts) = registry.get_mut(channel_id) {
                    *ts = puzzle.publish_time;
                }
            })
            .await
        {
            warn!(channel_id = %channel_id, error = %e, "Failed to record immediate delivery");
        }

        Ok(())
    }
}
