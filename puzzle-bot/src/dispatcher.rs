//! Periodic reconciliation: fetch the puzzle once, fan out to every subscribed
//! channel that has not seen it yet, then commit the delivered timestamps.
//!
//! Delivery is at-least-once: the registry is committed after the whole
//! iteration, so a crash mid-tick loses the in-memory progress and the next
//! tick re-delivers. A per-channel failure only skips that channel.

use crate::format::format_puzzle_post;
use anyhow::{Context, Result};
use chess_client::ChessClient;
use puzzle_core::{ChatApi, DeliveryError, Puzzle};
use std::sync::Arc;
use std::time::Duration;
use storage::SubscriptionStore;
use tracing::{info, instrument, warn};

/// Outcome of one tick, for logging and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// The scheduled job: owns the puzzle source, the registry, and the chat
/// adapter, and runs the reconciliation on a fixed interval.
pub struct Dispatcher {
    chess: ChessClient,
    store: Arc<SubscriptionStore>,
    chat: Arc<dyn ChatApi>,
    reaction_emoji: Option<String>,
    interval: Duration,
}

/// Posts the puzzle to one channel; on success adds the reaction best-effort.
/// A failed reaction is cosmetic: the puzzle reached the channel, so the
/// delivery still counts and the timestamp advances.
pub(crate) async fn deliver(
    chat: &dyn ChatApi,
    reaction_emoji: Option<&str>,
    channel_id: &str,
    puzzle: &Puzzle,
) -> Result<(), DeliveryError> {
    let message = format_puzzle_post(puzzle);
    let created = chat.create_post(channel_id, &message).await?;

    if let Some(emoji) = reaction_emoji {
        if let Err(e) = chat.add_reaction(&created.id, emoji).await {
            warn!(
                channel_id = %channel_id,
                post_id = %created.id,
                error = %e,
                "Failed to add reaction to puzzle post"
            );
        }
    }

    Ok(())
}

impl Dispatcher {
    pub fn new(
        chess: ChessClient,
        store: Arc<SubscriptionStore>,
        chat: Arc<dyn ChatApi>,
        reaction_emoji: Option<String>,
        interval: Duration,
    ) -> Self {
        Self {
            chess,
            store,
            chat,
            reaction_emoji,
            interval,
        }
    }

    /// One tick of the reconciliation job.
    ///
    /// A fetch or registry failure aborts the tick (Err, nothing saved); a
    /// delivery failure only skips that channel, leaving its timestamp
    /// untouched so it is retried next tick.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<TickReport> {
        let puzzle = self
            .chess
            .daily_puzzle()
            .await
            .context("fetching daily puzzle")?;
        let registry = self
            .store
            .load()
            .await
            .context("loading subscription registry")?;

        let mut report = TickReport::default();
        let mut delivered: Vec<String> = Vec::new();

        for (channel_id, last_ts) in &registry {
            if *last_ts == puzzle.publish_time {
                report.skipped += 1;
                continue;
            }

            match deliver(
                self.chat.as_ref(),
                self.reaction_emoji.as_deref(),
                channel_id,
                &puzzle,
            )
            .await
            {
                Ok(()) => {
                    delivered.push(channel_id.clone());
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(
                        channel_id = %channel_id,
                        error = %e,
                        "Failed to deliver puzzle; will retry next tick"
                    );
                    report.failed += 1;
                }
            }
        }

        if !delivered.is_empty() {
            // Commit through the serialized store and only touch channels that
            // are still subscribed, so a mid-tick subscribe or unsubscribe is
            // not clobbered by this batch.
            self.store
                .update(|registry| {
                    for channel_id in &delivered {
                        if let Some(ts) = registry.get_mut(channel_id) {
                            *ts = puzzle.publish_time;
                        }
                    }
                })
                .await
                .context("committing delivered timestamps")?;
        }

        info!(
            publish_time = puzzle.publish_time,
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "Dispatch tick finished"
        );

        Ok(report)
    }

    /// Runs ticks forever on the configured interval. Tick failures are logged
    /// and swallowed; nothing here is fatal to the process.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.run_once().await {
                warn!(error = %e, "Dispatch tick aborted");
            }
        }
    }
}
