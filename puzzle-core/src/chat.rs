//! Chat platform abstraction for posting puzzles.
//!
//! [`ChatApi`] is transport-agnostic; puzzle-bot's `MattermostApi` implements
//! it over the platform REST API. Tests implement it with a recording mock.

use crate::error::DeliveryError;
use async_trait::async_trait;

/// A post the platform created for us; the id is needed to attach reactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPost {
    pub id: String,
    pub channel_id: String,
}

/// Abstraction over the chat platform's posting surface.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Posts a message to the given channel and returns the created post.
    async fn create_post(
        &self,
        channel_id: &str,
        message: &str,
    ) -> Result<CreatedPost, DeliveryError>;

    /// Adds an emoji reaction to an existing post.
    async fn add_reaction(&self, post_id: &str, emoji: &str) -> Result<(), DeliveryError>;
}
