//! Mattermost REST adapter.
//!
//! Implements the core [`ChatApi`] trait over `/api/v4/posts` and
//! `/api/v4/reactions`. The platform's plugin lifecycle and command
//! registration stay outside this process; the bot is an ordinary bot account
//! with a bearer token.

use async_trait::async_trait;
use puzzle_core::{ChatApi, CreatedPost, DeliveryError};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize)]
struct CreatePostRequest<'a> {
    channel_id: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct PostResponse {
    id: String,
    channel_id: String,
}

#[derive(Serialize)]
struct AddReactionRequest<'a> {
    user_id: &'a str,
    post_id: &'a str,
    emoji_name: &'a str,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
}

/// Mattermost-backed implementation of [`ChatApi`].
pub struct MattermostApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
    /// Bot account id; reactions must name the reacting user.
    user_id: String,
}

impl MattermostApi {
    /// Connects to the platform: resolves the bot account behind `token` via
    /// `/api/v4/users/me` so reactions can be attributed to it.
    pub async fn connect(base_url: &str, token: &str) -> Result<Self, DeliveryError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/api/v4/users/me", base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DeliveryError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(
                status.as_u16(),
                "resolving bot account".to_string(),
            ));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Api(e.to_string()))?;

        info!(bot_user_id = %user.id, "Connected to chat platform");

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
            user_id: user.id,
        })
    }

    /// Id of the bot account this adapter posts as.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl ChatApi for MattermostApi {
    async fn create_post(
        &self,
        channel_id: &str,
        message: &str,
    ) -> Result<CreatedPost, DeliveryError> {
        let response = self
            .client
            .post(format!("{}/api/v4/posts", self.base_url))
            .bearer_auth(&self.token)
            .json(&CreatePostRequest {
                channel_id,
                message,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(
                status.as_u16(),
                format!("creating post in channel {}", channel_id),
            ));
        }

        let post: PostResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Api(e.to_string()))?;

        Ok(CreatedPost {
            id: post.id,
            channel_id: post.channel_id,
        })
    }

    async fn add_reaction(&self, post_id: &str, emoji: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(format!("{}/api/v4/reactions", self.base_url))
            .bearer_auth(&self.token)
            .json(&AddReactionRequest {
                user_id: &self.user_id,
                post_id,
                emoji_name: emoji,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(
                status.as_u16(),
                format!("adding reaction to post {}", post_id),
            ));
        }

        Ok(())
    }
}
