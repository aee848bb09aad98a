//! Shared test fixtures: a recording [`ChatApi`] mock and a mockito-backed
//! puzzle endpoint.

use async_trait::async_trait;
use chess_client::ChessClient;
use puzzle_core::{ChatApi, CreatedPost, DeliveryError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded `create_post` call.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub channel_id: String,
    pub message: String,
}

/// One recorded `add_reaction` call.
#[derive(Debug, Clone)]
pub struct ReactionRecord {
    pub post_id: String,
    pub emoji: String,
}

/// Mock ChatApi that records every post and reaction, mints sequential post
/// ids, and can be told to fail deliveries to specific channels.
#[derive(Default)]
pub struct RecordingChatApi {
    posts: Mutex<Vec<PostRecord>>,
    reactions: Mutex<Vec<ReactionRecord>>,
    fail_channels: Mutex<HashSet<String>>,
    next_id: AtomicUsize,
}

#[allow(dead_code)] // not every test file uses every accessor
impl RecordingChatApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `create_post` fail for this channel until `heal_channel`.
    pub fn fail_channel(&self, channel_id: &str) {
        self.fail_channels
            .lock()
            .unwrap()
            .insert(channel_id.to_string());
    }

    pub fn heal_channel(&self, channel_id: &str) {
        self.fail_channels.lock().unwrap().remove(channel_id);
    }

    pub fn posts(&self) -> Vec<PostRecord> {
        self.posts.lock().unwrap().clone()
    }

    pub fn reactions(&self) -> Vec<ReactionRecord> {
        self.reactions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for RecordingChatApi {
    async fn create_post(
        &self,
        channel_id: &str,
        message: &str,
    ) -> Result<CreatedPost, DeliveryError> {
        if self.fail_channels.lock().unwrap().contains(channel_id) {
            return Err(DeliveryError::Api(format!(
                "simulated delivery failure for {}",
                channel_id
            )));
        }

        self.posts.lock().unwrap().push(PostRecord {
            channel_id: channel_id.to_string(),
            message: message.to_string(),
        });

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedPost {
            id: format!("post-{}", id),
            channel_id: channel_id.to_string(),
        })
    }

    async fn add_reaction(&self, post_id: &str, emoji: &str) -> Result<(), DeliveryError> {
        self.reactions.lock().unwrap().push(ReactionRecord {
            post_id: post_id.to_string(),
            emoji: emoji.to_string(),
        });
        Ok(())
    }
}

/// Puzzle endpoint JSON with the given publish timestamp.
#[allow(dead_code)]
pub fn puzzle_body(publish_time: i64) -> String {
    format!(
        r#"{{
            "title": "Daily Test Puzzle",
            "url": "https://www.chess.com/daily-chess-puzzle/test",
            "publish_time": {},
            "fen": "8/8/8/8/8/8/8/8 w - - 0 1",
            "pgn": "*",
            "image": "https://www.chess.com/dynboard?fen=test"
        }}"#,
        publish_time
    )
}

/// Starts a mockito server answering the daily puzzle GET with the given
/// publish timestamp. Keep both guards alive for the test's duration.
#[allow(dead_code)]
pub async fn mock_puzzle_server(
    publish_time: i64,
) -> (mockito::ServerGuard, mockito::Mock, ChessClient) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(puzzle_body(publish_time))
        .expect_at_least(0)
        .create_async()
        .await;

    let client = ChessClient::with_base_url(server.url());
    (server, mock, client)
}
