//! Core domain types.

use serde::{Deserialize, Serialize};

/// The daily puzzle as served by the chess.com API. Ephemeral: fetched fresh
/// on every tick, never persisted. `publish_time` (epoch seconds) is the only
/// deduplication key the rest of the system has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub title: String,
    pub url: String,
    pub publish_time: i64,
    pub fen: String,
    pub pgn: String,
    pub image: String,
}
