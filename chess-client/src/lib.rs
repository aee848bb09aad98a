//! # chess-client
//!
//! Thin HTTP client for the chess.com daily puzzle endpoint. One GET, one JSON
//! decode, no caching and no retry; a failed fetch simply surfaces as
//! [`FetchError`] and the caller waits for the next tick.

mod error;

pub use error::FetchError;

use puzzle_core::Puzzle;

/// Default endpoint serving the current daily puzzle.
pub const DAILY_PUZZLE_URL: &str = "https://api.chess.com/pub/puzzle";

/// Client for the chess.com public puzzle API.
#[derive(Clone)]
pub struct ChessClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChessClient {
    /// Creates a client against the real chess.com endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DAILY_PUZZLE_URL.to_string())
    }

    /// Creates a client against a custom endpoint (mock servers in tests,
    /// or a PUZZLE_API_URL override in config).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetches the current daily puzzle. Full network round trip on every call.
    #[tracing::instrument(skip(self))]
    pub async fn daily_puzzle(&self) -> Result<Puzzle, FetchError> {
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let puzzle: Puzzle = serde_json::from_str(&body)?;

        tracing::debug!(
            title = %puzzle.title,
            publish_time = puzzle.publish_time,
            "Fetched daily puzzle"
        );

        Ok(puzzle)
    }
}

impl Default for ChessClient {
    fn default() -> Self {
        Self::new()
    }
}
