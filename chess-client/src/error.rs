use thiserror::Error;

/// Errors fetching the daily puzzle. Any variant aborts the current dispatch
/// tick; the next tick retries from scratch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Puzzle endpoint returned status {0}")]
    Status(u16),

    #[error("Malformed puzzle response: {0}")]
    Decode(#[from] serde_json::Error),
}
