use thiserror::Error;

/// Errors from posting to the chat platform. Per-channel: a delivery failure
/// never aborts a dispatch batch, the channel is retried on the next tick.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Chat API error: {0}")]
    Api(String),

    #[error("Chat API rejected request with status {0}: {1}")]
    Status(u16, String),
}
