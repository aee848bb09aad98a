//! # puzzle-core
//!
//! Core types and traits for the chess puzzle bot: the [`Puzzle`] domain type,
//! the [`ChatApi`] trait for posting to the chat platform, delivery errors, and
//! tracing initialization. Transport-agnostic; used by chess-client, storage and
//! puzzle-bot.

pub mod chat;
pub mod error;
pub mod logger;
pub mod types;

pub use chat::{ChatApi, CreatedPost};
pub use error::DeliveryError;
pub use logger::init_tracing;
pub use types::Puzzle;
