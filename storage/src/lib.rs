//! Storage crate: key/value persistence and the subscription registry.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`kv`] – KvStore trait and MemoryKvStore
//! - [`sqlite_kv`] – SqliteKvStore (sqlx/SQLite)
//! - [`subscriptions`] – SubscriptionStore (channel → last delivered timestamp)

mod error;
mod kv;
mod sqlite_kv;
mod subscriptions;


pub use error::StoreError;
pub use kv::{KvStore, MemoryKvStore};
pub use sqlite_kv::SqliteKvStore;
pub use subscriptions::{Registry, SubscriptionStore, SUBSCRIPTIONS_KEY};
