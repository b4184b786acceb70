//! Durable send-state flags.

mod memory;
mod run_state;
mod sqlite;

pub use memory::MemoryStateStore;
pub use run_state::{
    KEY_FIRST_SEEN_AT, KEY_LAST_SENT_AT, KEY_SMOKE_TS, KEY_WELCOME_SENT, KEY_WELCOME_SENT_AT,
    RunState,
};
pub use sqlite::SqliteStateStore;

use crate::error::Result;
use async_trait::async_trait;

/// Small string key-value store shared by every run.
///
/// No transactions: runs are serialized by the external trigger cadence, and
/// an overlap at worst causes one duplicate send.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
