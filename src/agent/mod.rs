//! Hosted agent that writes the weekly and welcome content.

mod foundry;
mod messages;
pub mod prompt;

pub use foundry::FoundryAgentClient;

use crate::error::Result;
use async_trait::async_trait;

/// One prompt in, the agent's final reply text out.
///
/// Implementations surface credential problems as
/// [`crate::error::PingError::Auth`] and everything else that goes wrong on
/// the wire (non-2xx, timeouts, failed runs) as
/// [`crate::error::PingError::AgentTransport`]. Nothing is retried.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
