//! Bearer credentials for the hosted agent API.

mod client_credentials;

pub use client_credentials::ClientCredentialsProvider;

use crate::error::Result;
use async_trait::async_trait;

/// Produces a valid bearer token on demand, refreshing it when needed.
///
/// Failures surface as [`crate::error::PingError::Auth`] so callers can tell
/// "we could not even ask" apart from "the agent said nothing useful".
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// Fixed token, for pre-issued keys and tests.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
