use reqwest::Client;
use std::time::Duration;

/// Shared client for the token endpoint, the agent API and the SMS gateway.
///
/// The total timeout bounds every single request; a timed out request aborts
/// the run like any other transport failure.
pub fn build_client_with_timeout(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}
