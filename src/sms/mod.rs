//! Outbound SMS: the gateway seam, the Twilio implementation and the
//! per-recipient fan-out with dry-run support.

mod sender;
mod twilio;

pub use sender::{SendReport, SmsSender, clean_recipients};
pub use twilio::TwilioGateway;

use crate::error::Result;
use async_trait::async_trait;

/// Delivers one message to one phone number.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    fn name(&self) -> &str;

    /// A rejected message is [`crate::error::PingError::Send`].
    async fn send(&self, to: &str, body: &str) -> Result<()>;
}
