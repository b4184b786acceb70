use super::{SmsGateway, TwilioGateway};
use crate::config::SmsConfig;
use crate::content::OutboundMessage;
use crate::error::{PingError, Result};
use reqwest::Client;
use std::sync::Arc;

/// Trim, drop blanks and duplicates, keep the configured order.
pub fn clean_recipients(raw: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(raw.len());
    for number in raw.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if !cleaned.iter().any(|seen| seen == number) {
            cleaned.push(number.to_string());
        }
    }
    cleaned
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReport {
    pub delivered: usize,
    pub dry_run: bool,
}

enum Delivery {
    DryRun,
    Live(Arc<dyn SmsGateway>),
}

/// Sends one message to every recipient, stopping at the first rejection.
///
/// In dry-run mode there is no gateway at all: each send is logged as
/// `[DRY_RUN] → <to>: <body>` and counted as delivered.
pub struct SmsSender {
    recipients: Vec<String>,
    delivery: Delivery,
}

impl SmsSender {
    pub fn live(gateway: Arc<dyn SmsGateway>, recipients: &[String]) -> Result<Self> {
        Self::with_delivery(Delivery::Live(gateway), recipients)
    }

    pub fn dry_run(recipients: &[String]) -> Result<Self> {
        Self::with_delivery(Delivery::DryRun, recipients)
    }

    /// Twilio sender, or a dry-run sender that needs no credentials.
    pub fn from_config(config: &SmsConfig, client: Client) -> Result<Self> {
        if config.dry_run {
            return Self::dry_run(&config.recipients);
        }
        let gateway = TwilioGateway::from_config(config, client)?;
        Self::live(Arc::new(gateway), &config.recipients)
    }

    fn with_delivery(delivery: Delivery, recipients: &[String]) -> Result<Self> {
        let recipients = clean_recipients(recipients);
        if recipients.is_empty() {
            return Err(PingError::Config(
                "no sms recipients configured (set RECIPIENT_NUMBERS)".into(),
            ));
        }
        Ok(Self {
            recipients,
            delivery,
        })
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self.delivery, Delivery::DryRun)
    }

    pub async fn send(&self, message: &OutboundMessage) -> Result<SendReport> {
        let body = message.body();
        let mut delivered = 0;

        for to in &self.recipients {
            match &self.delivery {
                Delivery::DryRun => {
                    tracing::info!("[DRY_RUN] → {to}: {body}");
                }
                Delivery::Live(gateway) => {
                    gateway.send(to, body).await?;
                    tracing::debug!(gateway = gateway.name(), to = %to, "sms sent");
                }
            }
            delivered += 1;
        }

        tracing::info!(
            delivered,
            chars = message.char_count(),
            dry_run = self.is_dry_run(),
            "sms fan-out complete"
        );
        Ok(SendReport {
            delivered,
            dry_run: self.is_dry_run(),
        })
    }
}
