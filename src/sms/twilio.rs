use super::SmsGateway;
use crate::config::SmsConfig;
use crate::error::{PingError, Result};
use crate::utils::scrub::error_body;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MessageResource {
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Twilio Programmable Messaging over its REST API.
pub struct TwilioGateway {
    messages_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: Client,
}

fn required(value: Option<&str>, name: &str, env: &str) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PingError::Config(format!("{name} is not configured (set {env})")))
}

impl TwilioGateway {
    pub fn from_config(config: &SmsConfig, client: Client) -> Result<Self> {
        let account_sid = required(
            config.account_sid.as_deref(),
            "sms.account_sid",
            "TWILIO_ACCOUNT_SID",
        )?;
        let auth_token = required(
            config.auth_token.as_deref(),
            "sms.auth_token",
            "TWILIO_AUTH_TOKEN",
        )?;
        let from_number = required(
            config.from_number.as_deref(),
            "sms.from_number",
            "TWILIO_FROM_NUMBER",
        )?;

        let base = config.api_base.trim_end_matches('/');
        Ok(Self {
            messages_url: format!("{base}/2010-04-01/Accounts/{account_sid}/Messages.json"),
            account_sid,
            auth_token,
            from_number,
            client,
        })
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, to: &str, body: &str) -> Result<()> {
        let form = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];
        let response = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| PingError::Send {
                recipient: to.to_string(),
                message: if e.is_timeout() {
                    "request timed out".into()
                } else {
                    format!("request failed: {e}")
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_body(response).await;
            return Err(PingError::Send {
                recipient: to.to_string(),
                message: format!("gateway returned {status}: {detail}"),
            });
        }

        let resource = response.json::<MessageResource>().await.ok();
        tracing::info!(
            to,
            sid = resource.as_ref().and_then(|r| r.sid.as_deref()).unwrap_or("?"),
            status = resource.as_ref().and_then(|r| r.status.as_deref()).unwrap_or("?"),
            "sms accepted by gateway"
        );
        Ok(())
    }
}
