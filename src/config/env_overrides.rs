use super::Config;
use crate::error::{PingError, Result};
use std::path::PathBuf;

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// A set numeric override has to parse; a typo must not fall back to the
/// default schedule.
fn number(key: &str) -> Result<Option<u32>> {
    non_empty(key)
        .map(|raw| {
            raw.trim().parse::<u32>().map_err(|_| {
                PingError::Config(format!("{key} must be a whole number, got '{}'", raw.trim()))
            })
        })
        .transpose()
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Split a comma separated recipient list, dropping blanks.
pub(crate) fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

impl Config {
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Only IANA names; libc forms such as `:/etc/localtime` are ignored.
        if let Some(tz) = non_empty("TZ") {
            if tz.parse::<chrono_tz::Tz>().is_ok() {
                self.schedule.timezone = tz;
            } else {
                tracing::debug!(%tz, "ignoring TZ that is not an IANA timezone name");
            }
        }

        if let Some(day) = number("SEND_DAY_OF_WEEK")? {
            self.schedule.send_day_of_week = day;
        }
        if let Some(hour) = number("SEND_HOUR_LOCAL")? {
            self.schedule.send_hour_local = hour;
        }
        if let Some(days) = number("SEND_INTERVAL_DAYS")? {
            self.schedule.send_interval_days = days;
        }
        if let Some(minutes) = number("WELCOME_DELAY_MINUTES")? {
            self.schedule.welcome_delay_minutes = minutes;
        }

        if let Some(raw) = non_empty("DRY_RUN") {
            self.sms.dry_run = parse_bool(&raw);
        }

        if let Some(prefs) = non_empty("EVENT_PREFERENCES") {
            self.agent.event_preferences = prefs;
        }

        if let Some(raw) = non_empty("RECIPIENT_NUMBERS") {
            self.sms.recipients = parse_recipients(&raw);
        }

        if let Some(endpoint) = non_empty("AGENT_ENDPOINT") {
            self.agent.endpoint = Some(endpoint);
        }
        if let Some(id) = non_empty("AGENT_ID") {
            self.agent.agent_id = Some(id);
        }
        if let Some(version) = non_empty("AGENT_API_VERSION") {
            self.agent.api_version = version;
        }

        if let Some(tenant) = non_empty("AZURE_TENANT_ID") {
            self.auth.tenant_id = Some(tenant);
        }
        if let Some(client_id) = non_empty("AZURE_CLIENT_ID") {
            self.auth.client_id = Some(client_id);
        }
        if let Some(secret) = non_empty("AZURE_CLIENT_SECRET") {
            self.auth.client_secret = Some(secret);
        }
        if let Some(scope) = non_empty("AZURE_SCOPE") {
            self.auth.scope = scope;
        }

        if let Some(sid) = non_empty("TWILIO_ACCOUNT_SID") {
            self.sms.account_sid = Some(sid);
        }
        if let Some(token) = non_empty("TWILIO_AUTH_TOKEN") {
            self.sms.auth_token = Some(token);
        }
        if let Some(from) = non_empty("TWILIO_FROM_NUMBER") {
            self.sms.from_number = Some(from);
        }

        if let Some(db) = non_empty("CITYPING_STATE_DB") {
            self.store.path = Some(PathBuf::from(db));
        }

        Ok(())
    }
}
