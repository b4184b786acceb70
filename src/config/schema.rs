use crate::error::{PingError, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_CHARS: usize = 480;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path the config was loaded from - not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub sms: SmsConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.schedule.validate()?;
        if self.sms.max_chars == 0 {
            return Err(PingError::Config("sms.max_chars must be at least 1".into()));
        }
        Ok(())
    }
}

// ── Schedule ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 0 = Monday .. 6 = Sunday
    #[serde(default = "default_send_day_of_week")]
    pub send_day_of_week: u32,
    #[serde(default = "default_send_hour_local")]
    pub send_hour_local: u32,
    #[serde(default = "default_send_interval_days")]
    pub send_interval_days: u32,
    #[serde(default = "default_welcome_delay_minutes")]
    pub welcome_delay_minutes: u32,
    #[serde(default = "default_true")]
    pub follow_up_after_welcome: bool,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_send_day_of_week() -> u32 {
    6
}

fn default_send_hour_local() -> u32 {
    10
}

fn default_send_interval_days() -> u32 {
    7
}

fn default_welcome_delay_minutes() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "Europe/Copenhagen".into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            send_day_of_week: default_send_day_of_week(),
            send_hour_local: default_send_hour_local(),
            send_interval_days: default_send_interval_days(),
            welcome_delay_minutes: default_welcome_delay_minutes(),
            follow_up_after_welcome: true,
            timezone: default_timezone(),
        }
    }
}

impl ScheduleConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| PingError::Config(format!("unknown timezone '{}'", self.timezone)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.send_day_of_week > 6 {
            return Err(PingError::Config(format!(
                "schedule.send_day_of_week must be 0..=6 (Mon..Sun), got {}",
                self.send_day_of_week
            )));
        }
        if self.send_hour_local > 23 {
            return Err(PingError::Config(format!(
                "schedule.send_hour_local must be 0..=23, got {}",
                self.send_hour_local
            )));
        }
        if self.send_interval_days == 0 {
            return Err(PingError::Config(
                "schedule.send_interval_days must be at least 1".into(),
            ));
        }
        self.tz()?;
        Ok(())
    }
}

// ── Agent ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Project endpoint, e.g. `https://<hub>.services.ai.azure.com/api/projects/<project>`
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Free-text ranking hint forwarded to the agent prompt.
    #[serde(default = "default_event_preferences")]
    pub event_preferences: String,
}

fn default_api_version() -> String {
    "v1".into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_poll_timeout_secs() -> u64 {
    180
}

fn default_event_preferences() -> String {
    "koncerter, street food, markeder, gratis events".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            agent_id: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
            event_preferences: default_event_preferences(),
        }
    }
}

// ── Auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_authority")]
    pub authority: String,
}

fn default_scope() -> String {
    "https://ai.azure.com/.default".into()
}

fn default_authority() -> String {
    "https://login.microsoftonline.com".into()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            client_secret: None,
            scope: default_scope(),
            authority: default_authority(),
        }
    }
}

// ── SMS ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub from_number: Option<String>,
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_sms_api_base() -> String {
    "https://api.twilio.com".into()
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base: default_sms_api_base(),
            recipients: Vec::new(),
            dry_run: false,
            max_chars: default_max_chars(),
        }
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file holding the run-state flags. Defaults to `~/.cityping/state.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
