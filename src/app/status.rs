use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cityping::Config;
use cityping::state::RunState;

const NOT_SET: &str = "(not set)";

/// Keep the first few characters of a credential so operators can tell
/// which one is loaded.
pub fn mask(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => NOT_SET.to_string(),
        Some(v) if v.chars().count() <= 6 => "****".to_string(),
        Some(v) => format!("{}****", v.chars().take(4).collect::<String>()),
    }
}

fn plain(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(NOT_SET)
}

pub fn render_config(config: &Config) -> String {
    let schedule = &config.schedule;
    let recipients = if config.sms.recipients.is_empty() {
        NOT_SET.to_string()
    } else {
        config
            .sms
            .recipients
            .iter()
            .map(|n| mask(Some(n)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    [
        format!("config        {}", config.config_path.display()),
        format!(
            "schedule      day={} hour={} every={}d welcome_delay={}m tz={}",
            schedule.send_day_of_week,
            schedule.send_hour_local,
            schedule.send_interval_days,
            schedule.welcome_delay_minutes,
            schedule.timezone
        ),
        format!("agent         {}", plain(config.agent.endpoint.as_deref())),
        format!("agent id      {}", plain(config.agent.agent_id.as_deref())),
        format!("tenant        {}", mask(config.auth.tenant_id.as_deref())),
        format!("client id     {}", mask(config.auth.client_id.as_deref())),
        format!("client secret {}", mask(config.auth.client_secret.as_deref())),
        format!("twilio sid    {}", mask(config.sms.account_sid.as_deref())),
        format!("twilio token  {}", mask(config.sms.auth_token.as_deref())),
        format!("from          {}", mask(config.sms.from_number.as_deref())),
        format!("recipients    {recipients}"),
        format!("dry run       {}", config.sms.dry_run),
        format!(
            "store         {}",
            config
                .store
                .path
                .as_ref()
                .map_or_else(|| NOT_SET.to_string(), |p| p.display().to_string())
        ),
    ]
    .join("\n")
}

fn stamp(value: Option<DateTime<Utc>>, tz: Tz) -> String {
    value.map_or_else(
        || "never".to_string(),
        |at| at.with_timezone(&tz).format("%a %Y-%m-%d %H:%M %Z").to_string(),
    )
}

pub fn render_state(state: &RunState, tz: Tz) -> String {
    [
        format!("welcome sent     {}", state.welcome_sent),
        format!("first seen       {}", stamp(state.first_seen_at, tz)),
        format!("welcome sent at  {}", stamp(state.welcome_sent_at, tz)),
        format!("last weekly      {}", stamp(state.last_sent_at, tz)),
    ]
    .join("\n")
}
