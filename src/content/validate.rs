use super::labels::{DaySlot, required_days};
use crate::error::{PingError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};

/// Events beyond this are dropped; fewer are accepted as long as one remains.
pub const MAX_EVENTS: usize = 5;

const DEFAULT_ICON: &str = "🌤️";

/// One forecast line, labelled with the Danish short weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastDay {
    pub label: String,
    pub text: String,
}

/// Content that passed the gate. Only this type can be formatted into a
/// weekly message, so a partial payload never reaches the SMS gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContentPayload {
    pub intro: String,
    /// Today → Sunday, calendar order, one entry per day.
    pub forecast: Vec<ForecastDay>,
    pub events: Vec<String>,
    pub signoff: String,
}

impl AgentContentPayload {
    /// Canonical raw form; validating it again yields `self` unchanged.
    pub fn to_value(&self) -> Value {
        json!({
            "intro": self.intro,
            "forecast": self
                .forecast
                .iter()
                .map(|day| json!({ "label": day.label, "text": day.text }))
                .collect::<Vec<_>>(),
            "events": self.events,
            "signoff": self.signoff,
        })
    }
}

/// Free-text welcome reply plus the signoff it is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeContent {
    pub text: String,
    pub signoff: String,
}

pub fn validate_welcome(reply: &str, signoff: &str) -> Result<WelcomeContent> {
    let text = reply.trim();
    if text.is_empty() {
        return Err(PingError::Validation("welcome: empty reply".into()));
    }
    Ok(WelcomeContent {
        text: text.to_string(),
        signoff: signoff.trim().to_string(),
    })
}

/// All-or-nothing check of a raw agent payload against the days that must be
/// covered starting at `today`.
///
/// Every problem found is reported in one rejection, e.g.
/// `missing: Lør, Søn; events: no non-empty entries`.
pub fn validate_content(raw: &Value, today: NaiveDate) -> Result<AgentContentPayload> {
    let Some(object) = raw.as_object() else {
        return Err(PingError::Validation("payload is not a JSON object".into()));
    };

    let mut problems = Vec::new();

    let intro = non_empty_text(object, "intro");
    if intro.is_none() {
        problems.push("intro: missing or empty".to_string());
    }

    let forecast = validate_forecast(object.get("forecast"), today, &mut problems);

    let events = validate_events(object.get("events"), &mut problems);

    let signoff = non_empty_text(object, "signoff");
    if signoff.is_none() {
        problems.push("signoff: missing or empty".to_string());
    }

    match (intro, forecast, signoff) {
        (Some(intro), Some(forecast), Some(signoff)) if problems.is_empty() => {
            Ok(AgentContentPayload {
                intro,
                forecast,
                events,
                signoff,
            })
        }
        _ => Err(PingError::Validation(problems.join("; "))),
    }
}

fn non_empty_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Forecast entries as `(label, value)` pairs, from either a list of
/// `{label, …}` objects or a `{label: text}` map.
fn forecast_entries(forecast: &Value) -> Option<Vec<(String, &Value)>> {
    match forecast {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| {
                    let label = item.get("label")?.as_str()?;
                    Some((label.to_string(), item))
                })
                .collect(),
        ),
        Value::Object(map) => Some(map.iter().map(|(k, v)| (k.clone(), v)).collect()),
        _ => None,
    }
}

enum DayText {
    Text(String),
    Empty,
    BadTemperature,
}

fn day_text(value: &Value) -> DayText {
    match value {
        Value::String(text) => text_or_empty(text),
        Value::Object(entry) => {
            if let Some(text) = entry.get("text").and_then(Value::as_str)
                && !text.trim().is_empty()
            {
                return DayText::Text(text.trim().to_string());
            }
            let Some(tmax) = entry.get("tmax") else {
                return DayText::Empty;
            };
            let Some(tmax) = parse_temperature(tmax) else {
                return DayText::BadTemperature;
            };
            let icon = entry
                .get("icon")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_ICON);
            DayText::Text(format!("{icon} {tmax}°"))
        }
        _ => DayText::Empty,
    }
}

fn text_or_empty(text: &str) -> DayText {
    let text = text.trim();
    if text.is_empty() {
        DayText::Empty
    } else {
        DayText::Text(text.to_string())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_temperature(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn join_labels(slots: &[&DaySlot]) -> String {
    slots.iter().map(|s| s.label).collect::<Vec<_>>().join(", ")
}

fn validate_forecast(
    forecast: Option<&Value>,
    today: NaiveDate,
    problems: &mut Vec<String>,
) -> Option<Vec<ForecastDay>> {
    let required = required_days(today);

    let Some(entries) = forecast.and_then(forecast_entries) else {
        let all: Vec<&DaySlot> = required.iter().collect();
        problems.push(format!("missing: {}", join_labels(&all)));
        return None;
    };

    let mut days = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    let mut empty = Vec::new();
    let mut bad_temperature = Vec::new();

    for slot in &required {
        // First matching entry wins; later duplicates are ignored.
        let Some((_, value)) = entries.iter().find(|(label, _)| slot.matches(label)) else {
            missing.push(slot);
            continue;
        };
        match day_text(value) {
            DayText::Text(text) => days.push(ForecastDay {
                label: slot.label.to_string(),
                text,
            }),
            DayText::Empty => empty.push(slot),
            DayText::BadTemperature => bad_temperature.push(slot),
        }
    }

    if !missing.is_empty() {
        problems.push(format!("missing: {}", join_labels(&missing)));
    }
    if !empty.is_empty() {
        problems.push(format!("empty forecast: {}", join_labels(&empty)));
    }
    if !bad_temperature.is_empty() {
        problems.push(format!("tmax not an integer: {}", join_labels(&bad_temperature)));
    }

    (days.len() == required.len()).then_some(days)
}

fn event_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Object(entry) => {
            let title = entry.get("title").and_then(Value::as_str)?.trim();
            if title.is_empty() {
                return None;
            }
            match entry.get("where").and_then(Value::as_str).map(str::trim) {
                Some(place) if !place.is_empty() => Some(format!("{title} ({place})")),
                _ => Some(title.to_string()),
            }
        }
        _ => None,
    };
    text.filter(|text| !text.is_empty())
}

fn validate_events(events: Option<&Value>, problems: &mut Vec<String>) -> Vec<String> {
    let Some(items) = events.and_then(Value::as_array) else {
        problems.push("events: missing or not a list".to_string());
        return Vec::new();
    };

    let kept: Vec<String> = items.iter().filter_map(event_text).take(MAX_EVENTS).collect();
    if kept.is_empty() {
        problems.push("events: no non-empty entries".to_string());
    }
    kept
}
