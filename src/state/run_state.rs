use super::StateStore;
use crate::error::{PingError, Result};
use crate::schedule::SendDecision;
use chrono::{DateTime, Utc};

pub const KEY_WELCOME_SENT: &str = "cityping:welcome_sent";
pub const KEY_FIRST_SEEN_AT: &str = "cityping:first_seen_at";
pub const KEY_WELCOME_SENT_AT: &str = "cityping:welcome_sent_at";
pub const KEY_LAST_SENT_AT: &str = "cityping:last_sent_at";
pub const KEY_SMOKE_TS: &str = "cityping:smoke_ts";

/// Persisted send state, read once at run start and written after a
/// successful send. Absent keys read as defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
    pub welcome_sent: bool,
    /// First run that found no prior state; anchors the welcome delay.
    pub first_seen_at: Option<DateTime<Utc>>,
    pub welcome_sent_at: Option<DateTime<Utc>>,
    /// Last weekly message.
    pub last_sent_at: Option<DateTime<Utc>>,
}

fn parse_timestamp(key: &str, raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|value| {
        DateTime::parse_from_rfc3339(value.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| PingError::Store(format!("{key} holds an invalid timestamp '{value}': {e}")))
    })
    .transpose()
}

impl RunState {
    pub async fn load(store: &dyn StateStore) -> Result<Self> {
        let welcome_sent = store.get(KEY_WELCOME_SENT).await?.as_deref() == Some("1");
        Ok(Self {
            welcome_sent,
            first_seen_at: parse_timestamp(KEY_FIRST_SEEN_AT, store.get(KEY_FIRST_SEEN_AT).await?)?,
            welcome_sent_at: parse_timestamp(
                KEY_WELCOME_SENT_AT,
                store.get(KEY_WELCOME_SENT_AT).await?,
            )?,
            last_sent_at: parse_timestamp(KEY_LAST_SENT_AT, store.get(KEY_LAST_SENT_AT).await?)?,
        })
    }

    /// Persist the welcome-delay anchor the first time a run sees no state.
    /// Returns `true` when the anchor was written by this call.
    pub async fn ensure_first_seen(
        &mut self,
        store: &dyn StateStore,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if self.first_seen_at.is_some() {
            return Ok(false);
        }
        store.set(KEY_FIRST_SEEN_AT, &now.to_rfc3339()).await?;
        self.first_seen_at = Some(now);
        Ok(true)
    }

    /// State after `decision` was delivered at `now`.
    #[must_use]
    pub fn after_send(&self, decision: SendDecision, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        match decision {
            SendDecision::Welcome => {
                next.welcome_sent = true;
                next.welcome_sent_at = Some(now);
            }
            SendDecision::Weekly => next.last_sent_at = Some(now),
            SendDecision::None => {}
        }
        next
    }

    /// Write only the keys `decision` changes.
    pub async fn persist_effect(
        &self,
        store: &dyn StateStore,
        decision: SendDecision,
    ) -> Result<()> {
        match decision {
            SendDecision::Welcome => {
                // `welcome_sent` never lands without `welcome_sent_at`.
                if let Some(at) = self.welcome_sent_at {
                    store.set(KEY_WELCOME_SENT_AT, &at.to_rfc3339()).await?;
                }
                store.set(KEY_WELCOME_SENT, "1").await?;
            }
            SendDecision::Weekly => {
                if let Some(at) = self.last_sent_at {
                    store.set(KEY_LAST_SENT_AT, &at.to_rfc3339()).await?;
                }
            }
            SendDecision::None => {}
        }
        Ok(())
    }
}
