//! One scheduled run, and the operator smoke run built from the same parts.

use crate::agent::AgentClient;
use crate::agent::prompt::{WELCOME_SIGNOFF, weekly_prompt, welcome_prompt};
use crate::config::{Config, ScheduleConfig};
use crate::content::extract::extract_json_object;
use crate::content::{
    OutboundMessage, format_weekly, format_welcome, required_days, validate_content,
    validate_welcome,
};
use crate::error::{PingError, Result};
use crate::schedule::{SendDecision, decide};
use crate::sms::{SendReport, SmsSender};
use crate::state::{KEY_SMOKE_TS, RunState, StateStore};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Which message to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Welcome,
    Weekly,
}

impl MessageKind {
    pub fn for_decision(decision: SendDecision) -> Option<Self> {
        match decision {
            SendDecision::Welcome => Some(Self::Welcome),
            SendDecision::Weekly => Some(Self::Weekly),
            SendDecision::None => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Welcome => "welcome",
            Self::Weekly => "weekly",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing due this tick.
    Skipped,
    Sent {
        decision: SendDecision,
        report: SendReport,
    },
}

#[derive(Debug, Clone)]
pub struct SmokeReport {
    pub kind: MessageKind,
    pub message: OutboundMessage,
    /// `None` unless the smoke run was asked to send.
    pub sent: Option<SendReport>,
}

/// Short correlation id attached to every log line of a run.
pub fn new_run_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

pub struct Pipeline {
    schedule: ScheduleConfig,
    tz: Tz,
    event_preferences: String,
    max_chars: usize,
    agent: Arc<dyn AgentClient>,
    store: Arc<dyn StateStore>,
    /// `None` for a preview pipeline that can compose but never send.
    sender: Option<SmsSender>,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        agent: Arc<dyn AgentClient>,
        store: Arc<dyn StateStore>,
        sender: SmsSender,
    ) -> Result<Self> {
        Self::build(config, agent, store, Some(sender))
    }

    /// A pipeline without an SMS sender, for smoke previews. Needs no
    /// gateway credentials or recipients.
    pub fn preview(
        config: &Config,
        agent: Arc<dyn AgentClient>,
        store: Arc<dyn StateStore>,
    ) -> Result<Self> {
        Self::build(config, agent, store, None)
    }

    fn build(
        config: &Config,
        agent: Arc<dyn AgentClient>,
        store: Arc<dyn StateStore>,
        sender: Option<SmsSender>,
    ) -> Result<Self> {
        Ok(Self {
            schedule: config.schedule.clone(),
            tz: config.schedule.tz()?,
            event_preferences: config.agent.event_preferences.clone(),
            max_chars: config.sms.max_chars,
            agent,
            store,
            sender,
        })
    }

    fn sender(&self) -> Result<&SmsSender> {
        self.sender
            .as_ref()
            .ok_or_else(|| PingError::Config("preview pipeline has no sms sender".into()))
    }

    /// Load state, decide, and when something is due generate, validate,
    /// format and send it. State is written only after every recipient was
    /// sent to; any error leaves it untouched.
    #[tracing::instrument(name = "run", skip_all, fields(run_id = %new_run_id()))]
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        let result = self.run_inner(now).await;
        if let Err(e) = &result {
            tracing::error!(kind = e.kind(), error = %e, "run aborted; state unchanged");
        }
        result
    }

    async fn run_inner(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        let store = self.store.as_ref();
        let mut state = RunState::load(store).await?;
        if state.ensure_first_seen(store, now).await? {
            tracing::info!(first_seen_at = %now, "first run on this store; welcome delay starts now");
        }

        let local = now.with_timezone(&self.tz);
        let decision = decide(&local, &self.schedule, &state);
        tracing::info!(
            %decision,
            local_time = %local.format("%a %Y-%m-%d %H:%M"),
            welcome_sent = state.welcome_sent,
            last_sent_at = ?state.last_sent_at,
            "send decision"
        );

        let Some(kind) = MessageKind::for_decision(decision) else {
            return Ok(RunOutcome::Skipped);
        };

        let sender = self.sender()?;
        let message = self.compose(kind, now).await?;
        let report = sender.send(&message).await?;

        state
            .after_send(decision, now)
            .persist_effect(store, decision)
            .await?;
        tracing::info!(%decision, delivered = report.delivered, "run complete");

        Ok(RunOutcome::Sent { decision, report })
    }

    /// Ask the agent for `kind` content and turn it into an SMS body.
    /// Validation is all-or-nothing: a reply that does not pass is an error.
    pub async fn compose(&self, kind: MessageKind, now: DateTime<Utc>) -> Result<OutboundMessage> {
        let message = match kind {
            MessageKind::Welcome => {
                let reply = self.agent.complete(&welcome_prompt()).await?;
                let content = validate_welcome(&reply, WELCOME_SIGNOFF)?;
                format_welcome(
                    &content,
                    self.schedule.follow_up_after_welcome,
                    self.max_chars,
                )
            }
            MessageKind::Weekly => {
                let today = now.with_timezone(&self.tz).date_naive();
                let days = required_days(today);
                let prompt = weekly_prompt(today, &days, &self.event_preferences);
                let reply = self.agent.complete(&prompt).await?;
                let raw = extract_json_object(&reply).ok_or_else(|| {
                    PingError::Validation("agent reply contains no JSON object".into())
                })?;
                let content = validate_content(&raw, today)?;
                format_weekly(&content, self.max_chars)
            }
        };
        tracing::debug!(%kind, chars = message.char_count(), "message composed");
        Ok(message)
    }

    /// Operator check of the whole chain without the schedule gate.
    ///
    /// Round-trips a timestamp through the store, composes `kind`, and sends
    /// only when `send` is set (a dry-run sender still only logs). The run
    /// state flags are neither read nor written.
    #[tracing::instrument(name = "smoke", skip_all, fields(run_id = %new_run_id(), kind = %kind, send = send))]
    pub async fn smoke(
        &self,
        kind: MessageKind,
        send: bool,
        now: DateTime<Utc>,
    ) -> Result<SmokeReport> {
        let stamp = now.to_rfc3339();
        self.store.set(KEY_SMOKE_TS, &stamp).await?;
        let read_back = self.store.get(KEY_SMOKE_TS).await?;
        if read_back.as_deref() != Some(stamp.as_str()) {
            return Err(PingError::Store(format!(
                "{KEY_SMOKE_TS} read back {read_back:?} after writing {stamp}"
            )));
        }
        tracing::info!("state store round-trip ok");

        let sender = if send { Some(self.sender()?) } else { None };
        let message = self.compose(kind, now).await?;
        let sent = match sender {
            Some(sender) => Some(sender.send(&message).await?),
            None => None,
        };
        Ok(SmokeReport {
            kind,
            message,
            sent,
        })
    }
}
