#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use cityping::Config;
use cityping::agent::AgentClient;
use cityping::error::{PingError, Result};
use cityping::pipeline::Pipeline;
use cityping::sms::{SmsGateway, SmsSender};
use cityping::state::{
    KEY_FIRST_SEEN_AT, KEY_WELCOME_SENT, KEY_WELCOME_SENT_AT, MemoryStateStore, StateStore,
};

pub const ALICE: &str = "+4511111111";
pub const BOB: &str = "+4522222222";

/// Agent that answers from a script, one reply per call.
#[derive(Default)]
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn replying<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: PingError) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(err)])),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentClient for ScriptedAgent {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PingError::AgentTransport("no scripted reply left".into())))
    }
}

/// Gateway that records every message, optionally rejecting one number.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<(String, String)>>,
    reject: Option<String>,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting(number: &str) -> Arc<Self> {
        Arc::new(Self {
            reject: Some(number.to_string()),
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsGateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, to: &str, body: &str) -> Result<()> {
        if self.reject.as_deref() == Some(to) {
            return Err(PingError::Send {
                recipient: to.to_string(),
                message: "gateway returned 400 Bad Request: 21211".into(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.sms.recipients = vec![ALICE.to_string(), BOB.to_string()];
    config
}

pub fn pipeline(
    config: &Config,
    agent: Arc<ScriptedAgent>,
    store: Arc<MemoryStateStore>,
    gateway: Arc<RecordingGateway>,
) -> Pipeline {
    let sender = SmsSender::live(gateway, &config.sms.recipients).unwrap();
    Pipeline::new(config, agent, store, sender).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Sunday 18 Oct 2026, 10:05 in Copenhagen (CEST).
pub fn sunday_window() -> DateTime<Utc> {
    utc(2026, 10, 18, 8, 5)
}

/// Wednesday 14 Oct 2026, 12:00 in Copenhagen.
pub fn wednesday_noon() -> DateTime<Utc> {
    utc(2026, 10, 14, 10, 0)
}

/// A JSON reply covering `labels`, wrapped the way agents like to answer.
pub fn weekly_reply(labels: &[&str]) -> String {
    let forecast: Vec<_> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| json!({ "label": label, "icon": "☀️", "tmax": 10 + i }))
        .collect();
    let payload = json!({
        "intro": "Hej bande! Her er ugens bud 😊",
        "forecast": forecast,
        "events": [
            { "title": "Loppemarked", "where": "Israels Plads" },
            { "title": "Jazz i Nyhavn", "where": "Nyhavn 17" },
            "Street food på Reffen"
        ],
        "signoff": "Ses derude!"
    });
    format!("Her er dit svar:\n```json\n{payload}\n```")
}

/// Store that already saw a welcome go out a while ago.
pub async fn welcomed_store() -> Arc<MemoryStateStore> {
    let store = Arc::new(MemoryStateStore::new());
    let long_ago = utc(2026, 9, 1, 8, 0).to_rfc3339();
    store.set(KEY_WELCOME_SENT, "1").await.unwrap();
    store.set(KEY_FIRST_SEEN_AT, &long_ago).await.unwrap();
    store.set(KEY_WELCOME_SENT_AT, &long_ago).await.unwrap();
    store
}
