use cityping::config::SmsConfig;
use cityping::pipeline::{MessageKind, Pipeline};
use cityping::state::{KEY_SMOKE_TS, MemoryStateStore, RunState};
use std::sync::Arc;

use crate::fakes::{
    RecordingGateway, ScriptedAgent, pipeline, sunday_window, test_config, weekly_reply,
    welcomed_store,
};

#[tokio::test]
async fn preview_without_send_touches_only_the_smoke_key() {
    let config = test_config();
    let store = Arc::new(MemoryStateStore::new());
    let agent = ScriptedAgent::replying([weekly_reply(&["Søn"])]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent, store.clone(), gateway.clone());

    let report = run
        .smoke(MessageKind::Weekly, false, sunday_window())
        .await
        .unwrap();

    assert_eq!(report.kind, MessageKind::Weekly);
    assert!(report.message.body().contains("Søn:"));
    assert!(report.sent.is_none());
    assert!(gateway.sent().is_empty());

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        snapshot.get(KEY_SMOKE_TS),
        Some(&sunday_window().to_rfc3339())
    );
}

#[tokio::test]
async fn welcome_smoke_with_send_delivers_but_keeps_run_state() {
    let config = test_config();
    let store = welcomed_store().await;
    let before = RunState::load(&*store).await.unwrap();
    let agent = ScriptedAgent::replying(["Velkommen til!"]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent, store.clone(), gateway.clone());

    let report = run
        .smoke(MessageKind::Welcome, true, sunday_window())
        .await
        .unwrap();

    assert_eq!(report.sent.map(|s| s.delivered), Some(2));
    assert_eq!(gateway.sent().len(), 2);
    assert_eq!(RunState::load(&*store).await.unwrap(), before);
}

#[tokio::test]
async fn smoke_surfaces_validation_errors() {
    let config = test_config();
    let store = Arc::new(MemoryStateStore::new());
    let agent = ScriptedAgent::replying([
        r#"{"intro":"Hej","forecast":{},"events":[],"signoff":""}"#,
    ]);
    let run = pipeline(&config, agent, store, RecordingGateway::new());

    let err = run
        .smoke(MessageKind::Weekly, true, sunday_window())
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("missing: Søn"));
    assert!(message.contains("events"));
    assert!(message.contains("signoff"));
}

#[tokio::test]
async fn preview_pipeline_composes_without_sms_config_but_cannot_send() {
    let mut config = test_config();
    config.sms = SmsConfig::default();
    let store = Arc::new(MemoryStateStore::new());
    let agent = ScriptedAgent::replying([weekly_reply(&["Søn"])]);
    let run = Pipeline::preview(&config, agent.clone(), store.clone()).unwrap();

    let report = run
        .smoke(MessageKind::Weekly, false, sunday_window())
        .await
        .unwrap();
    assert!(report.message.body().contains("Søn:"));
    assert!(report.sent.is_none());

    let err = run
        .smoke(MessageKind::Weekly, true, sunday_window())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "config");
    assert_eq!(agent.prompts().len(), 1);
}
