use cityping::error::PingError;
use cityping::state::RunState;

use crate::fakes::{
    ALICE, BOB, RecordingGateway, ScriptedAgent, pipeline, test_config, wednesday_noon,
    weekly_reply, welcomed_store,
};

fn wednesday_config() -> cityping::Config {
    let mut config = test_config();
    config.schedule.send_day_of_week = 2;
    config.schedule.send_hour_local = 12;
    config
}

#[tokio::test]
async fn missing_day_aborts_without_sending_or_recording() {
    let config = wednesday_config();
    let store = welcomed_store().await;
    let before = store.snapshot().await;
    let agent = ScriptedAgent::replying([weekly_reply(&["Ons", "Tor", "Fre", "Lør"])]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent, store.clone(), gateway.clone());

    let err = run.run_once(wednesday_noon()).await.unwrap_err();

    assert!(matches!(err, PingError::Validation(_)));
    assert!(err.to_string().contains("missing: Søn"));
    assert!(gateway.sent().is_empty());
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn reply_without_json_is_a_validation_error() {
    let config = wednesday_config();
    let store = welcomed_store().await;
    let agent = ScriptedAgent::replying(["Beklager, jeg kan ikke finde vejret lige nu."]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent, store.clone(), gateway.clone());

    let err = run.run_once(wednesday_noon()).await.unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert!(gateway.sent().is_empty());
    assert_eq!(RunState::load(&*store).await.unwrap().last_sent_at, None);
}

#[tokio::test]
async fn agent_failure_leaves_state_untouched() {
    let config = wednesday_config();
    let store = welcomed_store().await;
    let before = store.snapshot().await;
    let agent = ScriptedAgent::failing(PingError::AgentTransport(
        "run run_1 did not finish within 180s".into(),
    ));
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent, store.clone(), gateway.clone());

    let err = run.run_once(wednesday_noon()).await.unwrap_err();
    assert_eq!(err.kind(), "agent_transport");
    assert!(gateway.sent().is_empty());
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn auth_failure_is_reported_as_auth() {
    let config = wednesday_config();
    let store = welcomed_store().await;
    let agent = ScriptedAgent::failing(PingError::Auth("token endpoint returned 401".into()));
    let run = pipeline(&config, agent, store, RecordingGateway::new());

    let err = run.run_once(wednesday_noon()).await.unwrap_err();
    assert_eq!(err.kind(), "auth");
}

#[tokio::test]
async fn gateway_rejection_does_not_mark_the_send() {
    let config = wednesday_config();
    let store = welcomed_store().await;
    let before = store.snapshot().await;
    let agent = ScriptedAgent::replying([weekly_reply(&["Ons", "Tor", "Fre", "Lør", "Søn"])]);
    let gateway = RecordingGateway::rejecting(BOB);
    let run = pipeline(&config, agent, store.clone(), gateway.clone());

    let err = run.run_once(wednesday_noon()).await.unwrap_err();

    assert!(matches!(err, PingError::Send { ref recipient, .. } if recipient == BOB));
    assert_eq!(gateway.sent().len(), 1);
    assert_eq!(gateway.sent()[0].0, ALICE);
    assert_eq!(store.snapshot().await, before);
}
