use chrono::Duration;
use cityping::content::OPT_OUT_FOOTER;
use cityping::pipeline::{Pipeline, RunOutcome};
use cityping::schedule::SendDecision;
use cityping::sms::SmsSender;
use cityping::state::{
    KEY_FIRST_SEEN_AT, KEY_LAST_SENT_AT, KEY_WELCOME_SENT, KEY_WELCOME_SENT_AT, RunState,
    SqliteStateStore, StateStore,
};
use std::sync::Arc;
use tempfile::TempDir;

use crate::fakes::{
    ALICE, BOB, RecordingGateway, ScriptedAgent, pipeline, sunday_window, test_config,
    wednesday_noon, weekly_reply, welcomed_store,
};

#[tokio::test]
async fn sunday_window_sends_weekly_and_records_it() {
    let config = test_config();
    let store = welcomed_store().await;
    let agent = ScriptedAgent::replying([weekly_reply(&["Søn 18/10"])]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent.clone(), store.clone(), gateway.clone());

    let now = sunday_window();
    let outcome = run.run_once(now).await.unwrap();

    let RunOutcome::Sent { decision, report } = outcome else {
        panic!("expected a send, got {outcome:?}");
    };
    assert_eq!(decision, SendDecision::Weekly);
    assert_eq!(report.delivered, 2);

    let sent = gateway.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, ALICE);
    assert_eq!(sent[1].0, BOB);
    let body = &sent[0].1;
    assert!(body.starts_with("Hej bande!"));
    assert!(body.contains("Søn: ☀️ 10°"));
    assert!(body.contains("• Loppemarked (Israels Plads)"));
    assert!(body.ends_with(OPT_OUT_FOOTER));
    assert!(body.chars().count() <= config.sms.max_chars);

    let state = RunState::load(&*store).await.unwrap();
    assert_eq!(state.last_sent_at, Some(now));
}

#[tokio::test]
async fn later_tick_in_same_window_does_not_resend() {
    let config = test_config();
    let store = welcomed_store().await;
    let agent = ScriptedAgent::replying([weekly_reply(&["Søn"]), weekly_reply(&["Søn"])]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent.clone(), store, gateway.clone());

    run.run_once(sunday_window()).await.unwrap();
    let second = run
        .run_once(sunday_window() + Duration::minutes(15))
        .await
        .unwrap();

    assert_eq!(second, RunOutcome::Skipped);
    assert_eq!(agent.prompts().len(), 1);
    assert_eq!(gateway.sent().len(), 2);
}

#[tokio::test]
async fn off_schedule_tick_does_nothing() {
    let config = test_config();
    let store = welcomed_store().await;
    store
        .set(
            KEY_LAST_SENT_AT,
            &(wednesday_noon() - Duration::days(3)).to_rfc3339(),
        )
        .await
        .unwrap();
    let agent = ScriptedAgent::replying(Vec::<String>::new());
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent.clone(), store, gateway.clone());

    assert_eq!(run.run_once(wednesday_noon()).await.unwrap(), RunOutcome::Skipped);
    assert!(agent.prompts().is_empty());
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn weekly_prompt_asks_for_remaining_days_and_preferences() {
    let mut config = test_config();
    config.agent.event_preferences = "jazz, loppemarkeder".into();
    config.schedule.send_day_of_week = 2;
    config.schedule.send_hour_local = 12;
    let store = welcomed_store().await;
    let agent = ScriptedAgent::replying([weekly_reply(&[
        "Ons 14/10",
        "Tor 15/10",
        "Fre 16/10",
        "Lør 17/10",
        "Søn 18/10",
    ])]);
    let gateway = RecordingGateway::new();
    let run = pipeline(&config, agent.clone(), store, gateway.clone());

    let outcome = run.run_once(wednesday_noon()).await.unwrap();
    assert!(matches!(
        outcome,
        RunOutcome::Sent {
            decision: SendDecision::Weekly,
            ..
        }
    ));

    let prompt = &agent.prompts()[0];
    assert!(prompt.contains("Ons 14/10, Tor 15/10, Fre 16/10, Lør 17/10, Søn 18/10"));
    assert!(prompt.contains("jazz, loppemarkeder"));

    let body = &gateway.sent()[0].1;
    let forecast_order: Vec<_> = ["Ons:", "Tor:", "Fre:", "Lør:", "Søn:"]
        .iter()
        .map(|label| body.find(label).unwrap())
        .collect();
    assert!(forecast_order.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn sqlite_state_survives_between_processes() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("state.db");
    let config = test_config();
    let now = sunday_window();

    {
        let store = Arc::new(SqliteStateStore::open(&db).await.unwrap());
        let seeded = welcomed_store().await;
        for key in [KEY_WELCOME_SENT, KEY_FIRST_SEEN_AT, KEY_WELCOME_SENT_AT] {
            let value = seeded.get(key).await.unwrap().unwrap();
            store.set(key, &value).await.unwrap();
        }

        let agent = ScriptedAgent::replying([weekly_reply(&["Søn"])]);
        let gateway = RecordingGateway::new();
        let sender = SmsSender::live(gateway, &config.sms.recipients).unwrap();
        let run = Pipeline::new(&config, agent, store, sender).unwrap();
        run.run_once(now).await.unwrap();
    }

    let reopened = SqliteStateStore::open(&db).await.unwrap();
    let state = RunState::load(&reopened).await.unwrap();
    assert!(state.welcome_sent);
    assert_eq!(state.last_sent_at, Some(now));
}
