use crate::app::status::{render_config, render_state};
use crate::cli::commands::{Cli, Commands, StateCommands};
use anyhow::{Context, Result};
use chrono::Utc;
use cityping::Config;
use cityping::agent::{AgentClient, FoundryAgentClient};
use cityping::auth::ClientCredentialsProvider;
use cityping::pipeline::{MessageKind, Pipeline, RunOutcome};
use cityping::sms::SmsSender;
use cityping::state::{RunState, SqliteStateStore, StateStore};
use cityping::utils::http::build_client_with_timeout;
use std::sync::Arc;
use tracing::info;

async fn open_store(config: &Config) -> Result<Arc<SqliteStateStore>> {
    let path = config
        .store
        .path
        .as_deref()
        .context("state store path is not configured (set CITYPING_STATE_DB)")?;
    let store = SqliteStateStore::open(path)
        .await
        .with_context(|| format!("Failed to open state store {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Wire the real collaborators: Entra ID token provider, agent client,
/// SQLite store and, when `with_sender` is set, the Twilio (or dry-run)
/// sender. Without it the pipeline can only preview.
async fn build_pipeline(config: &Config, with_sender: bool) -> Result<Pipeline> {
    let client = build_client_with_timeout(config.agent.request_timeout_secs);
    let sender = if with_sender {
        Some(SmsSender::from_config(&config.sms, client.clone())?)
    } else {
        None
    };
    let tokens = Arc::new(ClientCredentialsProvider::from_config(
        &config.auth,
        client.clone(),
    )?);
    let agent: Arc<dyn AgentClient> = Arc::new(FoundryAgentClient::from_config(
        &config.agent,
        client.clone(),
        tokens,
    )?);
    let store: Arc<dyn StateStore> = open_store(config).await?;
    let pipeline = match sender {
        Some(sender) => Pipeline::new(config, agent, store, sender)?,
        None => Pipeline::preview(config, agent, store)?,
    };
    Ok(pipeline)
}

async fn run(config: &Config) -> Result<()> {
    let pipeline = build_pipeline(config, true).await?;
    match pipeline.run_once(Utc::now()).await? {
        RunOutcome::Skipped => info!("nothing due"),
        RunOutcome::Sent { decision, report } => info!(
            %decision,
            delivered = report.delivered,
            dry_run = report.dry_run,
            "sent"
        ),
    }
    Ok(())
}

async fn smoke(config: &Config, send: bool, welcome: bool) -> Result<()> {
    println!("{}", render_config(config));
    println!();

    let pipeline = build_pipeline(config, send)
        .await
        .context("Smoke test could not build the pipeline")?;
    let kind = if welcome {
        MessageKind::Welcome
    } else {
        MessageKind::Weekly
    };
    let report = pipeline
        .smoke(kind, send, Utc::now())
        .await
        .with_context(|| format!("Smoke test failed while producing the {kind} message"))?;

    println!(
        "── {} preview ({} chars) ──",
        report.kind,
        report.message.char_count()
    );
    println!("{}", report.message.body());
    println!("──");
    match report.sent {
        Some(sent) if sent.dry_run => println!("dry run: {} send(s) logged", sent.delivered),
        Some(sent) => println!("sent to {} recipient(s)", sent.delivered),
        None => println!("not sent (pass --send to deliver)"),
    }
    Ok(())
}

async fn show_state(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let state = RunState::load(&*store).await?;
    println!("{}", render_state(&state, config.schedule.tz()?));
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&config).await,
        Commands::Smoke { send, welcome } => smoke(&config, send, welcome).await,
        Commands::State {
            state_command: StateCommands::Show,
        } => show_state(&config).await,
    }
}
