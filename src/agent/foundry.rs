use super::AgentClient;
use super::messages::first_assistant_text;
use crate::auth::TokenProvider;
use crate::config::AgentConfig;
use crate::error::{PingError, Result};
use crate::utils::scrub::{error_body, sanitize_api_error};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunStatus {
    status: String,
    #[serde(default)]
    last_error: Option<Value>,
}

/// Agents API client speaking the threads / messages / runs protocol.
///
/// One `complete` call creates a fresh thread, posts the prompt, starts a run
/// for the configured agent, polls it to a terminal state and reads back the
/// assistant reply.
pub struct FoundryAgentClient {
    endpoint: String,
    agent_id: String,
    api_version: String,
    poll_interval: Duration,
    poll_timeout: Duration,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

fn required(value: Option<&str>, name: &str, env: &str) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PingError::Config(format!("{name} is not configured (set {env})")))
}

fn transport(what: &str, err: &reqwest::Error) -> PingError {
    if err.is_timeout() {
        PingError::AgentTransport(format!("{what} timed out"))
    } else {
        PingError::AgentTransport(format!("{what} failed: {err}"))
    }
}

impl FoundryAgentClient {
    pub fn from_config(
        config: &AgentConfig,
        client: Client,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self> {
        let endpoint = required(config.endpoint.as_deref(), "agent.endpoint", "AGENT_ENDPOINT")?;
        let agent_id = required(config.agent_id.as_deref(), "agent.agent_id", "AGENT_ID")?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent_id,
            api_version: config.api_version.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            client,
            tokens,
        })
    }

    /// Override the run polling cadence.
    #[must_use]
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let token = self.tokens.bearer_token().await?;
        let response = request
            .bearer_auth(token)
            .query(&[("api-version", self.api_version.as_str())])
            .send()
            .await
            .map_err(|e| transport(what, &e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = error_body(response).await;
            return Err(PingError::Auth(format!("{what} rejected with {status}: {body}")));
        }
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(PingError::AgentTransport(format!(
                "{what} returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PingError::AgentTransport(format!("{what}: malformed response: {e}")))
    }

    async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<()> {
        let deadline = Instant::now() + self.poll_timeout;
        let url = self.url(&format!("threads/{thread_id}/runs/{run_id}"));

        loop {
            let run: RunStatus = self.call(self.client.get(&url), "poll run").await?;
            match run.status.as_str() {
                "completed" => return Ok(()),
                "failed" | "expired" | "cancelled" | "requires_action" => {
                    let detail = run
                        .last_error
                        .filter(|e| !e.is_null())
                        .map(|e| format!(": {}", sanitize_api_error(&e.to_string())))
                        .unwrap_or_default();
                    return Err(PingError::AgentTransport(format!(
                        "run {run_id} ended with status {}{detail}",
                        run.status
                    )));
                }
                other => tracing::debug!(run_id, status = other, "agent run in progress"),
            }

            if Instant::now() >= deadline {
                return Err(PingError::AgentTransport(format!(
                    "run {run_id} did not finish within {}s",
                    self.poll_timeout.as_secs()
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl AgentClient for FoundryAgentClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();

        let thread: Created = self
            .call(self.client.post(self.url("threads")).json(&json!({})), "create thread")
            .await?;

        let _: Value = self
            .call(
                self.client
                    .post(self.url(&format!("threads/{}/messages", thread.id)))
                    .json(&json!({ "role": "user", "content": prompt })),
                "post message",
            )
            .await?;

        let run: Created = self
            .call(
                self.client
                    .post(self.url(&format!("threads/{}/runs", thread.id)))
                    .json(&json!({ "assistant_id": self.agent_id })),
                "start run",
            )
            .await?;
        tracing::info!(thread_id = %thread.id, run_id = %run.id, "agent run started");

        self.wait_for_run(&thread.id, &run.id).await?;

        let listing: Value = self
            .call(
                self.client
                    .get(self.url(&format!("threads/{}/messages", thread.id)))
                    .query(&[("order", "desc")]),
                "list messages",
            )
            .await?;

        let text = first_assistant_text(&listing).ok_or_else(|| {
            PingError::AgentTransport(format!(
                "run {} completed without an assistant reply",
                run.id
            ))
        })?;

        tracing::info!(
            thread_id = %thread.id,
            run_id = %run.id,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            chars = text.chars().count(),
            "agent reply received"
        );
        Ok(text)
    }
}
