use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `cityping`.
///
/// Every variant aborts the current run. None of them are retried and none of
/// them touch the persisted run state; the next scheduler tick starts fresh.
#[derive(Debug, Error)]
pub enum PingError {
    // ── Credentials ─────────────────────────────────────────────────────
    #[error("auth: {0}")]
    Auth(String),

    // ── Agent request / poll / timeout ──────────────────────────────────
    #[error("agent transport: {0}")]
    AgentTransport(String),

    // ── Content gate ────────────────────────────────────────────────────
    #[error("validation failed: {0}")]
    Validation(String),

    // ── SMS gateway ─────────────────────────────────────────────────────
    #[error("sms send to {recipient} failed: {message}")]
    Send { recipient: String, message: String },

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(String),

    // ── State store ─────────────────────────────────────────────────────
    #[error("state store: {0}")]
    Store(String),
}

impl PingError {
    /// Short machine-friendly name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::AgentTransport(_) => "agent_transport",
            Self::Validation(_) => "validation",
            Self::Send { .. } => "send",
            Self::Config(_) => "config",
            Self::Store(_) => "store",
        }
    }
}

impl From<sqlx::Error> for PingError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PingError>;
