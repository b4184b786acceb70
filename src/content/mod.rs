//! Agent payload → validated content → SMS body.

pub mod extract;
pub mod format;
pub mod labels;
pub mod validate;

pub use format::{OPT_OUT_FOOTER, OutboundMessage, format_weekly, format_welcome};
pub use labels::{DaySlot, required_days};
pub use validate::{
    AgentContentPayload, ForecastDay, MAX_EVENTS, WelcomeContent, validate_content,
    validate_welcome,
};
