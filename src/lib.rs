#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod agent;
pub mod auth;
pub mod config;
pub mod content;
pub mod error;
pub mod pipeline;
pub mod schedule;
pub mod sms;
pub mod state;
pub mod utils;

pub use config::Config;
pub use error::{PingError, Result};
