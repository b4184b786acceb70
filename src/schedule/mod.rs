//! When to send: pure decision over time, configuration and stored state.

mod decision;

pub use decision::{SendDecision, decide};
