//! Per-session conversation state.
//!
//! A [`SessionContext`] is owned by exactly one interactive session and passed
//! explicitly to every operation; there is no process-wide session registry.

/// Session state container and lifecycle.
pub mod session;
/// Conversation statistics.
pub mod stats;

pub use session::{generate_session_id, SessionContext, DEFAULT_WELCOME};
pub use stats::ChatStats;
