//! Core types and error definitions for Hookchat.
//!
//! This crate provides the foundational types shared across all Hookchat crates:
//! the conversation message model, the exchange outcome reported by the
//! webhook client, input validation, and the unified error type.
//!
//! # Main types
//!
//! - [`HookchatError`] - Unified error enum for all Hookchat subsystems.
//! - [`HookchatResult`] - Convenience alias for `Result<T, HookchatError>`.
//! - [`Role`] - Message role (user or assistant).
//! - [`ConversationMessage`] - A single immutable entry in a conversation log.
//! - [`ExchangeResult`] - Outcome of one webhook exchange, always displayable.
//! - [`ErrorKind`] - Failure classification carried by an [`ExchangeResult`].

/// Unified error type.
pub mod error;
/// Exchange outcome types.
pub mod exchange;
/// Conversation message types.
pub mod message;
/// User input validation.
pub mod validate;

pub use error::{HookchatError, HookchatResult};
pub use exchange::{ErrorKind, ExchangeResult};
pub use message::{ConversationMessage, Role};
pub use validate::{validate_message, MAX_MESSAGE_CHARS};
