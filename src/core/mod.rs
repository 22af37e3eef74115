//! Core business logic - framework-agnostic goal tracking and chat responses.
//!
//! Nothing in here talks to Discord; the bot layer calls these modules and
//! formats what they return.

/// Chat messages and transient transcripts
pub mod chat;
/// Goal model and the goal store
pub mod goal;
/// Derived goal progress and the goal card view model
pub mod progress;
/// Keyword-driven reply resolution
pub mod responder;
/// Durable key-value storage backends
pub mod storage;
