//! Unified error type for the goal store, the chat responder and the bot layer.

use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Goal creation input was rejected; the collection is unchanged
    #[error("Invalid goal: {reason}")]
    InvalidGoal {
        /// Which field was rejected and why
        reason: String,
    },

    /// Chat input was empty or whitespace only
    #[error("Message cannot be empty")]
    InvalidMessage,

    /// The durable store could not be read or held an unreadable payload
    #[error("Failed to read stored goals: {message}")]
    PersistenceRead {
        /// Underlying cause
        message: String,
    },

    /// The durable store rejected a write; in-memory state was rolled back
    #[error("Failed to save goals: {message}")]
    PersistenceWrite {
        /// Underlying cause
        message: String,
    },

    /// `SeaORM` database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting a reply failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
