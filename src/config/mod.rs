/// Chat assistant configuration from config.toml
pub mod chat;

/// Database configuration and connection management
pub mod database;
