//! Chat configuration loading from config.toml
//!
//! The `[chat]` section controls the assistant's reply delay and can replace the
//! built-in keyword table and fallback pool. Keyword order in the file is the
//! order in which keywords are tried. Every field is optional and a missing
//! config.toml is not an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Chat assistant settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Settings for the chat assistant
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Pause before the assistant answers, in milliseconds
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Ordered keyword table; empty means "use the built-in table"
    #[serde(default)]
    pub keywords: Vec<KeywordConfig>,
    /// Replies for unmatched messages; empty means "use the built-in pool"
    #[serde(default)]
    pub fallbacks: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            keywords: Vec::new(),
            fallbacks: Vec::new(),
        }
    }
}

const fn default_reply_delay_ms() -> u64 {
    1000
}

/// One keyword and its canned response
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    /// Substring to look for in the lower-cased message
    pub keyword: String,
    /// Reply sent when the keyword matches
    pub response: String,
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads ./config.toml, falling back to defaults when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if !path.exists() {
        info!("No config.toml found, using built-in chat settings.");
        return Ok(Config::default());
    }
    load_config(path)
}
