//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Chat assistant commands
pub mod chat;

/// Goal commands
pub mod goal;

/// General utility commands
pub mod general;

// Export commands
pub use chat::*;
pub use general::*;
pub use goal::*;
