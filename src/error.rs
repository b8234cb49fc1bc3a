//! Unified error type for the ledger, storage and API layers.
//!
//! Built on `thiserror`; ledger operations only ever produce the first three
//! variants, the rest come from persistence and configuration.

use std::io;
use thiserror::Error;

/// todo-ledger error type
#[derive(Debug, Error)]
pub enum TodoError {
    /// Rejected input (empty/too-long description, malformed identifier)
    #[error("{0}")]
    InvalidInput(String),

    /// Task id not present for the account in question
    #[error("{0}")]
    NotFound(String),

    /// Operation not valid for the task's current flags
    #[error("{0}")]
    InvalidState(String),

    /// I/O error (snapshot/config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Storage error (generic)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// todo-ledger Result alias
pub type Result<T> = std::result::Result<T, TodoError>;

impl TodoError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
