//! Failures surfaced by the storage, config, export and preset layers.
//!
//! Store mutations never return these: they log and carry on. Only the
//! operations a caller can act on (loading config, exporting, resolving
//! a preset or id from the command line) hand back an [`Error`].

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A stored record or config value failed to encode or decode
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config file parsed but holds values the engine cannot use
    #[error("Configuration error: {0}")]
    Config(String),

    /// A backend refused a write
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Preset error: {0}")]
    Preset(String),

    /// A workout or exercise id that no template carries
    #[error("Not found: {0}")]
    NotFound(String),
}
