use std::path::PathBuf;
use thiserror::Error;

/// Errors at the engine's fallible edges (configuration and caller-supplied
/// arguments). Normalization, decoding, validation and rule evaluation are
/// total and never produce these.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Unknown record layout: {0}")]
    UnknownLayout(String),

    #[error("Invalid record layout: {0}")]
    InvalidLayout(String),
}
