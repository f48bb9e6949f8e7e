use std::path::PathBuf;
use thiserror::Error;


#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP Request Error: {0}")]
    Network(String),

    #[error("JSON Serialization/Deserialization Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM Response Error: {0}")]
    ResponseExtraction(String),

    #[error("File Update Error: {0}")]
    FileUpdate(String),
}

/// One file update failing must not abort its siblings, so the applier
/// collects these instead of returning early.
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Refusing to write '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to create directory '{}': {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to back up '{}': {source}", path.display())]
    BackupRename {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
