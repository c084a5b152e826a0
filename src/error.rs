// Error types for wingtable.
// Covers store I/O, schedule document parsing, downloads, and bridge arguments.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed with status {status}: {url}")]
    DownloadStatus { status: u16, url: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schedule document: {0}")]
    InvalidDocument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
