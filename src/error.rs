use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive {archive} has no entry named {entry}")]
    ArchiveEntry { archive: PathBuf, entry: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No {category} entry for {key:?} in the {language} dictionary")]
    Dictionary {
        language: String,
        category: String,
        key: String,
    },

    #[error("Card {card}: missing required field {field}")]
    MissingField { card: String, field: String },

    #[error("Card {card}: field {field} is not {expected}")]
    InvalidField {
        card: String,
        field: String,
        expected: &'static str,
    },
}

impl SyncError {
    pub fn config(message: impl Into<String>) -> Self {
        SyncError::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
