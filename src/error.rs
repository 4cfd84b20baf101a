use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum FoliaError {
    #[error("File System error: {0}")]
    Io(String),
    #[error("Manifest error: {0}")]
    Manifest(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for FoliaError {
    fn from(src: toml::de::Error) -> FoliaError {
        FoliaError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<JsonError> for FoliaError {
    fn from(src: JsonError) -> FoliaError {
        FoliaError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for FoliaError {
    fn from(src: UrlParseError) -> FoliaError {
        FoliaError::Serialization(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for FoliaError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => FoliaError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => FoliaError::PermissionDenied,
            _ => FoliaError::Io(format!("IOError: {}", x.kind())),
        }
    }
}
