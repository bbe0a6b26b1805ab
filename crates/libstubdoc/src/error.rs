use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StubdocError {
    #[error("Package not found on any search path: {0}")]
    PackageNotFound(String),

    #[error("Package entry file does not exist: {0}")]
    EntryNotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to initialise the stub parser: {0}")]
    Parser(String),

    #[error("Runtime introspection failed: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, StubdocError>;
