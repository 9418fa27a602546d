use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{} not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Malformed config: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, PortalError>;
