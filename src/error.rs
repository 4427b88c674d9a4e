use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flatlabel operations.
#[derive(Debug, Error)]
pub enum FlatlabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    MoveFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove category directory {path}: {source}")]
    RemoveCategory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create manifest {path}: {source}")]
    CreateManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest to {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid manifest {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("Failed to parse manifest from {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Filename collision on '{file_name}': found in {first} and {second}")]
    FilenameCollision {
        file_name: String,
        first: String,
        second: String,
    },

    #[error("Failed to serialize report as JSON: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Non-UTF-8 name under {path}")]
    NonUtf8Name { path: PathBuf },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
