use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the snippet store.
///
/// "No matching record" is never an error: lookups return `Option` and
/// deletes return `bool`. A missing snippets file on the read side means
/// the collection is empty, not that anything failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine the home directory")]
    HomeDir,

    #[error("failed to create storage directory {}: {source}", path.display())]
    Directory { path: PathBuf, source: io::Error },

    #[error("failed to read snippet store {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("snippet store {} contains invalid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write snippet store {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, StorageError>;
