use std::path::PathBuf;

use agency_core::{Category, ValidationError};
use agency_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("remote store error: {0}")]
    Remote(#[from] DbError),

    #[error("local file {}: {source}", path.display())]
    Local {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file or stored document could not be read as the expected entity.
    #[error("{path}: {reason}")]
    Document { path: String, reason: String },

    #[error("{category} '{key}' not found")]
    NotFound { category: Category, key: String },
}

impl SyncError {
    pub(crate) fn document(path: impl ToString, reason: impl ToString) -> Self {
        Self::Document {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
