//! Error types for the driver crate.

use std::path::PathBuf;

use oxide_dialect::MetadataError;

/// Errors that can occur while connecting, planning or applying schema
/// changes.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Metadata introspection or planning failed.
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Database error while connecting.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading schema documents, starting the runtime).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The schema document is not valid JSON for the schema model.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The schema document parsed but describes an impossible schema.
    #[error("Invalid schema document '{path}': {message}")]
    InvalidSchemaDocument {
        /// Path to the document.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A planned statement failed while being applied.
    #[error("Failed to apply `{sql}`: {source}")]
    Apply {
        /// The statement that failed.
        sql: String,
        /// Why it failed.
        #[source]
        source: MetadataError,
    },
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, SyncError>;
