//! Error types for metadata introspection and reconciliation.

use crate::dialect::DialectName;

/// Errors raised while reading or reconciling database metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The connection URL or driver name does not map to a known dialect.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// The vendor lacks the capability being requested.
    #[error("{feature} is not supported by {dialect}")]
    UnsupportedFeature {
        /// Dialect that lacks the feature.
        dialect: DialectName,
        /// Short description of the missing capability.
        feature: &'static str,
    },

    /// The server received the statement and refused it (unknown function,
    /// view, pragma, syntax error, ...).
    #[error("Statement rejected by database{}: {message}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Rejected {
        /// The statement that was rejected.
        sql: String,
        /// Vendor error code or SQLSTATE, when the driver exposes one.
        code: Option<String>,
        /// Vendor error message.
        message: String,
    },

    /// The connection itself failed (I/O, TLS, protocol, closed connection).
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A metadata row did not carry a column the row mapper requires.
    #[error("Metadata row from {query} is missing column {column}")]
    MissingColumn {
        /// Short name of the metadata query.
        query: &'static str,
        /// Name of the missing column.
        column: &'static str,
    },
}

impl MetadataError {
    /// Builds a `Rejected` error without a vendor code.
    #[must_use]
    pub fn rejected(sql: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            sql: sql.into(),
            code: None,
            message: message.into(),
        }
    }

    /// Returns `true` for errors that mean "this vendor cannot do that"
    /// rather than "the connection is broken".
    ///
    /// Capability probes degrade to a conservative default on these errors
    /// and propagate everything else.
    #[must_use]
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self, Self::UnsupportedFeature { .. } | Self::Rejected { .. })
    }
}

/// Result type for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Collapses unsupported-feature errors into `default`, keeping every other
/// error.
pub(crate) fn degrade<T>(result: Result<T>, default: T, probe: &str) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_unsupported_feature() => {
            tracing::warn!(probe = %probe, error = %err, "Probe not supported, using default");
            Ok(default)
        }
        Err(err) => Err(err),
    }
}
