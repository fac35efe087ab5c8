//! Dialect metadata and schema reconciliation for SQL databases.
//!
//! `oxide-dialect` reads the live structure of a database (schemas, tables,
//! columns, primary keys, foreign keys, indices, sequences) through a small
//! connection trait and compares it with a declared schema model.
//!
//! # Architecture
//!
//! - **Dialect** - Resolves the vendor (including H2 compatibility modes)
//!   from a URL or driver name
//! - **Providers** - Per-vendor identifier properties, keywords and type
//!   registries
//! - **Queries** - Per-vendor catalog SQL producing rows with fixed column
//!   names
//! - **Metadata** - The per-connection orchestrator that batches catalog
//!   queries and caches their results
//! - **DDL** - Renders declared tables, columns, indices, foreign keys and
//!   sequences for each vendor
//! - **Reconcile** - Plans the DDL that brings a database in line with a
//!   declared schema
//!
//! The crate never opens connections itself. Implement
//! [`MetadataConnection`](connection::MetadataConnection) over a driver, or
//! use the `oxide-dialect-sqlx` crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_dialect::prelude::*;
//!
//! let mut metadata = DatabaseDialectMetadata::connect(&mut conn, CacheLifetime::Pass).await?;
//!
//! let schema = DatabaseSchema::new().table(
//!     TableSchema::new("users")
//!         .column(ColumnSchema::new("id", SqlType::BigInt).primary_key().auto_increment())
//!         .column(ColumnSchema::new("email", SqlType::Varchar(255)).not_null().unique()),
//! );
//!
//! let plan = SchemaReconciler::new(&mut metadata).plan(&mut conn, &schema).await?;
//! for sql in &plan.statements {
//!     conn.execute(sql).await?;
//! }
//! ```

pub mod connection;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod extract;
pub mod identifier;
pub mod metadata;
pub mod model;
pub mod provider;
pub mod query;
pub mod reconcile;
pub mod schema;
pub mod types;
pub mod vendor;

pub use connection::{MetadataConnection, MetadataRow, MetadataValue};
pub use dialect::{DialectName, H2Mode};
pub use error::{MetadataError, Result};
pub use metadata::DatabaseDialectMetadata;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::connection::{MetadataConnection, MetadataRow, MetadataValue};
    pub use crate::ddl::{DdlDialect, DdlGenerator};
    pub use crate::dialect::{DialectName, H2Mode};
    pub use crate::error::{MetadataError, Result};
    pub use crate::identifier::IdentifierManager;
    pub use crate::metadata::DatabaseDialectMetadata;
    pub use crate::model::{
        CacheLifetime, ColumnMetadata, ConstraintKey, ForeignKeyConstraint, Index,
        IsolationLevel, PrimaryKeyMetadata, SchemaMetadata, Sequence, SessionSettings, TableRef,
    };
    pub use crate::reconcile::{ReconciliationPlan, SchemaReconciler, SchemaWarning};
    pub use crate::schema::{
        ColumnSchema, DatabaseSchema, DefaultValue, ForeignKeySchema, IndexSchema,
        SequenceSchema, SqlType, TableSchema,
    };
    pub use crate::types::ReferenceOption;
    pub use crate::vendor::VendorMetadata;
}
