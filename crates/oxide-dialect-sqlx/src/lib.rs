//! `sqlx` driver for `oxide-dialect`.
//!
//! Connects the driver-agnostic metadata engine to real databases:
//!
//! - **Connection** - [`SqlxConnection`], a [`MetadataConnection`] over
//!   [`sqlx::AnyConnection`]
//! - **Executor** - [`SchemaSynchronizer`] plans and applies schema changes,
//!   with a dry-run mode
//! - **Blocking** - [`BlockingMetadata`] runs the engine on a private
//!   runtime for synchronous callers
//! - **Documents** - JSON schema documents for the CLI
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_dialect::prelude::*;
//! use oxide_dialect_sqlx::{load_schema, SchemaSynchronizer, SqlxConnection};
//!
//! let mut conn = SqlxConnection::connect("sqlite:app.db").await?;
//! let mut metadata = DatabaseDialectMetadata::connect(&mut conn, CacheLifetime::Connection).await?;
//! let schema = load_schema("schema.json".as_ref())?;
//!
//! let report = SchemaSynchronizer::new(&mut metadata).sync(&mut conn, &schema).await?;
//! println!("{} statements applied", report.executed);
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # List tables of the current schema
//! oxide-dialect --database sqlite:app.db tables
//!
//! # Show the DDL a schema document needs
//! oxide-dialect plan --schema-file schema.json
//!
//! # Apply it
//! oxide-dialect sync --schema-file schema.json
//! ```
//!
//! [`MetadataConnection`]: oxide_dialect::MetadataConnection

pub mod blocking;
pub mod connection;
pub mod document;
pub mod error;
pub mod executor;

pub use blocking::BlockingMetadata;
pub use connection::SqlxConnection;
pub use document::{load_schema, parse_schema};
pub use error::{Result, SyncError};
pub use executor::{SchemaSynchronizer, SyncReport};
