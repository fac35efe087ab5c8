//! Blocking facade.
//!
//! [`BlockingMetadata`] owns a current-thread tokio runtime and drives the
//! async metadata engine on it, for callers without a runtime of their own.
//! It must not be used from inside another tokio runtime.

use std::collections::HashMap;

use oxide_dialect::prelude::*;
use tokio::runtime::{Builder, Runtime};

use crate::connection::SqlxConnection;
use crate::error::{Result, SyncError};
use crate::executor::{SchemaSynchronizer, SyncReport};

/// A connection and its metadata engine, driven synchronously.
pub struct BlockingMetadata {
    runtime: Runtime,
    conn: SqlxConnection,
    metadata: DatabaseDialectMetadata,
}

impl BlockingMetadata {
    /// Connects to `url` and resolves the vendor.
    pub fn connect(url: &str, lifetime: CacheLifetime) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let (conn, metadata) = runtime.block_on(async {
            let mut conn = SqlxConnection::connect(url).await?;
            let metadata = DatabaseDialectMetadata::connect(&mut conn, lifetime).await?;
            Ok::<_, SyncError>((conn, metadata))
        })?;
        Ok(Self {
            runtime,
            conn,
            metadata,
        })
    }

    /// The resolved dialect.
    #[must_use]
    pub fn dialect(&self) -> DialectName {
        self.metadata.dialect()
    }

    /// The underlying metadata engine.
    #[must_use]
    pub fn metadata(&self) -> &DatabaseDialectMetadata {
        &self.metadata
    }

    /// The schema unqualified names resolve against.
    pub fn current_schema(&mut self) -> Result<String> {
        Ok(self
            .runtime
            .block_on(self.metadata.current_schema(&mut self.conn))?)
    }

    /// Every schema visible to the session.
    pub fn all_schema_names(&mut self) -> Result<Vec<String>> {
        Ok(self
            .runtime
            .block_on(self.metadata.all_schema_names(&mut self.conn))?)
    }

    /// Tables of the current schema.
    pub fn all_tables_names(&mut self) -> Result<Vec<String>> {
        Ok(self
            .runtime
            .block_on(self.metadata.all_tables_names(&mut self.conn))?)
    }

    /// Returns `true` if `table` exists; unqualified names use the current
    /// schema.
    pub fn table_exists(&mut self, table: &TableRef) -> Result<bool> {
        Ok(self
            .runtime
            .block_on(self.metadata.table_exists(&mut self.conn, table))?)
    }

    /// Columns of each table in `tables`, keyed by the reference passed in.
    pub fn table_columns(
        &mut self,
        tables: &[TableRef],
    ) -> Result<HashMap<TableRef, Vec<ColumnMetadata>>> {
        Ok(self
            .runtime
            .block_on(self.metadata.table_columns(&mut self.conn, tables))?)
    }

    /// Sequence names of the current schema. Never cached.
    pub fn sequences(&mut self) -> Result<Vec<String>> {
        Ok(self
            .runtime
            .block_on(self.metadata.sequences(&mut self.conn))?)
    }

    /// Whether `UPDATE` and `DELETE` accept a `LIMIT` clause on this server.
    pub fn supports_limit_with_update_or_delete(&mut self) -> Result<bool> {
        Ok(self.runtime.block_on(
            self.metadata
                .supports_limit_with_update_or_delete(&mut self.conn),
        )?)
    }

    /// Applies catalog, schema, isolation and read-only settings.
    pub fn apply_session_settings(&mut self, settings: &SessionSettings) -> Result<()> {
        Ok(self.runtime.block_on(
            self.metadata
                .apply_session_settings(&mut self.conn, settings),
        )?)
    }

    /// Plans the statements needed to reach `schema`.
    pub fn plan(&mut self, schema: &DatabaseSchema) -> Result<ReconciliationPlan> {
        let Self {
            runtime,
            conn,
            metadata,
        } = self;
        runtime.block_on(SchemaSynchronizer::new(metadata).plan(conn, schema))
    }

    /// Plans and applies the statements needed to reach `schema`.
    pub fn sync(&mut self, schema: &DatabaseSchema) -> Result<SyncReport> {
        let Self {
            runtime,
            conn,
            metadata,
        } = self;
        runtime.block_on(SchemaSynchronizer::new(metadata).sync(conn, schema))
    }

    /// Executes one statement and drops cached metadata, which the
    /// statement may have invalidated.
    pub fn execute(&mut self, sql: &str) -> Result<u64> {
        let affected = self.runtime.block_on(self.conn.execute(sql));
        self.metadata.reset_caches();
        Ok(affected?)
    }

    /// Drops all cached metadata so the next read goes to the catalog.
    pub fn reset_caches(&mut self) {
        self.metadata.reset_caches();
    }
}
