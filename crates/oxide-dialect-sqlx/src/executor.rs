//! Schema synchronizer.
//!
//! Plans the DDL that brings a database in line with a declared schema and
//! applies it statement by statement.

use oxide_dialect::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};

/// What a synchronization did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// The plan that was computed.
    pub plan: ReconciliationPlan,
    /// Number of statements executed; zero in dry-run mode.
    pub executed: usize,
}

/// Applies reconciliation plans through a metadata connection.
pub struct SchemaSynchronizer<'m> {
    metadata: &'m mut DatabaseDialectMetadata,
    dry_run: bool,
}

impl<'m> SchemaSynchronizer<'m> {
    /// Creates a synchronizer reading through `metadata`.
    pub fn new(metadata: &'m mut DatabaseDialectMetadata) -> Self {
        Self {
            metadata,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (SQL is printed but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Computes the plan without applying it.
    pub async fn plan(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &DatabaseSchema,
    ) -> Result<ReconciliationPlan> {
        let plan = SchemaReconciler::new(&mut *self.metadata).plan(conn, schema).await?;
        for warning in &plan.warnings {
            warn!(%warning, "Schema difference left in place");
        }
        Ok(plan)
    }

    /// Computes the plan and applies every statement in order.
    ///
    /// Metadata caches are reset once DDL has run, even when a statement
    /// fails part way through.
    pub async fn sync(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &DatabaseSchema,
    ) -> Result<SyncReport> {
        let plan = self.plan(conn, schema).await?;
        if plan.statements.is_empty() {
            info!("Database is up to date");
            return Ok(SyncReport { plan, executed: 0 });
        }

        if self.dry_run {
            for sql in &plan.statements {
                println!("{sql};");
            }
            return Ok(SyncReport { plan, executed: 0 });
        }

        let outcome = Self::apply(conn, &plan.statements).await;
        self.metadata.reset_schema_caches();
        let executed = outcome?;
        info!(statements = executed, "Schema synchronized");
        Ok(SyncReport { plan, executed })
    }

    async fn apply(
        conn: &mut dyn MetadataConnection,
        statements: &[String],
    ) -> Result<usize> {
        for (done, sql) in statements.iter().enumerate() {
            debug!(sql = %sql, "Executing SQL");
            conn.execute(sql).await.map_err(|source| {
                warn!(applied = done, "Synchronization stopped");
                SyncError::Apply {
                    sql: sql.clone(),
                    source,
                }
            })?;
            info!(sql = %sql, "Applied");
        }
        Ok(statements.len())
    }
}
