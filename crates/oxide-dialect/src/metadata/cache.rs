//! Per-connection metadata caches.
//!
//! Every slot is either empty or holds data fetched in full. Loaders fill
//! a local value first and install it in one assignment, so an abandoned
//! fetch never leaves a half-written entry behind.

use std::collections::HashMap;

use crate::model::{ColumnMetadata, ForeignKeyConstraint, Index, PrimaryKeyMetadata};

/// Cached metadata keyed by identifier cache keys
/// (see [`IdentifierManager::cache_key`](crate::identifier::IdentifierManager::cache_key)).
///
/// Table entries use the key `"{schema}.{table}"`.
#[derive(Debug, Default, Clone)]
pub struct MetadataCache {
    pub(crate) current_schema: Option<String>,
    pub(crate) schema_names: Option<Vec<String>>,
    /// Stored table names per schema key.
    pub(crate) table_names: HashMap<String, Vec<String>>,
    pub(crate) columns: HashMap<String, Vec<ColumnMetadata>>,
    /// `None` records a table known to have no primary key.
    pub(crate) primary_keys: HashMap<String, Option<PrimaryKeyMetadata>>,
    /// Raw constraints, names as the catalog stores them.
    pub(crate) constraints: HashMap<String, Vec<ForeignKeyConstraint>>,
    /// Raw secondary indices, names as the catalog stores them.
    pub(crate) indices: HashMap<String, Vec<Index>>,
    /// Outcome of the update/delete `LIMIT` probe; survives resets.
    pub(crate) limit_probe: Option<bool>,
}

impl MetadataCache {
    /// Clears everything except schema names and the capability probe.
    pub fn reset(&mut self) {
        self.current_schema = None;
        self.table_names.clear();
        self.columns.clear();
        self.primary_keys.clear();
        self.constraints.clear();
        self.indices.clear();
    }

    /// Clears schema names too.
    pub fn reset_schemas(&mut self) {
        self.schema_names = None;
        self.reset();
    }

    /// Returns `true` if nothing table-scoped is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_schema.is_none()
            && self.table_names.is_empty()
            && self.columns.is_empty()
            && self.primary_keys.is_empty()
            && self.constraints.is_empty()
            && self.indices.is_empty()
    }
}

/// Joins a schema key and a table key into a table cache key.
pub(crate) fn table_key(schema_key: &str, table_key: &str) -> String {
    format!("{schema_key}.{table_key}")
}
