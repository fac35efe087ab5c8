//! The metadata orchestrator.
//!
//! [`DatabaseDialectMetadata`] answers questions about a live database
//! ("does this table exist", "which foreign keys does it have") by issuing
//! vendor queries through a borrowed [`MetadataConnection`] and caching the
//! answers per connection. One instance belongs to one connection and is
//! not shared across concurrent sessions.
//!
//! Table-scoped lookups follow a fetch-then-reread split: every requested
//! table missing from the cache is fetched in one batched query per
//! schema, and the result is then read back from the cache for all
//! requested tables alike.

mod cache;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

pub use cache::MetadataCache;

use crate::connection::{MetadataConnection, MetadataRow};
use crate::ddl::DdlGenerator;
use crate::dialect::{DialectName, H2Mode};
use crate::error::{degrade, MetadataError, Result};
use crate::extract;
use crate::identifier::{identity_manager_for, IdentifierManager};
use crate::model::{
    CacheLifetime, ColumnMetadata, ConstraintKey, ForeignKeyConstraint, Index, PrimaryKeyMetadata,
    SchemaMetadata, Sequence, SessionSettings, TableRef,
};
use crate::schema::TableSchema;
use crate::vendor::VendorMetadata;

use cache::table_key;

/// A table reference resolved to catalog spelling.
#[derive(Debug, Clone)]
struct ResolvedTable {
    /// Schema as the catalog stores it.
    schema: String,
    /// Table name as the catalog stores it.
    name: String,
    /// Cache key of the pair.
    key: String,
}

/// Dialect-aware metadata access for one connection.
#[derive(Debug)]
pub struct DatabaseDialectMetadata {
    vendor: VendorMetadata,
    identifiers: Arc<IdentifierManager>,
    lifetime: CacheLifetime,
    cache: MetadataCache,
}

impl DatabaseDialectMetadata {
    /// Creates an orchestrator from already-resolved vendor metadata.
    #[must_use]
    pub fn new(
        vendor: VendorMetadata,
        identifiers: Arc<IdentifierManager>,
        lifetime: CacheLifetime,
    ) -> Self {
        Self {
            vendor,
            identifiers,
            lifetime,
            cache: MetadataCache::default(),
        }
    }

    /// Creates an orchestrator for the database behind `conn`.
    ///
    /// H2 databases are asked for their compatibility mode first; a
    /// database that cannot answer is treated as regular H2. The identifier
    /// manager is shared by every connection to the same URL.
    pub async fn connect(
        conn: &mut dyn MetadataConnection,
        lifetime: CacheLifetime,
    ) -> Result<Self> {
        let mut vendor = VendorMetadata::for_dialect(conn.dialect());
        if let Some(probe) = vendor.queries.mode_probe() {
            debug!(sql = %probe, "Probing dialect mode");
            let mode = degrade(
                conn.query(&probe).await.map(|rows| {
                    rows.first()
                        .and_then(|row| row.string("SETTING_VALUE"))
                        .map_or(H2Mode::Regular, |value| H2Mode::from_setting(&value))
                }),
                H2Mode::Regular,
                "h2 mode",
            )?;
            vendor = vendor.with_h2_mode(mode);
        }
        let identifiers = identity_manager_for(conn.url(), || vendor.identifier_manager());
        info!(dialect = %vendor.dialect, "Metadata connected");
        Ok(Self::new(vendor, identifiers, lifetime))
    }

    /// The resolved dialect, including any H2 mode.
    #[must_use]
    pub fn dialect(&self) -> DialectName {
        self.vendor.dialect
    }

    /// Vendor wiring in use.
    #[must_use]
    pub fn vendor(&self) -> &VendorMetadata {
        &self.vendor
    }

    /// Identifier rules in use.
    #[must_use]
    pub fn identifiers(&self) -> &IdentifierManager {
        &self.identifiers
    }

    /// Configured cache lifetime.
    #[must_use]
    pub fn cache_lifetime(&self) -> CacheLifetime {
        self.lifetime
    }

    /// A DDL generator sharing this connection's identifier rules.
    #[must_use]
    pub fn ddl(&self) -> DdlGenerator {
        DdlGenerator::new(
            self.vendor.dialect,
            Arc::clone(&self.identifiers),
            self.vendor.types.clone(),
        )
    }

    /// Current cache contents.
    #[must_use]
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    async fn run(
        &self,
        conn: &mut dyn MetadataConnection,
        query: &'static str,
        sql: &str,
    ) -> Result<Vec<MetadataRow>> {
        debug!(dialect = %self.vendor.dialect, query, sql = %sql, "Metadata query");
        conn.query(sql).await
    }

    fn qualify(&self, schema: &str, table: &str) -> String {
        if schema.is_empty() || self.vendor.dialect == DialectName::Sqlite {
            table.to_string()
        } else {
            format!("{schema}.{table}")
        }
    }

    /// The current catalog. Never cached: some vendors switch catalogs
    /// mid-session. `None` for vendors without a catalog level.
    pub async fn catalog(&self, conn: &mut dyn MetadataConnection) -> Result<Option<String>> {
        let Some(sql) = self.vendor.queries.current_catalog() else {
            return Ok(None);
        };
        let rows = self.run(conn, "current catalog", &sql).await?;
        Ok(rows.first().and_then(|row| row.string("CURRENT_NAME")))
    }

    /// All catalogs. Vendors without catalogs answer without a round trip.
    pub async fn catalogs(&self, conn: &mut dyn MetadataConnection) -> Result<Vec<String>> {
        if !self.vendor.properties.supports_catalogs {
            return Ok(Vec::new());
        }
        let sql = self.vendor.queries.catalogs();
        let rows = degrade(self.run(conn, "catalogs", &sql).await, Vec::new(), "catalogs")?;
        Ok(extract::names_from_rows(&rows, "TABLE_CAT"))
    }

    /// The current schema, cached until the next reset.
    pub async fn current_schema(&mut self, conn: &mut dyn MetadataConnection) -> Result<String> {
        if let Some(schema) = &self.cache.current_schema {
            return Ok(schema.clone());
        }
        let sql = self.vendor.queries.current_schema();
        let rows = self.run(conn, "current schema", &sql).await?;
        let schema = rows
            .first()
            .and_then(|row| row.string("CURRENT_NAME"))
            .unwrap_or_default();
        self.cache.current_schema = Some(schema.clone());
        Ok(schema)
    }

    async fn ensure_schema_names_loaded(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<Vec<String>> {
        if let Some(names) = &self.cache.schema_names {
            return Ok(names.clone());
        }
        let sql = self.vendor.queries.schemas();
        let rows = self.run(conn, "schemas", &sql).await?;
        let names = extract::names_from_rows(&rows, "TABLE_SCHEM");
        self.cache.schema_names = Some(names.clone());
        Ok(names)
    }

    async fn ensure_table_names_loaded(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &str,
    ) -> Result<Vec<String>> {
        let key = self.identifiers.cache_key(schema);
        if let Some(names) = self.cache.table_names.get(&key) {
            return Ok(names.clone());
        }
        let sql = self
            .vendor
            .queries
            .tables((!schema.is_empty()).then_some(schema));
        let rows = self.run(conn, "tables", &sql).await?;
        let names = extract::names_from_rows(&rows, "TABLE_NAME");
        self.cache.table_names.insert(key, names.clone());
        Ok(names)
    }

    /// All schema names, cached until [`reset_schema_caches`](Self::reset_schema_caches).
    pub async fn all_schema_names(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<Vec<String>> {
        self.ensure_schema_names_loaded(conn).await
    }

    /// Tables of the current schema, schema-qualified where the vendor has
    /// schemas.
    pub async fn all_tables_names(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<Vec<String>> {
        let schema = self.current_schema(conn).await?;
        let names = self.ensure_table_names_loaded(conn, &schema).await?;
        Ok(names.iter().map(|n| self.qualify(&schema, n)).collect())
    }

    /// Tables of every schema, schema-qualified.
    pub async fn all_tables_names_in_all_schemas(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<Vec<String>> {
        let schemas = self.ensure_schema_names_loaded(conn).await?;
        let mut all = Vec::new();
        for schema in schemas {
            let names = self.ensure_table_names_loaded(conn, &schema).await?;
            all.extend(names.iter().map(|n| self.qualify(&schema, n)));
        }
        Ok(all)
    }

    /// Returns `true` if `table` exists. An explicit schema is looked up
    /// directly; otherwise the current schema is used, and a vendor with
    /// no current schema is searched without qualification.
    pub async fn table_exists(
        &mut self,
        conn: &mut dyn MetadataConnection,
        table: &TableRef,
    ) -> Result<bool> {
        let resolved = self.resolve(conn, table).await?;
        let wanted = self.identifiers.cache_key(&resolved.name);
        let names = self.ensure_table_names_loaded(conn, &resolved.schema).await?;
        Ok(names
            .iter()
            .any(|n| self.identifiers.cache_key(n) == wanted))
    }

    /// Returns `true` if `schema` exists.
    pub async fn schema_exists(
        &mut self,
        conn: &mut dyn MetadataConnection,
        schema: &str,
    ) -> Result<bool> {
        let wanted = self
            .identifiers
            .cache_key(&self.identifiers.stored_name(schema));
        let names = self.ensure_schema_names_loaded(conn).await?;
        Ok(names
            .iter()
            .any(|n| self.identifiers.cache_key(n) == wanted))
    }

    /// Sequence names of the current schema. Never cached.
    pub async fn sequences(&mut self, conn: &mut dyn MetadataConnection) -> Result<Vec<String>> {
        Ok(self
            .sequence_details(conn)
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect())
    }

    /// Sequences of the current schema with their options. Never cached.
    pub async fn sequence_details(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<Vec<Sequence>> {
        let schema = self.current_schema(conn).await?;
        let Some(sql) = self.vendor.queries.sequences(&schema) else {
            return Ok(Vec::new());
        };
        let rows = self.run(conn, "sequences", &sql).await?;
        extract::sequences_from_rows(&rows)
    }

    /// Returns `true` if a sequence named `name` exists in the current
    /// schema.
    pub async fn sequence_exists(
        &mut self,
        conn: &mut dyn MetadataConnection,
        name: &str,
    ) -> Result<bool> {
        let wanted = self
            .identifiers
            .cache_key(&self.identifiers.stored_name(name));
        Ok(self
            .sequences(conn)
            .await?
            .iter()
            .any(|n| self.identifiers.cache_key(n) == wanted))
    }

    async fn resolve(
        &mut self,
        conn: &mut dyn MetadataConnection,
        table: &TableRef,
    ) -> Result<ResolvedTable> {
        let schema = match &table.schema {
            Some(schema) => self.identifiers.stored_name(schema),
            None => self.current_schema(conn).await?,
        };
        let name = self.identifiers.stored_name(&table.name);
        let key = table_key(
            &self.identifiers.cache_key(&schema),
            &self.identifiers.cache_key(&name),
        );
        Ok(ResolvedTable { schema, name, key })
    }

    async fn resolve_all(
        &mut self,
        conn: &mut dyn MetadataConnection,
        tables: &[TableRef],
    ) -> Result<Vec<(TableRef, ResolvedTable)>> {
        let mut resolved = Vec::with_capacity(tables.len());
        for table in tables {
            resolved.push((table.clone(), self.resolve(conn, table).await?));
        }
        Ok(resolved)
    }

    fn distinct(resolved: &[(TableRef, ResolvedTable)]) -> Vec<ResolvedTable> {
        let mut seen = HashSet::new();
        resolved
            .iter()
            .map(|(_, r)| r)
            .filter(|r| seen.insert(r.key.clone()))
            .cloned()
            .collect()
    }

    /// Tables among `resolved` that `cached` holds no entry for.
    fn missing<T>(
        resolved: &[(TableRef, ResolvedTable)],
        cached: &HashMap<String, T>,
    ) -> Vec<ResolvedTable> {
        Self::distinct(resolved)
            .into_iter()
            .filter(|r| !cached.contains_key(&r.key))
            .collect()
    }

    /// Runs one query per schema for `tables` and returns the extracted
    /// value of every table, defaulted when the catalog returned nothing.
    async fn fetch_batched<T, Q, E>(
        &self,
        conn: &mut dyn MetadataConnection,
        query: &'static str,
        tables: &[ResolvedTable],
        build: Q,
        extract: E,
    ) -> Result<Vec<(String, T)>>
    where
        T: Default,
        Q: Fn(&str, &[String]) -> Option<String>,
        E: Fn(&[MetadataRow]) -> Result<HashMap<String, T>>,
    {
        let mut by_schema: Vec<(&str, Vec<&ResolvedTable>)> = Vec::new();
        for table in tables {
            match by_schema.iter_mut().find(|(s, _)| *s == table.schema) {
                Some((_, group)) => group.push(table),
                None => by_schema.push((&table.schema, vec![table])),
            }
        }

        let mut fetched = Vec::with_capacity(tables.len());
        for (schema, group) in by_schema {
            let names: Vec<String> = group.iter().map(|t| t.name.clone()).collect();
            let mut by_key: HashMap<String, T> = match build(schema, &names) {
                Some(sql) => extract(&self.run(conn, query, &sql).await?)?
                    .into_iter()
                    .map(|(table, value)| (self.identifiers.cache_key(&table), value))
                    .collect(),
                None => HashMap::new(),
            };
            for table in group {
                let value = by_key
                    .remove(&self.identifiers.cache_key(&table.name))
                    .unwrap_or_default();
                fetched.push((table.key.clone(), value));
            }
        }
        Ok(fetched)
    }

    /// Columns of `tables`, fetched in one batch per schema and cached.
    pub async fn table_columns(
        &mut self,
        conn: &mut dyn MetadataConnection,
        tables: &[TableRef],
    ) -> Result<HashMap<TableRef, Vec<ColumnMetadata>>> {
        let resolved = self.resolve_all(conn, tables).await?;
        let missing = Self::missing(&resolved, &self.cache.columns);
        if !missing.is_empty() {
            let fetched = self
                .fetch_batched(
                    conn,
                    "columns",
                    &missing,
                    |schema, names| {
                        Some(
                            self.vendor
                                .queries
                                .columns(&self.vendor.types, schema, names),
                        )
                    },
                    extract::columns_from_rows,
                )
                .await?;
            self.cache.columns.extend(fetched);
        }
        Ok(resolved
            .into_iter()
            .map(|(table, r)| {
                let columns = self.cache.columns.get(&r.key).cloned().unwrap_or_default();
                (table, columns)
            })
            .collect())
    }

    /// Primary keys of `tables`; `None` for a table without one.
    pub async fn existing_primary_keys(
        &mut self,
        conn: &mut dyn MetadataConnection,
        tables: &[TableRef],
    ) -> Result<HashMap<TableRef, Option<PrimaryKeyMetadata>>> {
        let resolved = self.resolve_all(conn, tables).await?;
        self.fill_primary_keys(conn, &resolved).await?;
        Ok(resolved
            .into_iter()
            .map(|(table, r)| {
                let pk = self.cache.primary_keys.get(&r.key).cloned().flatten();
                (table, pk)
            })
            .collect())
    }

    async fn fill_primary_keys(
        &mut self,
        conn: &mut dyn MetadataConnection,
        resolved: &[(TableRef, ResolvedTable)],
    ) -> Result<()> {
        let missing = Self::missing(resolved, &self.cache.primary_keys);
        if missing.is_empty() {
            return Ok(());
        }
        let fetched = self
            .fetch_batched(
                conn,
                "primary keys",
                &missing,
                |schema, names| Some(self.vendor.queries.primary_keys(schema, names)),
                |rows| {
                    Ok(extract::primary_keys_from_rows(rows)?
                        .into_iter()
                        .map(|(table, pk)| (table, Some(pk)))
                        .collect())
                },
            )
            .await?;
        self.cache.primary_keys.extend(fetched);
        Ok(())
    }

    async fn fill_constraint_cache_for_tables(
        &mut self,
        conn: &mut dyn MetadataConnection,
        missing: &[ResolvedTable],
    ) -> Result<()> {
        let fetched = self
            .fetch_batched(
                conn,
                "imported keys",
                missing,
                |schema, names| {
                    Some(
                        self.vendor
                            .queries
                            .imported_keys(&self.vendor.types, schema, names),
                    )
                },
                |rows| extract::foreign_keys_from_rows(rows, &self.vendor.types),
            )
            .await?;
        self.cache.constraints.extend(fetched);
        Ok(())
    }

    /// Foreign keys declared on `tables`, grouped by referencing table and
    /// referencing columns.
    ///
    /// Column and table names are mapped onto the declared models in
    /// `tables`; references the models cannot account for are dropped.
    pub async fn column_constraints(
        &mut self,
        conn: &mut dyn MetadataConnection,
        tables: &[&TableSchema],
    ) -> Result<HashMap<ConstraintKey, Vec<ForeignKeyConstraint>>> {
        let refs: Vec<TableRef> = tables.iter().map(|t| t.table_ref()).collect();
        let resolved = self.resolve_all(conn, &refs).await?;
        let missing = Self::missing(&resolved, &self.cache.constraints);
        if !missing.is_empty() {
            self.fill_constraint_cache_for_tables(conn, &missing).await?;
        }

        let mut grouped: HashMap<ConstraintKey, Vec<ForeignKeyConstraint>> = HashMap::new();
        for (table, (table_ref, r)) in tables.iter().zip(resolved) {
            let raw = self
                .cache
                .constraints
                .get(&r.key)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for fk in extract::resolve_foreign_keys(raw, table, tables, &self.identifiers) {
                let key = ConstraintKey {
                    table: table_ref.clone(),
                    columns: fk.from_columns().iter().map(|c| (*c).to_string()).collect(),
                };
                grouped.entry(key).or_default().push(fk);
            }
        }
        Ok(grouped)
    }

    /// Secondary indices of `tables`, mapped onto declared column names.
    ///
    /// Primary keys are fetched first so their backing indices can be left
    /// out.
    pub async fn existing_indices(
        &mut self,
        conn: &mut dyn MetadataConnection,
        tables: &[&TableSchema],
    ) -> Result<HashMap<TableRef, Vec<Index>>> {
        let refs: Vec<TableRef> = tables.iter().map(|t| t.table_ref()).collect();
        let resolved = self.resolve_all(conn, &refs).await?;
        let missing = Self::missing(&resolved, &self.cache.indices);
        if !missing.is_empty() {
            self.fill_primary_keys(conn, &resolved).await?;
            let pk_names: HashSet<String> = missing
                .iter()
                .filter_map(|r| self.cache.primary_keys.get(&r.key).cloned().flatten())
                .map(|pk| pk.name)
                .collect();
            let fetched = self
                .fetch_batched(
                    conn,
                    "index info",
                    &missing,
                    |schema, names| Some(self.vendor.queries.index_info(schema, names)),
                    |rows| extract::indices_from_rows(rows, &pk_names),
                )
                .await?;
            self.cache.indices.extend(fetched);
        }

        Ok(tables
            .iter()
            .zip(resolved)
            .map(|(table, (table_ref, r))| {
                let raw = self
                    .cache
                    .indices
                    .get(&r.key)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                (
                    table_ref,
                    extract::resolve_indices(raw, table, &self.identifiers),
                )
            })
            .collect())
    }

    /// Sequences backing auto-increment columns of `tables`. Never cached.
    pub async fn existing_sequences(
        &mut self,
        conn: &mut dyn MetadataConnection,
        tables: &[TableRef],
    ) -> Result<HashMap<TableRef, Vec<Sequence>>> {
        let resolved = self.resolve_all(conn, tables).await?;
        let unique = Self::distinct(&resolved);
        let fetched: HashMap<String, Vec<Sequence>> = self
            .fetch_batched(
                conn,
                "table sequences",
                &unique,
                |schema, names| self.vendor.queries.table_sequences(schema, names),
                extract::table_sequences_from_rows,
            )
            .await?
            .into_iter()
            .collect();
        Ok(resolved
            .into_iter()
            .map(|(table, r)| {
                let sequences = fetched.get(&r.key).cloned().unwrap_or_default();
                (table, sequences)
            })
            .collect())
    }

    /// Whether `UPDATE`/`DELETE` accept `LIMIT`.
    ///
    /// Vendors where this depends on the build are probed once per
    /// connection; a probe the database rejects answers `false`.
    pub async fn supports_limit_with_update_or_delete(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<bool> {
        let Some(probe) = self.vendor.queries.update_delete_limit_probe() else {
            return Ok(self.vendor.properties.supports_limit_with_update_or_delete);
        };
        if let Some(enabled) = self.cache.limit_probe {
            return Ok(enabled);
        }
        let answer = self.run(conn, "limit probe", &probe).await.map(|rows| {
            rows.first()
                .and_then(|row| row.bool("LIMIT_ENABLED"))
                .unwrap_or(false)
        });
        let enabled = degrade(answer, false, "update/delete limit")?;
        self.cache.limit_probe = Some(enabled);
        Ok(enabled)
    }

    /// Applies catalog, schema, isolation and read-only settings through
    /// vendor statements.
    ///
    /// A setting the vendor cannot express fails with
    /// [`MetadataError::UnsupportedFeature`].
    pub async fn apply_session_settings(
        &mut self,
        conn: &mut dyn MetadataConnection,
        settings: &SessionSettings,
    ) -> Result<()> {
        let dialect = self.vendor.dialect;
        let unsupported = |feature| MetadataError::UnsupportedFeature { dialect, feature };

        let mut statements = Vec::new();
        if let Some(catalog) = &settings.catalog {
            let quoted = self.identifiers.quote_identifier_when_wrong_case_or_necessary(catalog);
            let sql = self
                .vendor
                .queries
                .set_catalog(&quoted)
                .ok_or_else(|| unsupported("setting the catalog"))?;
            statements.push(sql);
        }
        if let Some(schema) = &settings.schema {
            let quoted = self.identifiers.quote_identifier_when_wrong_case_or_necessary(schema);
            let sql = self
                .vendor
                .queries
                .set_schema(&quoted)
                .ok_or_else(|| unsupported("setting the schema"))?;
            statements.push(sql);
        }
        if let Some(level) = settings.isolation {
            let sql = self
                .vendor
                .queries
                .set_transaction_isolation(level)
                .ok_or_else(|| unsupported("this isolation level"))?;
            statements.push(sql);
        }
        match self.vendor.queries.set_read_only(settings.read_only) {
            Some(sql) => statements.push(sql),
            None if settings.read_only => return Err(unsupported("read-only sessions")),
            None => {}
        }
        if let Some(autocommit) = settings.autocommit {
            debug!(autocommit, "Autocommit is owned by the connection");
        }

        for sql in statements {
            info!(sql = %sql, "Applying session setting");
            conn.execute(&sql).await?;
        }
        if settings.catalog.is_some() || settings.schema.is_some() {
            self.cache.current_schema = None;
        }
        Ok(())
    }

    /// The current schema and its tables.
    pub async fn schema_metadata(
        &mut self,
        conn: &mut dyn MetadataConnection,
    ) -> Result<SchemaMetadata> {
        let current_schema_name = self.current_schema(conn).await?;
        let table_names = self.all_tables_names(conn).await?;
        Ok(SchemaMetadata {
            current_schema_name,
            table_names,
        })
    }

    /// Clears table names, the current schema and every table-scoped
    /// cache. Schema names are kept.
    pub fn reset_caches(&mut self) {
        info!(dialect = %self.vendor.dialect, "Resetting metadata caches");
        self.cache.reset();
    }

    /// Clears schema names as well as everything
    /// [`reset_caches`](Self::reset_caches) clears.
    pub fn reset_schema_caches(&mut self) {
        self.cache.schema_names = None;
        self.reset_caches();
    }

    /// Marks the end of a reconciliation pass. Pass-scoped caches are
    /// cleared; connection-scoped caches are kept.
    pub fn end_pass(&mut self) {
        if self.lifetime == CacheLifetime::Pass {
            self.reset_caches();
        }
    }
}
