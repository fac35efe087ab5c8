//! `sqlx` implementation of the metadata connection seam.
//!
//! Statements go through [`sqlx::AnyConnection`], so one binary serves
//! every driver compiled into `sqlx`. Catalog rows are converted cell by
//! cell into [`MetadataValue`]s; the core crate does the rest.

use async_trait::async_trait;
use oxide_dialect::{DialectName, MetadataConnection, MetadataError, MetadataRow, MetadataValue};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Column, Connection, Executor, Row, ValueRef};
use tracing::debug;

use crate::error::Result;

/// A live database connection usable by the metadata engine.
#[derive(Debug)]
pub struct SqlxConnection {
    inner: AnyConnection,
    dialect: DialectName,
    url: String,
}

impl SqlxConnection {
    /// Opens a connection to `url`.
    ///
    /// The dialect comes from the URL scheme; H2 compatibility modes are
    /// resolved later by the metadata engine.
    pub async fn connect(url: &str) -> Result<Self> {
        let dialect = DialectName::from_url(url)?;
        sqlx::any::install_default_drivers();
        let inner = AnyConnection::connect(url).await?;
        debug!(%dialect, backend = inner.backend_name(), "Connected");
        Ok(Self::new(inner, dialect, url))
    }

    /// Wraps an already open connection.
    #[must_use]
    pub fn new(inner: AnyConnection, dialect: DialectName, url: impl Into<String>) -> Self {
        Self {
            inner,
            dialect,
            url: url.into(),
        }
    }

    /// The underlying `sqlx` connection.
    pub fn inner_mut(&mut self) -> &mut AnyConnection {
        &mut self.inner
    }

    /// Closes the connection gracefully.
    pub async fn close(self) -> Result<()> {
        self.inner.close().await?;
        Ok(())
    }
}

#[async_trait]
impl MetadataConnection for SqlxConnection {
    fn dialect(&self) -> DialectName {
        self.dialect
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn query(&mut self, sql: &str) -> oxide_dialect::Result<Vec<MetadataRow>> {
        let rows = sqlx::query(sql)
            .fetch_all(&mut self.inner)
            .await
            .map_err(|e| metadata_error(sql, e))?;
        rows.iter()
            .map(|row| metadata_row(row).map_err(|e| metadata_error(sql, e)))
            .collect()
    }

    async fn execute(&mut self, sql: &str) -> oxide_dialect::Result<u64> {
        // No bind arguments, so the text may hold several statements.
        let result = Executor::execute(&mut self.inner, sql)
            .await
            .map_err(|e| metadata_error(sql, e))?;
        Ok(result.rows_affected())
    }
}

/// Maps a driver error onto the core taxonomy: anything the server
/// reported is a rejection, everything else is a broken connection.
fn metadata_error(sql: &str, error: sqlx::Error) -> MetadataError {
    match error {
        sqlx::Error::Database(db) => MetadataError::Rejected {
            sql: sql.to_string(),
            code: db.code().map(|c| c.into_owned()),
            message: db.message().to_string(),
        },
        other => MetadataError::Connection(Box::new(other)),
    }
}

fn metadata_row(row: &AnyRow) -> std::result::Result<MetadataRow, sqlx::Error> {
    let mut out = MetadataRow::new();
    for column in row.columns() {
        let value = metadata_value(row, column.ordinal())?;
        out.push(column.name(), value);
    }
    Ok(out)
}

/// Decodes one cell. Catalog columns carry whatever type the vendor
/// chose, so each representation is tried in turn.
fn metadata_value(row: &AnyRow, index: usize) -> std::result::Result<MetadataValue, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(MetadataValue::Null);
    }
    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Ok(MetadataValue::Int(v));
    }
    if let Ok(v) = row.try_get::<i32, _>(index) {
        return Ok(MetadataValue::Int(i64::from(v)));
    }
    if let Ok(v) = row.try_get::<i16, _>(index) {
        return Ok(MetadataValue::Int(i64::from(v)));
    }
    if let Ok(v) = row.try_get::<bool, _>(index) {
        return Ok(MetadataValue::Bool(v));
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return Ok(MetadataValue::Float(v));
    }
    if let Ok(v) = row.try_get::<f32, _>(index) {
        return Ok(MetadataValue::Float(f64::from(v)));
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Ok(MetadataValue::Text(v));
    }
    row.try_get::<Vec<u8>, _>(index).map(MetadataValue::Bytes)
}
