#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use oxide_dialect::{DialectName, MetadataConnection, MetadataError, MetadataRow, MetadataValue, Result};

#[derive(Debug, Clone)]
enum Response {
    Rows(Vec<MetadataRow>),
    Reject(String),
    Fail(String),
}

/// A scripted connection. Queries are answered by the first registered
/// needle contained in the SQL text; anything else returns no rows.
#[derive(Debug)]
pub struct MockConnection {
    dialect: DialectName,
    url: String,
    responses: Vec<(String, Response)>,
    pub queries: Vec<String>,
    pub executed: Vec<String>,
}

static NEXT_DATABASE: AtomicUsize = AtomicUsize::new(0);

impl MockConnection {
    /// A connection with a URL no other test uses, so identifier rules
    /// shared per URL never leak between tests.
    pub fn new(dialect: DialectName) -> Self {
        let id = NEXT_DATABASE.fetch_add(1, Ordering::Relaxed);
        Self {
            dialect,
            url: format!("{}://mock/db{id}", dialect.name()),
            responses: Vec::new(),
            queries: Vec::new(),
            executed: Vec::new(),
        }
    }

    fn set(&mut self, needle: &str, response: Response) {
        match self.responses.iter_mut().find(|(n, _)| n == needle) {
            Some(slot) => slot.1 = response,
            None => self.responses.push((needle.to_string(), response)),
        }
    }

    /// Answers queries containing `needle` with `rows`, replacing any
    /// earlier answer for the same needle.
    pub fn respond(&mut self, needle: &str, rows: Vec<MetadataRow>) -> &mut Self {
        self.set(needle, Response::Rows(rows));
        self
    }

    /// Makes the server refuse queries containing `needle`.
    pub fn reject(&mut self, needle: &str) -> &mut Self {
        self.set(needle, Response::Reject("function not found".to_string()));
        self
    }

    /// Breaks the session on queries containing `needle`.
    pub fn fail(&mut self, needle: &str) -> &mut Self {
        self.set(needle, Response::Fail("connection reset by peer".to_string()));
        self
    }

    /// Number of issued queries containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.queries.iter().filter(|q| q.contains(needle)).count()
    }

    pub fn clear_log(&mut self) {
        self.queries.clear();
        self.executed.clear();
    }
}

#[async_trait]
impl MetadataConnection for MockConnection {
    fn dialect(&self) -> DialectName {
        self.dialect
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn query(&mut self, sql: &str) -> Result<Vec<MetadataRow>> {
        self.queries.push(sql.to_string());
        let response = self
            .responses
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
            .map(|(_, response)| response.clone());
        match response {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Reject(message)) => Err(MetadataError::rejected(sql, message)),
            Some(Response::Fail(message)) => Err(MetadataError::Connection(
                std::io::Error::new(std::io::ErrorKind::ConnectionReset, message).into(),
            )),
            None => Ok(Vec::new()),
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        self.executed.push(sql.to_string());
        Ok(0)
    }
}

pub fn text(value: &str) -> MetadataValue {
    MetadataValue::Text(value.to_string())
}

pub fn int(value: i64) -> MetadataValue {
    MetadataValue::Int(value)
}

pub fn null() -> MetadataValue {
    MetadataValue::Null
}

/// A row from `(column, value)` pairs.
pub fn row(columns: &[(&str, MetadataValue)]) -> MetadataRow {
    columns
        .iter()
        .map(|(name, value)| (*name, value.clone()))
        .collect()
}

/// One single-column row per name.
pub fn names(column: &str, values: &[&str]) -> Vec<MetadataRow> {
    values.iter().map(|v| row(&[(column, text(v))])).collect()
}

/// A column row as the catalog queries report it.
#[allow(clippy::too_many_arguments)]
pub fn column_row(
    table: &str,
    column: &str,
    data_type: i64,
    type_name: &str,
    nullable: bool,
    default: Option<&str>,
    auto_increment: bool,
    size: Option<i64>,
    position: i64,
) -> MetadataRow {
    row(&[
        ("TABLE_NAME", text(table)),
        ("COLUMN_NAME", text(column)),
        ("DATA_TYPE", int(data_type)),
        ("TYPE_NAME", text(type_name)),
        ("NULLABLE", int(i64::from(nullable))),
        ("COLUMN_DEF", default.map_or_else(null, text)),
        ("IS_AUTOINCREMENT", text(if auto_increment { "YES" } else { "NO" })),
        ("COLUMN_SIZE", size.map_or_else(null, int)),
        ("DECIMAL_DIGITS", null()),
        ("ORDINAL_POSITION", int(position)),
    ])
}

pub fn primary_key_row(table: &str, column: &str, seq: i64, name: &str) -> MetadataRow {
    row(&[
        ("TABLE_NAME", text(table)),
        ("COLUMN_NAME", text(column)),
        ("KEY_SEQ", int(seq)),
        ("PK_NAME", text(name)),
    ])
}

/// An imported-key row; rules use the reference codes (0 = CASCADE,
/// 3 = NO ACTION).
#[allow(clippy::too_many_arguments)]
pub fn foreign_key_row(
    from_table: &str,
    from_column: &str,
    target_table: &str,
    target_column: &str,
    name: &str,
    seq: i64,
    update_rule: i64,
    delete_rule: i64,
) -> MetadataRow {
    row(&[
        ("FKTABLE_NAME", text(from_table)),
        ("FKCOLUMN_NAME", text(from_column)),
        ("PKTABLE_NAME", text(target_table)),
        ("PKCOLUMN_NAME", text(target_column)),
        ("FK_NAME", text(name)),
        ("KEY_SEQ", int(seq)),
        ("UPDATE_RULE", int(update_rule)),
        ("DELETE_RULE", int(delete_rule)),
    ])
}

pub fn index_row(
    table: &str,
    index: &str,
    column: &str,
    unique: bool,
    filter: Option<&str>,
    primary_key: bool,
    position: i64,
) -> MetadataRow {
    row(&[
        ("TABLE_NAME", text(table)),
        ("INDEX_NAME", text(index)),
        ("COLUMN_NAME", text(column)),
        ("FUNCTION_EXPR", null()),
        ("NON_UNIQUE", int(i64::from(!unique))),
        ("INDEX_TYPE", null()),
        ("FILTER_CONDITION", filter.map_or_else(null, text)),
        ("PRIMARY_KEY", int(i64::from(primary_key))),
        ("ORDINAL_POSITION", int(position)),
    ])
}
