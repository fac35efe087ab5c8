//! The connection seam.
//!
//! The metadata engine never owns a connection. Every operation borrows a
//! [`MetadataConnection`] from the caller, issues plain SQL text through it
//! and reads back untyped [`MetadataRow`]s.

use async_trait::async_trait;

use crate::dialect::DialectName;
use crate::error::{MetadataError, Result};

/// A single value read from a metadata query.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl MetadataValue {
    /// Returns `true` for SQL NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn as_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Null | Self::Bytes(_) => None,
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            Self::Float(f) => Some(*f as i64),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Null | Self::Bytes(_) => None,
            Self::Bool(b) => Some(*b),
            Self::Int(i) => Some(*i != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                "YES" | "Y" | "TRUE" | "T" | "1" => Some(true),
                "NO" | "N" | "FALSE" | "F" | "0" | "" => Some(false),
                _ => None,
            },
        }
    }
}

/// One row of a metadata query. Column lookup is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRow {
    columns: Vec<(String, MetadataValue)>,
}

impl MetadataRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    #[must_use]
    pub fn with(mut self, name: &str, value: MetadataValue) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a column.
    pub fn push(&mut self, name: &str, value: MetadataValue) {
        self.columns.push((name.to_ascii_uppercase(), value));
    }

    /// Raw value of a column; `None` if the row has no such column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetadataValue> {
        self.columns
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Column as text, `None` when NULL or absent.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(MetadataValue::as_string)
    }

    /// Column as an integer, `None` when NULL, absent or not numeric.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(MetadataValue::as_i64)
    }

    /// Column as a boolean (`YES`/`NO`, `1`/`0`, `true`/`false`).
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(MetadataValue::as_bool)
    }

    /// Column as text, failing with [`MetadataError::MissingColumn`] when the
    /// value is NULL or absent.
    pub fn require_string(&self, query: &'static str, column: &'static str) -> Result<String> {
        self.string(column)
            .ok_or(MetadataError::MissingColumn { query, column })
    }

    /// Number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, MetadataValue)> for MetadataRow {
    fn from_iter<I: IntoIterator<Item = (S, MetadataValue)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (name, value) in iter {
            let name: String = name.into();
            row.push(&name, value);
        }
        row
    }
}

/// A live database session as seen by the metadata engine.
///
/// Implementations map driver errors into [`MetadataError::Rejected`] when
/// the server refused the statement and [`MetadataError::Connection`] when
/// the session itself failed.
#[async_trait]
pub trait MetadataConnection: Send {
    /// The dialect of the connected database.
    fn dialect(&self) -> DialectName;

    /// The connection URL, used as the key of shared per-URL state.
    fn url(&self) -> &str;

    /// Runs a query and collects every row.
    async fn query(&mut self, sql: &str) -> Result<Vec<MetadataRow>>;

    /// Runs a statement and returns the number of affected rows.
    async fn execute(&mut self, sql: &str) -> Result<u64>;
}
