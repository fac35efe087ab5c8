//! Typed metadata records read from a live database, plus session and cache
//! configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ReferenceOption;

/// A table name, optionally qualified by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableRef {
    /// Explicit schema, `None` for the current schema.
    pub schema: Option<String>,
    /// Table name as declared.
    pub name: String,
}

impl TableRef {
    /// An unqualified table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// A schema-qualified table.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Parses `schema.table` or `table`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.rsplit_once('.') {
            Some((schema, name)) if !schema.is_empty() => Self::qualified(schema, name),
            _ => Self::new(value),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One live column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Numeric type code decoded by the vendor's type `CASE`.
    pub sql_type: i32,
    /// Type name as the catalog reports it.
    pub type_name: String,
    pub nullable: bool,
    /// Default expression as stored by the database.
    pub default_value: Option<String>,
    pub auto_increment: bool,
    /// Length or precision.
    pub size: Option<i64>,
    /// Fractional digits.
    pub scale: Option<i64>,
}

/// A live (or to-be-created) index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub table: String,
    /// Indexed columns in key order.
    pub columns: Vec<String>,
    pub unique: bool,
    /// Vendor index type (`BTREE`, `HASH`, `NONCLUSTERED`, ...).
    pub index_type: Option<String>,
    /// Predicate of a partial index, verbatim.
    pub filter_condition: Option<String>,
    /// Expressions of a function-based index, in key order.
    pub function_expressions: Vec<String>,
}

impl Index {
    /// Returns `true` for a partial (filtered) index.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.filter_condition.is_some()
    }

    /// Returns `true` for an index with at least one expression key.
    #[must_use]
    pub fn is_functional(&self) -> bool {
        !self.function_expressions.is_empty()
    }
}

/// A live primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyMetadata {
    pub name: String,
    /// Key columns in key order.
    pub column_names: Vec<String>,
}

/// One column pair of a foreign key and its position in the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnReference {
    /// 1-based position within the constraint.
    pub position: i64,
    /// Referencing column.
    pub from: String,
    /// Referenced column.
    pub target: String,
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    pub name: String,
    pub from_table: String,
    pub target_table: String,
    /// Column pairs, always sorted by position.
    pub references: Vec<ColumnReference>,
    pub on_update: Option<ReferenceOption>,
    pub on_delete: Option<ReferenceOption>,
}

impl ForeignKeyConstraint {
    /// A single-column constraint at position 1.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_table: from_table.into(),
            target_table: target_table.into(),
            references: vec![ColumnReference {
                position: 1,
                from: from_column.into(),
                target: target_column.into(),
            }],
            on_update: None,
            on_delete: None,
        }
    }

    /// Merges the column pairs of `other` into this constraint.
    ///
    /// Pairs are ordered by position regardless of which side they came
    /// from, so combining is associative and commutative. Rules already set
    /// on `self` win.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.references.extend(other.references);
        self.references.sort();
        self.references.dedup();
        self.on_update = self.on_update.or(other.on_update);
        self.on_delete = self.on_delete.or(other.on_delete);
        self
    }

    /// Referencing columns in key order.
    #[must_use]
    pub fn from_columns(&self) -> Vec<&str> {
        self.references.iter().map(|r| r.from.as_str()).collect()
    }

    /// Referenced columns in key order.
    #[must_use]
    pub fn target_columns(&self) -> Vec<&str> {
        self.references.iter().map(|r| r.target.as_str()).collect()
    }
}

/// Groups foreign keys by referencing table and referencing columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintKey {
    pub table: TableRef,
    /// Declared referencing column names, in key order.
    pub columns: Vec<String>,
}

/// A live sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub start_with: Option<i64>,
    pub increment_by: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub cycle: Option<bool>,
    pub cache: Option<i64>,
}

impl Sequence {
    /// A sequence with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_with: None,
            increment_by: None,
            min_value: None,
            max_value: None,
            cycle: None,
            cache: None,
        }
    }
}

/// Snapshot of the current schema and its tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub current_schema_name: String,
    pub table_names: Vec<String>,
}

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// SQL spelling of the level.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// Per-connection settings applied through vendor statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub isolation: Option<IsolationLevel>,
    pub read_only: bool,
    /// Owned by the connection; recorded only.
    pub autocommit: Option<bool>,
}

/// How long cached metadata stays valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLifetime {
    /// Until an explicit reset.
    #[default]
    Connection,
    /// Until the end of the current reconciliation pass.
    Pass,
}

impl std::str::FromStr for CacheLifetime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "connection" => Ok(Self::Connection),
            "pass" => Ok(Self::Pass),
            other => Err(format!("unknown cache lifetime: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(position: i64, from: &str, target: &str) -> ForeignKeyConstraint {
        let mut fk = ForeignKeyConstraint::new("fk_order_line", "order_line", from, "orders", target);
        fk.references[0].position = position;
        fk
    }

    #[test]
    fn combine_orders_by_position() {
        let a = pair(2, "order_no", "no");
        let b = pair(1, "order_region", "region");

        let ab = a.clone().combine(b.clone());
        let ba = b.combine(a);

        assert_eq!(ab, ba);
        assert_eq!(ab.from_columns(), vec!["order_region", "order_no"]);
        assert_eq!(ab.target_columns(), vec!["region", "no"]);
    }

    #[test]
    fn combine_is_associative() {
        let a = pair(1, "a", "x");
        let b = pair(2, "b", "y");
        let c = pair(3, "c", "z");
        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);
        assert_eq!(left.references.len(), 3);
    }

    #[test]
    fn combine_keeps_first_rules() {
        let mut a = pair(1, "a", "x");
        a.on_delete = Some(ReferenceOption::Cascade);
        let mut b = pair(2, "b", "y");
        b.on_delete = Some(ReferenceOption::Cascade);
        b.on_update = Some(ReferenceOption::NoAction);
        let merged = a.combine(b);
        assert_eq!(merged.on_delete, Some(ReferenceOption::Cascade));
        assert_eq!(merged.on_update, Some(ReferenceOption::NoAction));
    }

    #[test]
    fn table_ref_parse() {
        assert_eq!(TableRef::parse("app.users"), TableRef::qualified("app", "users"));
        assert_eq!(TableRef::parse("users"), TableRef::new("users"));
        assert_eq!(TableRef::qualified("app", "users").to_string(), "app.users");
    }

    #[test]
    fn cache_lifetime_from_str() {
        assert_eq!("pass".parse::<CacheLifetime>().unwrap(), CacheLifetime::Pass);
        assert_eq!(CacheLifetime::default(), CacheLifetime::Connection);
        assert!("forever".parse::<CacheLifetime>().is_err());
    }
}
