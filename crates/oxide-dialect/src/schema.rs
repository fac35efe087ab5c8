//! Declared schema model.
//!
//! These types describe what the application expects the database to look
//! like. The reconciler compares them against live metadata and renders the
//! missing pieces through [`crate::ddl`]. Everything is `serde`-serializable
//! so a model can be loaded from a JSON document.

use serde::{Deserialize, Serialize};

use crate::model::TableRef;
use crate::types::{code, ReferenceOption};

/// Declared column types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Small integer (16-bit).
    SmallInt,
    /// Tiny integer (8-bit).
    TinyInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string.
    Varchar(usize),
    /// Fixed-length character string.
    Char(usize),
    /// Boolean.
    Boolean,
    /// Date and time.
    DateTime,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Timestamp.
    Timestamp,
    /// Timestamp with time zone.
    TimestampTz,
    /// Floating point (single precision).
    Real,
    /// Floating point (double precision).
    Double,
    /// Decimal with precision and scale.
    Decimal(u8, u8),
    /// Numeric (alias for Decimal).
    Numeric(u8, u8),
    /// Binary large object.
    Blob,
    /// Fixed-length binary data.
    Binary(usize),
    /// Variable-length binary data.
    VarBinary(usize),
    /// JSON data.
    Json,
    /// UUID.
    Uuid,
    /// A vendor type rendered verbatim.
    Custom(String),
}

impl SqlType {
    /// Canonical numeric type code of the declared type.
    #[must_use]
    pub fn type_code(&self) -> i32 {
        match self {
            Self::Integer => code::INTEGER,
            Self::BigInt => code::BIGINT,
            Self::SmallInt => code::SMALLINT,
            Self::TinyInt => code::TINYINT,
            Self::Text => code::LONGVARCHAR,
            Self::Varchar(_) => code::VARCHAR,
            Self::Char(_) => code::CHAR,
            Self::Boolean => code::BOOLEAN,
            Self::DateTime | Self::Timestamp => code::TIMESTAMP,
            Self::TimestampTz => code::TIMESTAMP_WITH_TIMEZONE,
            Self::Date => code::DATE,
            Self::Time => code::TIME,
            Self::Real => code::REAL,
            Self::Double => code::DOUBLE,
            Self::Decimal(_, _) => code::DECIMAL,
            Self::Numeric(_, _) => code::NUMERIC,
            Self::Blob => code::BLOB,
            Self::Binary(_) => code::BINARY,
            Self::VarBinary(_) => code::VARBINARY,
            Self::Json | Self::Uuid | Self::Custom(_) => code::OTHER,
        }
    }

    /// Declared length or precision, if the type carries one.
    #[must_use]
    pub fn size(&self) -> Option<i64> {
        match self {
            Self::Varchar(n) | Self::Char(n) | Self::Binary(n) | Self::VarBinary(n) => {
                i64::try_from(*n).ok()
            }
            Self::Decimal(p, _) | Self::Numeric(p, _) => Some(i64::from(*p)),
            _ => None,
        }
    }
}

/// Default value for a column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// No default value.
    #[default]
    None,
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// SQL expression (e.g., "CURRENT_TIMESTAMP").
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of this default value.
    #[must_use]
    pub fn to_sql(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Null => Some("NULL".to_string()),
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
            Self::Expression(expr) => Some(expr.clone()),
        }
    }
}

/// Schema definition for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// SQL data type.
    pub sql_type: SqlType,
    /// Whether the column allows NULL values.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value.
    #[serde(default)]
    pub default: DefaultValue,
    /// Whether this column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether this column auto-increments.
    #[serde(default)]
    pub auto_increment: bool,
    /// Whether this column has a UNIQUE constraint.
    #[serde(default)]
    pub unique: bool,
    /// Check constraint expression (if any).
    #[serde(default)]
    pub check: Option<String>,
}

const fn default_nullable() -> bool {
    true
}

impl ColumnSchema {
    /// Creates a new column schema.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
            default: DefaultValue::None,
            primary_key: false,
            auto_increment: false,
            unique: false,
            check: None,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Sets the column as the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Sets the column as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets a check constraint.
    #[must_use]
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.check = Some(expr.into());
        self
    }
}

/// Schema definition for a foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeySchema {
    /// Constraint name.
    pub name: String,
    /// Column(s) in the referencing table.
    pub columns: Vec<String>,
    /// Referenced table, `schema.table` when qualified.
    pub references_table: String,
    /// Referenced column(s).
    pub references_columns: Vec<String>,
    /// Action on delete; `None` leaves the vendor default.
    #[serde(default)]
    pub on_delete: Option<ReferenceOption>,
    /// Action on update; `None` leaves the vendor default.
    #[serde(default)]
    pub on_update: Option<ReferenceOption>,
}

impl ForeignKeySchema {
    /// Creates a foreign key with vendor-default rules.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        references_table: impl Into<String>,
        references_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            columns,
            references_table: references_table.into(),
            references_columns,
            on_delete: None,
            on_update: None,
        }
    }

    /// Sets the ON DELETE rule.
    #[must_use]
    pub fn on_delete(mut self, option: ReferenceOption) -> Self {
        self.on_delete = Some(option);
        self
    }

    /// Sets the ON UPDATE rule.
    #[must_use]
    pub fn on_update(mut self, option: ReferenceOption) -> Self {
        self.on_update = Some(option);
        self
    }

    /// The referenced table.
    #[must_use]
    pub fn target(&self) -> TableRef {
        TableRef::parse(&self.references_table)
    }
}

/// Schema definition for an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSchema {
    /// Index name.
    pub name: String,
    /// Columns included in the index.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    #[serde(default)]
    pub unique: bool,
    /// Partial index condition (WHERE clause).
    #[serde(default)]
    pub condition: Option<String>,
    /// Expression keys of a function-based index.
    #[serde(default)]
    pub functions: Vec<String>,
    /// Vendor index type (`HASH`, `BTREE`, ...).
    #[serde(default)]
    pub index_type: Option<String>,
}

impl IndexSchema {
    /// Creates an index over `columns`.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
            condition: None,
            functions: Vec::new(),
            index_type: None,
        }
    }

    /// Makes the index unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Restricts the index to rows matching `condition`.
    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Adds an expression key.
    #[must_use]
    pub fn function(mut self, expr: impl Into<String>) -> Self {
        self.functions.push(expr.into());
        self
    }

    /// Sets the vendor index type.
    #[must_use]
    pub fn index_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = Some(index_type.into());
        self
    }
}

/// Schema definition for a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceSchema {
    pub name: String,
    #[serde(default)]
    pub start_with: Option<i64>,
    #[serde(default)]
    pub increment_by: Option<i64>,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub cycle: bool,
    #[serde(default)]
    pub cache: Option<i64>,
}

impl SequenceSchema {
    /// Creates a sequence with vendor defaults.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_with: None,
            increment_by: None,
            min_value: None,
            max_value: None,
            cycle: false,
            cache: None,
        }
    }

    /// Sets the first value.
    #[must_use]
    pub fn start_with(mut self, value: i64) -> Self {
        self.start_with = Some(value);
        self
    }

    /// Sets the increment.
    #[must_use]
    pub fn increment_by(mut self, value: i64) -> Self {
        self.increment_by = Some(value);
        self
    }
}

/// Complete schema definition for a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Schema the table lives in; `None` for the current schema.
    #[serde(default)]
    pub schema: Option<String>,
    /// Column definitions.
    pub columns: Vec<ColumnSchema>,
    /// Primary key column(s).
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Index definitions.
    #[serde(default)]
    pub indexes: Vec<IndexSchema>,
    /// Foreign key definitions.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySchema>,
}

impl TableSchema {
    /// Creates a new table schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Places the table in `schema`.
    #[must_use]
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, column: ColumnSchema) -> Self {
        if column.primary_key && !self.primary_key.contains(&column.name) {
            self.primary_key.push(column.name.clone());
        }
        self.columns.push(column);
        self
    }

    /// Sets the primary key columns.
    #[must_use]
    pub fn primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: IndexSchema) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKeySchema) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Gets a column by name, ignoring case.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The table's identity.
    #[must_use]
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// Primary key columns, whether declared on the table or on columns.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&str> {
        if self.primary_key.is_empty() {
            self.columns
                .iter()
                .filter(|c| c.primary_key)
                .map(|c| c.name.as_str())
                .collect()
        } else {
            self.primary_key.iter().map(String::as_str).collect()
        }
    }
}

/// The complete declared schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    /// All tables.
    #[serde(default)]
    pub tables: Vec<TableSchema>,
    /// Standalone sequences.
    #[serde(default)]
    pub sequences: Vec<SequenceSchema>,
}

impl DatabaseSchema {
    /// Creates a new empty database schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table to the schema.
    #[must_use]
    pub fn table(mut self, table: TableSchema) -> Self {
        self.tables.push(table);
        self
    }

    /// Adds a sequence.
    #[must_use]
    pub fn sequence(mut self, sequence: SequenceSchema) -> Self {
        self.sequences.push(sequence);
        self
    }

    /// Gets a table by name, ignoring case.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Distinct explicit schemas referenced by tables, in declaration order.
    #[must_use]
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for schema in self.tables.iter().filter_map(|t| t.schema.as_deref()) {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(schema)) {
                names.push(schema);
            }
        }
        names
    }
}
