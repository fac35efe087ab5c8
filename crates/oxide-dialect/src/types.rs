//! SQL type descriptors and reference options.
//!
//! Type codes follow the JDBC `java.sql.Types` numbering, which is the
//! lingua franca of vendor metadata views and the value space the inlined
//! `CASE` expressions decode into.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric type codes shared by every vendor.
pub mod code {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const DISTINCT: i32 = 2001;
    pub const STRUCT: i32 = 2002;
    pub const ARRAY: i32 = 2003;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const REF: i32 = 2006;
    pub const DATALINK: i32 = 70;
    pub const BOOLEAN: i32 = 16;
    pub const ROWID: i32 = -8;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
    pub const NCLOB: i32 = 2011;
    pub const SQLXML: i32 = 2009;
    pub const REF_CURSOR: i32 = 2012;
    pub const TIME_WITH_TIMEZONE: i32 = 2013;
    pub const TIMESTAMP_WITH_TIMEZONE: i32 = 2014;
}

/// One vendor SQL type: its name as the catalog reports it, its numeric
/// type code and the catalog column holding its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    /// Type name, matched case-insensitively against catalog output.
    pub name: String,
    /// Numeric type code.
    pub code: i32,
    /// Catalog column (or expression) yielding the type's size, e.g.
    /// `CHARACTER_MAXIMUM_LENGTH`. `NULL` when the type has no size.
    pub precision: String,
}

impl DataType {
    /// Creates a type descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, code: i32, precision: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code,
            precision: precision.into(),
        }
    }

    /// Returns a copy with a different type code.
    #[must_use]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    /// Returns a copy with a different precision expression.
    #[must_use]
    pub fn with_precision(mut self, precision: impl Into<String>) -> Self {
        self.precision = precision.into();
        self
    }
}

/// Ordered registry of vendor types keyed by type name.
///
/// Inserting a type whose name is already present replaces the existing
/// entry in place, which is how a vendor overrides a canonical type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types: Vec<DataType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a type by name.
    pub fn insert(&mut self, data_type: DataType) {
        match self
            .types
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&data_type.name))
        {
            Some(existing) => *existing = data_type,
            None => self.types.push(data_type),
        }
    }

    /// Inserts every type from `types`, replacing same-named entries.
    pub fn extend(&mut self, types: impl IntoIterator<Item = DataType>) {
        for t in types {
            self.insert(t);
        }
    }

    /// Looks up a type by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Iterates over the types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DataType> {
        self.types.iter()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Referential action attached to a foreign key (`ON UPDATE` / `ON DELETE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceOption {
    /// Propagate the change to referencing rows.
    Cascade,
    /// Reject the change immediately.
    Restrict,
    /// Set referencing columns to NULL.
    SetNull,
    /// Set referencing columns to their defaults.
    SetDefault,
    /// Reject the change at the end of the statement.
    NoAction,
}

impl ReferenceOption {
    /// All options, in code order.
    pub const ALL: [Self; 5] = [
        Self::Cascade,
        Self::Restrict,
        Self::SetNull,
        Self::NoAction,
        Self::SetDefault,
    ];

    /// Returns the SQL keyword(s) for this option.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::NoAction => "NO ACTION",
        }
    }

    /// Returns the numeric code used by decoded metadata rows.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Cascade => 0,
            Self::Restrict => 1,
            Self::SetNull => 2,
            Self::NoAction => 3,
            Self::SetDefault => 4,
        }
    }

    /// Maps a numeric code back to an option.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.code() == code)
    }
}

impl fmt::Display for ReferenceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
