//! Vendor type registries and the catalog-to-canonical mapping.
//!
//! Vendor catalog views report column types as free text. Instead of
//! decoding that text row by row, the metadata queries carry the whole
//! lookup table inline as a `CASE` expression, so every row already holds
//! a numeric type code, a size and decoded reference-option codes.

use std::fmt::Write as _;

use crate::dialect::{DialectName, H2Mode};
use crate::types::{code, DataType, ReferenceOption, TypeRegistry};

const NUMERIC_PRECISION: &str = "NUMERIC_PRECISION";
const CHARACTER_LENGTH: &str = "CHARACTER_MAXIMUM_LENGTH";
const DATETIME_PRECISION: &str = "DATETIME_PRECISION";
const NO_PRECISION: &str = "NULL";

/// Type registry plus reference-option encoding of one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlTypeProvider {
    /// Canonical types with vendor overrides applied, then vendor-only types.
    pub types: TypeRegistry,
    /// Vendor encoding of referential rules as SQL literals (`'CASCADE'`,
    /// `'c'`, `1`, ...) paired with the option each one means.
    pub reference_encodings: Vec<(&'static str, ReferenceOption)>,
    /// Option assumed when a rule is absent or unrecognized.
    pub default_reference_option: ReferenceOption,
    /// `RESTRICT` is a distinct rule. When `false` it reads back as
    /// `NO ACTION`.
    pub supports_restrict: bool,
    /// `ON UPDATE` rules can be declared.
    pub supports_on_update: bool,
}

/// The canonical type set with ANSI information-schema size columns.
#[must_use]
pub fn canonical_types() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.extend([
        DataType::new("BIT", code::BIT, NUMERIC_PRECISION),
        DataType::new("TINYINT", code::TINYINT, NUMERIC_PRECISION),
        DataType::new("SMALLINT", code::SMALLINT, NUMERIC_PRECISION),
        DataType::new("INTEGER", code::INTEGER, NUMERIC_PRECISION),
        DataType::new("BIGINT", code::BIGINT, NUMERIC_PRECISION),
        DataType::new("FLOAT", code::FLOAT, NUMERIC_PRECISION),
        DataType::new("REAL", code::REAL, NUMERIC_PRECISION),
        DataType::new("DOUBLE", code::DOUBLE, NUMERIC_PRECISION),
        DataType::new("NUMERIC", code::NUMERIC, NUMERIC_PRECISION),
        DataType::new("DECIMAL", code::DECIMAL, NUMERIC_PRECISION),
        DataType::new("CHAR", code::CHAR, CHARACTER_LENGTH),
        DataType::new("VARCHAR", code::VARCHAR, CHARACTER_LENGTH),
        DataType::new("LONGVARCHAR", code::LONGVARCHAR, CHARACTER_LENGTH),
        DataType::new("DATE", code::DATE, NO_PRECISION),
        DataType::new("TIME", code::TIME, DATETIME_PRECISION),
        DataType::new("TIMESTAMP", code::TIMESTAMP, DATETIME_PRECISION),
        DataType::new("BINARY", code::BINARY, CHARACTER_LENGTH),
        DataType::new("VARBINARY", code::VARBINARY, CHARACTER_LENGTH),
        DataType::new("LONGVARBINARY", code::LONGVARBINARY, CHARACTER_LENGTH),
        DataType::new("NULL", code::NULL, NO_PRECISION),
        DataType::new("OTHER", code::OTHER, NO_PRECISION),
        DataType::new("JAVA_OBJECT", code::JAVA_OBJECT, NO_PRECISION),
        DataType::new("DISTINCT", code::DISTINCT, NO_PRECISION),
        DataType::new("STRUCT", code::STRUCT, NO_PRECISION),
        DataType::new("ARRAY", code::ARRAY, NO_PRECISION),
        DataType::new("BLOB", code::BLOB, CHARACTER_LENGTH),
        DataType::new("CLOB", code::CLOB, CHARACTER_LENGTH),
        DataType::new("REF", code::REF, NO_PRECISION),
        DataType::new("DATALINK", code::DATALINK, NO_PRECISION),
        DataType::new("BOOLEAN", code::BOOLEAN, NO_PRECISION),
        DataType::new("ROWID", code::ROWID, NO_PRECISION),
        DataType::new("NCHAR", code::NCHAR, CHARACTER_LENGTH),
        DataType::new("NVARCHAR", code::NVARCHAR, CHARACTER_LENGTH),
        DataType::new("LONGNVARCHAR", code::LONGNVARCHAR, CHARACTER_LENGTH),
        DataType::new("NCLOB", code::NCLOB, CHARACTER_LENGTH),
        DataType::new("SQLXML", code::SQLXML, NO_PRECISION),
        DataType::new("REF_CURSOR", code::REF_CURSOR, NO_PRECISION),
        DataType::new("TIME WITH TIME ZONE", code::TIME_WITH_TIMEZONE, DATETIME_PRECISION),
        DataType::new(
            "TIMESTAMP WITH TIME ZONE",
            code::TIMESTAMP_WITH_TIMEZONE,
            DATETIME_PRECISION,
        ),
    ]);
    registry
}

/// Wraps every size column in `CAST(... AS <target>)` so drivers read one
/// integer type regardless of the catalog column's declared type.
fn cast_precisions(types: &mut TypeRegistry, target: &str) {
    let casted: Vec<DataType> = types
        .iter()
        .filter(|t| t.precision != NO_PRECISION)
        .map(|t| {
            let precision = format!("CAST({} AS {target})", t.precision);
            t.clone().with_precision(precision)
        })
        .collect();
    types.extend(casted);
}

const WORD_ENCODINGS: [(&str, ReferenceOption); 5] = [
    ("'CASCADE'", ReferenceOption::Cascade),
    ("'RESTRICT'", ReferenceOption::Restrict),
    ("'SET NULL'", ReferenceOption::SetNull),
    ("'SET DEFAULT'", ReferenceOption::SetDefault),
    ("'NO ACTION'", ReferenceOption::NoAction),
];

const POSTGRES_ENCODINGS: [(&str, ReferenceOption); 5] = [
    ("'c'", ReferenceOption::Cascade),
    ("'r'", ReferenceOption::Restrict),
    ("'n'", ReferenceOption::SetNull),
    ("'d'", ReferenceOption::SetDefault),
    ("'a'", ReferenceOption::NoAction),
];

// sys.foreign_keys.*_referential_action
const SQLSERVER_ENCODINGS: [(&str, ReferenceOption); 4] = [
    ("0", ReferenceOption::NoAction),
    ("1", ReferenceOption::Cascade),
    ("2", ReferenceOption::SetNull),
    ("3", ReferenceOption::SetDefault),
];

impl SqlTypeProvider {
    fn ansi(types: TypeRegistry) -> Self {
        Self {
            types,
            reference_encodings: WORD_ENCODINGS.to_vec(),
            default_reference_option: ReferenceOption::NoAction,
            supports_restrict: true,
            supports_on_update: true,
        }
    }

    /// Type provider for the given dialect.
    #[must_use]
    pub fn for_dialect(dialect: DialectName) -> Self {
        match dialect {
            DialectName::H2(mode) => Self::h2(mode),
            DialectName::MySql => Self::mysql(),
            DialectName::MariaDb => {
                let mut provider = Self::mysql();
                provider.types.extend([
                    DataType::new("UUID", code::CHAR, NO_PRECISION),
                    DataType::new("INET6", code::CHAR, NO_PRECISION),
                ]);
                provider
            }
            DialectName::Oracle => Self::oracle(),
            DialectName::PostgreSql => Self::postgres(),
            DialectName::SqlServer => Self::sqlserver(),
            DialectName::Sqlite => Self::sqlite(),
        }
    }

    fn h2(mode: H2Mode) -> Self {
        let mut types = canonical_types();
        types.extend([
            DataType::new("CHARACTER VARYING", code::VARCHAR, CHARACTER_LENGTH),
            DataType::new("CHARACTER", code::CHAR, CHARACTER_LENGTH),
            DataType::new("CHARACTER LARGE OBJECT", code::CLOB, CHARACTER_LENGTH),
            DataType::new("BINARY VARYING", code::VARBINARY, CHARACTER_LENGTH),
            DataType::new("BINARY LARGE OBJECT", code::BLOB, CHARACTER_LENGTH),
            DataType::new("DOUBLE PRECISION", code::DOUBLE, NUMERIC_PRECISION),
            DataType::new("DECFLOAT", code::NUMERIC, NUMERIC_PRECISION),
            DataType::new("UUID", code::BINARY, NO_PRECISION),
            DataType::new("JSON", code::OTHER, CHARACTER_LENGTH),
            DataType::new("ENUM", code::OTHER, NO_PRECISION),
            DataType::new("GEOMETRY", code::OTHER, NO_PRECISION),
        ]);
        let restrict = !matches!(mode, H2Mode::Oracle | H2Mode::SqlServer);
        Self {
            default_reference_option: if matches!(mode, H2Mode::MySql | H2Mode::MariaDb) {
                ReferenceOption::Restrict
            } else {
                ReferenceOption::NoAction
            },
            supports_restrict: restrict,
            ..Self::ansi(types)
        }
    }

    fn mysql() -> Self {
        let mut types = canonical_types();
        types.extend([
            DataType::new("INT", code::INTEGER, NUMERIC_PRECISION),
            DataType::new("MEDIUMINT", code::INTEGER, NUMERIC_PRECISION),
            DataType::new("YEAR", code::DATE, NO_PRECISION),
            DataType::new("DATETIME", code::TIMESTAMP, DATETIME_PRECISION),
            DataType::new("TINYTEXT", code::VARCHAR, CHARACTER_LENGTH),
            DataType::new("TEXT", code::LONGVARCHAR, CHARACTER_LENGTH),
            DataType::new("MEDIUMTEXT", code::LONGVARCHAR, CHARACTER_LENGTH),
            DataType::new("LONGTEXT", code::LONGVARCHAR, CHARACTER_LENGTH),
            DataType::new("TINYBLOB", code::VARBINARY, CHARACTER_LENGTH),
            DataType::new("MEDIUMBLOB", code::LONGVARBINARY, CHARACTER_LENGTH),
            DataType::new("LONGBLOB", code::LONGVARBINARY, CHARACTER_LENGTH),
            DataType::new("JSON", code::LONGVARCHAR, CHARACTER_LENGTH),
            DataType::new("ENUM", code::CHAR, CHARACTER_LENGTH),
            DataType::new("SET", code::CHAR, CHARACTER_LENGTH),
            DataType::new("GEOMETRY", code::BINARY, NO_PRECISION),
        ]);
        cast_precisions(&mut types, "SIGNED");
        Self {
            default_reference_option: ReferenceOption::Restrict,
            ..Self::ansi(types)
        }
    }

    fn oracle() -> Self {
        let mut types = canonical_types();
        let overrides: Vec<DataType> = types
            .iter()
            .map(|t| match t.precision.as_str() {
                NUMERIC_PRECISION => t.clone().with_precision("DATA_PRECISION"),
                CHARACTER_LENGTH if t.name.contains("BINARY") => {
                    t.clone().with_precision("DATA_LENGTH")
                }
                CHARACTER_LENGTH => t.clone().with_precision("CHAR_LENGTH"),
                DATETIME_PRECISION => t.clone().with_precision("DATA_SCALE"),
                _ => t.clone(),
            })
            .collect();
        types.extend(overrides);
        types.extend([
            DataType::new("NUMBER", code::DECIMAL, "DATA_PRECISION"),
            DataType::new("VARCHAR2", code::VARCHAR, "CHAR_LENGTH"),
            DataType::new("NVARCHAR2", code::NVARCHAR, "CHAR_LENGTH"),
            DataType::new("RAW", code::VARBINARY, "DATA_LENGTH"),
            DataType::new("LONG RAW", code::LONGVARBINARY, NO_PRECISION),
            DataType::new("LONG", code::LONGVARCHAR, NO_PRECISION),
            DataType::new("BINARY_FLOAT", code::REAL, NO_PRECISION),
            DataType::new("BINARY_DOUBLE", code::DOUBLE, NO_PRECISION),
            DataType::new("DATE", code::TIMESTAMP, NO_PRECISION),
            DataType::new("TIMESTAMP WITH LOCAL TIME ZONE", code::TIMESTAMP, "DATA_SCALE"),
            DataType::new("XMLTYPE", code::SQLXML, NO_PRECISION),
            DataType::new("UROWID", code::ROWID, NO_PRECISION),
        ]);
        Self {
            supports_restrict: false,
            supports_on_update: false,
            ..Self::ansi(types)
        }
    }

    fn postgres() -> Self {
        let mut types = canonical_types();
        types.extend([
            DataType::new("BOOLEAN", code::BIT, NO_PRECISION),
            DataType::new("INT2", code::SMALLINT, NUMERIC_PRECISION),
            DataType::new("INT4", code::INTEGER, NUMERIC_PRECISION),
            DataType::new("INT8", code::BIGINT, NUMERIC_PRECISION),
            DataType::new("FLOAT4", code::REAL, NUMERIC_PRECISION),
            DataType::new("FLOAT8", code::DOUBLE, NUMERIC_PRECISION),
            DataType::new("BOOL", code::BIT, NO_PRECISION),
            DataType::new("BPCHAR", code::CHAR, CHARACTER_LENGTH),
            DataType::new("TEXT", code::VARCHAR, CHARACTER_LENGTH),
            DataType::new("NAME", code::VARCHAR, CHARACTER_LENGTH),
            DataType::new("BYTEA", code::BINARY, NO_PRECISION),
            DataType::new("TIMETZ", code::TIME_WITH_TIMEZONE, DATETIME_PRECISION),
            DataType::new("TIMESTAMPTZ", code::TIMESTAMP_WITH_TIMEZONE, DATETIME_PRECISION),
            DataType::new("JSON", code::OTHER, NO_PRECISION),
            DataType::new("JSONB", code::OTHER, NO_PRECISION),
            DataType::new("UUID", code::OTHER, NO_PRECISION),
            DataType::new("XML", code::SQLXML, NO_PRECISION),
            DataType::new("OID", code::BIGINT, NO_PRECISION),
            DataType::new("SERIAL", code::INTEGER, NUMERIC_PRECISION),
            DataType::new("BIGSERIAL", code::BIGINT, NUMERIC_PRECISION),
        ]);
        cast_precisions(&mut types, "INTEGER");
        Self {
            reference_encodings: POSTGRES_ENCODINGS.to_vec(),
            ..Self::ansi(types)
        }
    }

    fn sqlserver() -> Self {
        let mut types = canonical_types();
        types.extend([
            DataType::new("FLOAT", code::DOUBLE, NUMERIC_PRECISION),
            DataType::new("TIMESTAMP", code::BINARY, NO_PRECISION),
            DataType::new("INT", code::INTEGER, NUMERIC_PRECISION),
            DataType::new("MONEY", code::DECIMAL, NUMERIC_PRECISION),
            DataType::new("SMALLMONEY", code::DECIMAL, NUMERIC_PRECISION),
            DataType::new("DATETIME", code::TIMESTAMP, DATETIME_PRECISION),
            DataType::new("DATETIME2", code::TIMESTAMP, DATETIME_PRECISION),
            DataType::new("SMALLDATETIME", code::TIMESTAMP, DATETIME_PRECISION),
            DataType::new("DATETIMEOFFSET", code::TIMESTAMP_WITH_TIMEZONE, DATETIME_PRECISION),
            DataType::new("TEXT", code::LONGVARCHAR, CHARACTER_LENGTH),
            DataType::new("NTEXT", code::LONGNVARCHAR, CHARACTER_LENGTH),
            DataType::new("IMAGE", code::LONGVARBINARY, CHARACTER_LENGTH),
            DataType::new("UNIQUEIDENTIFIER", code::CHAR, NO_PRECISION),
            DataType::new("XML", code::SQLXML, NO_PRECISION),
            DataType::new("SYSNAME", code::NVARCHAR, CHARACTER_LENGTH),
            DataType::new("ROWVERSION", code::BINARY, NO_PRECISION),
        ]);
        Self {
            reference_encodings: SQLSERVER_ENCODINGS.to_vec(),
            supports_restrict: false,
            ..Self::ansi(types)
        }
    }

    fn sqlite() -> Self {
        let mut types = canonical_types();
        types.extend([
            DataType::new("INT", code::INTEGER, NO_PRECISION),
            DataType::new("TEXT", code::VARCHAR, NO_PRECISION),
            DataType::new("DATETIME", code::TIMESTAMP, NO_PRECISION),
            DataType::new("DOUBLE PRECISION", code::DOUBLE, NO_PRECISION),
        ]);
        Self::ansi(types)
    }

    /// Emits `CASE UPPER(<column_expr>) WHEN '<name>' THEN <code> ... ELSE
    /// <OTHER> END <alias>`, mapping catalog type names to type codes.
    pub fn append_data_types(&self, column_expr: &str, alias: &str, out: &mut String) {
        let _ = write!(out, "CASE UPPER({column_expr})");
        for t in self.types.iter() {
            let _ = write!(out, " WHEN '{}' THEN {}", t.name.to_ascii_uppercase(), t.code);
        }
        let _ = write!(out, " ELSE {} END {alias}", code::OTHER);
    }

    /// Emits `CASE UPPER(<column_expr>) WHEN '<name>' THEN <precision> ...
    /// ELSE NULL END <alias>`, selecting the catalog column holding each
    /// type's size.
    pub fn append_data_precisions(&self, column_expr: &str, alias: &str, out: &mut String) {
        let _ = write!(out, "CASE UPPER({column_expr})");
        for t in self.types.iter().filter(|t| t.precision != NO_PRECISION) {
            let _ = write!(
                out,
                " WHEN '{}' THEN {}",
                t.name.to_ascii_uppercase(),
                t.precision
            );
        }
        let _ = write!(out, " ELSE NULL END {alias}");
    }

    /// Emits `CASE <column_expr> WHEN <encoding> THEN <code> ... ELSE NULL
    /// END <alias>`, decoding the vendor's referential rule encoding.
    pub fn append_reference_options(&self, column_expr: &str, alias: &str, out: &mut String) {
        let _ = write!(out, "CASE {column_expr}");
        for (literal, option) in &self.reference_encodings {
            let _ = write!(out, " WHEN {literal} THEN {}", option.code());
        }
        let _ = write!(out, " ELSE NULL END {alias}");
    }

    /// Returns the `CASE` fragment produced by
    /// [`append_reference_options`](Self::append_reference_options).
    #[must_use]
    pub fn reference_options_case(&self, column_expr: &str, alias: &str) -> String {
        let mut out = String::new();
        self.append_reference_options(column_expr, alias, &mut out);
        out
    }

    /// Returns the `CASE` fragment produced by
    /// [`append_data_types`](Self::append_data_types).
    #[must_use]
    pub fn data_types_case(&self, column_expr: &str, alias: &str) -> String {
        let mut out = String::new();
        self.append_data_types(column_expr, alias, &mut out);
        out
    }

    /// Returns the `CASE` fragment produced by
    /// [`append_data_precisions`](Self::append_data_precisions).
    #[must_use]
    pub fn data_precisions_case(&self, column_expr: &str, alias: &str) -> String {
        let mut out = String::new();
        self.append_data_precisions(column_expr, alias, &mut out);
        out
    }

    /// Type code for a catalog type name, as the generated `CASE` would
    /// compute it.
    #[must_use]
    pub fn type_code(&self, type_name: &str) -> i32 {
        self.types
            .get(type_name.trim())
            .map_or(code::OTHER, |t| t.code)
    }

    /// Decodes a rule code read back from a metadata row.
    ///
    /// Missing or unknown codes fall back to the vendor default; `RESTRICT`
    /// reads back as `NO ACTION` where the vendor cannot express it.
    #[must_use]
    pub fn resolve_reference_option(&self, code: Option<i64>) -> ReferenceOption {
        let option = code
            .and_then(ReferenceOption::from_code)
            .unwrap_or(self.default_reference_option);
        if option == ReferenceOption::Restrict && !self.supports_restrict {
            ReferenceOption::NoAction
        } else {
            option
        }
    }

    /// The rule a declared option will read back as once created.
    #[must_use]
    pub fn effective_reference_option(&self, declared: Option<ReferenceOption>) -> ReferenceOption {
        self.resolve_reference_option(declared.map(ReferenceOption::code))
    }
}
