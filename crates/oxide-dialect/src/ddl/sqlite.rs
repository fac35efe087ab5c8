//! SQLite DDL.
//!
//! SQLite cannot alter existing columns or add constraints to existing
//! tables, so such changes surface as reconciliation warnings. Foreign keys
//! are always declared inline.

use crate::schema::SqlType;

use super::DdlDialect;

/// SQLite grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDdl;

impl DdlDialect for SqliteDdl {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Integer
            | SqlType::SmallInt
            | SqlType::TinyInt
            | SqlType::BigInt
            | SqlType::Boolean => "INTEGER".to_string(),
            SqlType::Text
            | SqlType::Varchar(_)
            | SqlType::Char(_)
            | SqlType::DateTime
            | SqlType::Timestamp
            | SqlType::TimestampTz
            | SqlType::Date
            | SqlType::Time
            | SqlType::Json
            | SqlType::Uuid => "TEXT".to_string(),
            SqlType::Real | SqlType::Double => "REAL".to_string(),
            SqlType::Decimal(_, _) | SqlType::Numeric(_, _) => "NUMERIC".to_string(),
            SqlType::Blob | SqlType::Binary(_) | SqlType::VarBinary(_) => "BLOB".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_type(&self, sql_type: &SqlType) -> String {
        self.type_name(sql_type)
    }

    fn inline_auto_increment_key(&self) -> Option<&'static str> {
        Some("AUTOINCREMENT")
    }

    fn supports_alter_column(&self) -> bool {
        false
    }

    fn supports_default_change(&self) -> bool {
        false
    }

    fn supports_add_constraint(&self) -> bool {
        false
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn modify_column_sql(&self, _m: &super::ColumnModification<'_>) -> Vec<String> {
        Vec::new()
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn create_schema_sql(&self, _schema: &str) -> Option<String> {
        None
    }
}
