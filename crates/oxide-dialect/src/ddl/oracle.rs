//! Oracle DDL.
//!
//! Oracle has no `ON UPDATE` clause and only two spellable delete actions;
//! a declared `NO ACTION`, `RESTRICT` or `SET DEFAULT` is left to the
//! vendor default.

use crate::schema::SqlType;
use crate::types::ReferenceOption;

use super::{ColumnModification, DdlDialect};

/// Oracle grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDdl;

impl DdlDialect for OracleDdl {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Integer => "NUMBER(10)".to_string(),
            SqlType::BigInt => "NUMBER(19)".to_string(),
            SqlType::SmallInt => "NUMBER(5)".to_string(),
            SqlType::TinyInt => "NUMBER(3)".to_string(),
            SqlType::Boolean => "NUMBER(1)".to_string(),
            SqlType::Text | SqlType::Json => "CLOB".to_string(),
            SqlType::Varchar(n) => format!("VARCHAR2({n} CHAR)"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::DateTime | SqlType::Timestamp | SqlType::Time => "TIMESTAMP".to_string(),
            SqlType::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Real => "BINARY_FLOAT".to_string(),
            SqlType::Double => "BINARY_DOUBLE".to_string(),
            SqlType::Decimal(p, s) | SqlType::Numeric(p, s) => format!("NUMBER({p}, {s})"),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Binary(n) | SqlType::VarBinary(n) => format!("RAW({n})"),
            SqlType::Uuid => "RAW(16)".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_type(&self, sql_type: &SqlType) -> String {
        format!(
            "{} GENERATED BY DEFAULT ON NULL AS IDENTITY",
            self.type_name(sql_type)
        )
    }

    fn supports_partial_indexes(&self) -> bool {
        false
    }

    fn add_column_keyword(&self) -> &'static str {
        "ADD"
    }

    fn modify_column_sql(&self, m: &ColumnModification<'_>) -> Vec<String> {
        let prefix = format!("ALTER TABLE {} MODIFY ({}", m.table, m.column);
        let mut statements = Vec::new();
        if m.change.type_changed {
            statements.push(format!("{prefix} {})", m.type_sql));
        }
        if m.change.nullability_changed {
            let action = if m.nullable { "NULL" } else { "NOT NULL" };
            statements.push(format!("{prefix} {action})"));
        }
        if m.change.default_changed {
            statements.push(format!("{prefix} DEFAULT {})", m.default.unwrap_or("NULL")));
        }
        statements
    }

    fn reference_option_sql(&self, option: ReferenceOption) -> Option<&'static str> {
        match option {
            ReferenceOption::Cascade | ReferenceOption::SetNull => Some(option.as_sql()),
            ReferenceOption::NoAction | ReferenceOption::Restrict | ReferenceOption::SetDefault => {
                None
            }
        }
    }

    fn create_schema_sql(&self, schema: &str) -> Option<String> {
        Some(format!("CREATE USER {schema} NO AUTHENTICATION"))
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn no_cycle_keyword(&self) -> &'static str {
        "NOCYCLE"
    }
}
