//! PostgreSQL DDL.

use crate::schema::SqlType;

use super::{ColumnModification, DdlDialect, IndexDefinition};

/// PostgreSQL grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDdl;

impl DdlDialect for PostgresDdl {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::SmallInt | SqlType::TinyInt => "SMALLINT".to_string(),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::DateTime | SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::TimestampTz => "TIMESTAMPTZ".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "FLOAT8".to_string(),
            SqlType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            SqlType::Numeric(p, s) => format!("NUMERIC({p}, {s})"),
            SqlType::Blob | SqlType::Binary(_) | SqlType::VarBinary(_) => "BYTEA".to_string(),
            SqlType::Json => "JSONB".to_string(),
            SqlType::Uuid => "UUID".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_type(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::BigInt => "BIGSERIAL".to_string(),
            SqlType::SmallInt | SqlType::TinyInt => "SMALLSERIAL".to_string(),
            _ => "SERIAL".to_string(),
        }
    }

    fn modify_column_sql(&self, m: &ColumnModification<'_>) -> Vec<String> {
        let prefix = format!("ALTER TABLE {} ALTER COLUMN {}", m.table, m.column);
        let mut statements = Vec::new();
        if m.change.type_changed {
            statements.push(format!("{prefix} TYPE {}", m.type_sql));
        }
        if m.change.nullability_changed {
            let action = if m.nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
            statements.push(format!("{prefix} {action}"));
        }
        if m.change.default_changed {
            statements.push(match m.default {
                Some(default) => format!("{prefix} SET DEFAULT {default}"),
                None => format!("{prefix} DROP DEFAULT"),
            });
        }
        statements
    }

    fn create_index_sql(&self, index: &IndexDefinition<'_>) -> String {
        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(&format!("INDEX {} ON {}", index.name, index.table));
        if let Some(method) = index.index_type {
            sql.push_str(&format!(" USING {method}"));
        }
        sql.push_str(&format!(" ({})", index.keys.join(", ")));
        if let Some(condition) = index.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        sql
    }

    fn drop_index_sql(&self, table: &str, index: &str) -> String {
        // Indices live in the table's schema.
        match table.rsplit_once('.') {
            Some((schema, _)) => format!("DROP INDEX {schema}.{index}"),
            None => format!("DROP INDEX {index}"),
        }
    }
}
