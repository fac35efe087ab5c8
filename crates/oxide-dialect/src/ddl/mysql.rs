//! MySQL and MariaDB DDL.

use crate::schema::SqlType;

use super::{ColumnModification, DdlDialect, IndexDefinition};

/// MySQL grammar, also used for MariaDB.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDdl;

impl DdlDialect for MySqlDdl {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Integer => "INT".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::TinyInt => "TINYINT".to_string(),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::DateTime | SqlType::TimestampTz => "DATETIME".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::Real => "FLOAT".to_string(),
            SqlType::Double => "DOUBLE".to_string(),
            SqlType::Decimal(p, s) | SqlType::Numeric(p, s) => format!("DECIMAL({p}, {s})"),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Binary(n) => format!("BINARY({n})"),
            SqlType::VarBinary(n) => format!("VARBINARY({n})"),
            SqlType::Json => "JSON".to_string(),
            SqlType::Uuid => "CHAR(36)".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_type(&self, sql_type: &SqlType) -> String {
        format!("{} AUTO_INCREMENT", self.type_name(sql_type))
    }

    fn supports_partial_indexes(&self) -> bool {
        false
    }

    fn modify_column_sql(&self, m: &ColumnModification<'_>) -> Vec<String> {
        if !m.change.any() {
            return Vec::new();
        }
        let mut sql = format!("ALTER TABLE {} MODIFY COLUMN {} {}", m.table, m.column, m.type_sql);
        sql.push_str(if m.nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = m.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        vec![sql]
    }

    fn create_index_sql(&self, index: &IndexDefinition<'_>) -> String {
        let mut sql = String::from("CREATE ");
        if index.unique {
            sql.push_str("UNIQUE ");
        }
        // Functional key parts need their own parentheses.
        let keys: Vec<String> = index
            .keys
            .iter()
            .map(|key| {
                if key.contains('(') && !key.starts_with('(') {
                    format!("({key})")
                } else {
                    key.clone()
                }
            })
            .collect();
        sql.push_str(&format!("INDEX {} ON {} ({})", index.name, index.table, keys.join(", ")));
        if let Some(method) = index.index_type {
            sql.push_str(&format!(" USING {method}"));
        }
        sql
    }

    fn drop_index_sql(&self, table: &str, index: &str) -> String {
        format!("ALTER TABLE {table} DROP INDEX {index}")
    }

    fn drop_foreign_key_sql(&self, table: &str, name: &str) -> String {
        format!("ALTER TABLE {table} DROP FOREIGN KEY {name}")
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }
}
