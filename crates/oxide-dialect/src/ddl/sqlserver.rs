//! SQL Server DDL.
//!
//! Defaults are named constraints in SQL Server, so a changed default is
//! reported rather than rewritten.

use crate::schema::SqlType;

use super::{ColumnModification, DdlDialect};

/// SQL Server grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDdl;

impl DdlDialect for SqlServerDdl {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Integer => "INT".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::SmallInt => "SMALLINT".to_string(),
            SqlType::TinyInt => "TINYINT".to_string(),
            SqlType::Text | SqlType::Json => "NVARCHAR(MAX)".to_string(),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Char(n) => format!("CHAR({n})"),
            SqlType::Boolean => "BIT".to_string(),
            SqlType::DateTime | SqlType::Timestamp => "DATETIME2".to_string(),
            SqlType::TimestampTz => "DATETIMEOFFSET".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Time => "TIME".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "FLOAT".to_string(),
            SqlType::Decimal(p, s) => format!("DECIMAL({p}, {s})"),
            SqlType::Numeric(p, s) => format!("NUMERIC({p}, {s})"),
            SqlType::Blob => "VARBINARY(MAX)".to_string(),
            SqlType::Binary(n) => format!("BINARY({n})"),
            SqlType::VarBinary(n) => format!("VARBINARY({n})"),
            SqlType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_type(&self, sql_type: &SqlType) -> String {
        format!("{} IDENTITY(1,1)", self.type_name(sql_type))
    }

    fn supports_default_change(&self) -> bool {
        false
    }

    fn add_column_keyword(&self) -> &'static str {
        "ADD"
    }

    fn modify_column_sql(&self, m: &ColumnModification<'_>) -> Vec<String> {
        if !(m.change.type_changed || m.change.nullability_changed) {
            return Vec::new();
        }
        let nullability = if m.nullable { "NULL" } else { "NOT NULL" };
        vec![format!(
            "ALTER TABLE {} ALTER COLUMN {} {} {nullability}",
            m.table, m.column, m.type_sql
        )]
    }

    fn drop_index_sql(&self, table: &str, index: &str) -> String {
        format!("DROP INDEX {index} ON {table}")
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::DialectName;
    use crate::schema::{ColumnSchema, DefaultValue, IndexSchema, SqlType, TableSchema};

    use super::super::tests::generator;
    use super::super::ColumnChange;

    #[test]
    fn identity_and_add_column() {
        let ddl = generator(DialectName::SqlServer);
        let table = TableSchema::new("tickets")
            .column(ColumnSchema::new("id", SqlType::Integer).primary_key().auto_increment());
        assert_eq!(
            ddl.create_table(&table, &[]),
            "CREATE TABLE tickets (id INT IDENTITY(1,1) NOT NULL, \
             CONSTRAINT pk_tickets PRIMARY KEY (id))"
        );
        let column = ColumnSchema::new("closed", SqlType::Boolean)
            .not_null()
            .default(DefaultValue::Bool(false));
        assert_eq!(
            ddl.add_column(&table, &column),
            "ALTER TABLE tickets ADD closed BIT DEFAULT 0 NOT NULL"
        );
    }

    #[test]
    fn default_only_change_emits_nothing() {
        let ddl = generator(DialectName::SqlServer);
        let table = TableSchema::new("tickets");
        let column = ColumnSchema::new("title", SqlType::Varchar(80)).not_null();
        let default_only = ColumnChange {
            default_changed: true,
            ..ColumnChange::default()
        };
        assert!(ddl.modify_column(&table, &column, default_only).is_empty());
        let both = ColumnChange {
            type_changed: true,
            default_changed: true,
            ..ColumnChange::default()
        };
        assert_eq!(
            ddl.modify_column(&table, &column, both),
            vec!["ALTER TABLE tickets ALTER COLUMN title VARCHAR(80) NOT NULL"]
        );
    }

    #[test]
    fn clustered_index_and_drop() {
        let ddl = generator(DialectName::SqlServer);
        let table = TableSchema::new("tickets");
        let index = IndexSchema::new("ix_tickets_title", vec!["title".into()])
            .index_type("NONCLUSTERED")
            .condition("title IS NOT NULL");
        assert_eq!(
            ddl.create_index(&table, &index),
            "CREATE NONCLUSTERED INDEX ix_tickets_title ON tickets (title) WHERE title IS NOT NULL"
        );
        assert_eq!(
            ddl.drop_index(&table, "ix_tickets_title"),
            "DROP INDEX ix_tickets_title ON tickets"
        );
    }
}
