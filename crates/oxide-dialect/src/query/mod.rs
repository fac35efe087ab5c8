//! Metadata query synthesis.
//!
//! A [`QueryProvider`] turns "list the columns of these tables" into the
//! literal SQL text a vendor understands. Nothing here touches a
//! connection. The default methods target the ANSI `INFORMATION_SCHEMA`
//! views; vendors override the queries their catalog answers differently.
//!
//! Every query aliases its output columns with the names the row mappers
//! in [`crate::extract`] read:
//!
//! | Query | Columns |
//! |-------|---------|
//! | catalogs | `TABLE_CAT` |
//! | schemas | `TABLE_SCHEM` |
//! | tables | `TABLE_CAT`, `TABLE_SCHEM`, `TABLE_NAME` |
//! | columns | `TABLE_SCHEM`, `TABLE_NAME`, `COLUMN_NAME`, `DATA_TYPE`, `TYPE_NAME`, `COLUMN_SIZE`, `DECIMAL_DIGITS`, `NULLABLE`, `COLUMN_DEF`, `IS_AUTOINCREMENT`, `ORDINAL_POSITION` |
//! | primary keys | `TABLE_NAME`, `COLUMN_NAME`, `KEY_SEQ`, `PK_NAME` |
//! | index info | `TABLE_NAME`, `NON_UNIQUE`, `INDEX_NAME`, `INDEX_TYPE`, `ORDINAL_POSITION`, `COLUMN_NAME`, `FUNCTION_EXPR`, `FILTER_CONDITION`, `PRIMARY_KEY` |
//! | imported keys | `PKTABLE_SCHEM`, `PKTABLE_NAME`, `PKCOLUMN_NAME`, `FKTABLE_NAME`, `FKCOLUMN_NAME`, `KEY_SEQ`, `UPDATE_RULE`, `DELETE_RULE`, `FK_NAME` |
//! | sequences | `SEQUENCE_NAME`, `START_VALUE`, `INCREMENT`, `MIN_VALUE`, `MAX_VALUE`, `CYCLE`, `CACHE_SIZE` (+ `TABLE_NAME` for table sequences) |

mod h2;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

use std::fmt;

pub use h2::H2Queries;
pub use mysql::MySqlQueries;
pub use oracle::OracleQueries;
pub use postgres::PostgresQueries;
pub use sqlite::SqliteQueries;
pub use sqlserver::SqlServerQueries;

use crate::model::IsolationLevel;
use crate::provider::SqlTypeProvider;

/// Renders `value` as a single-quoted SQL string literal.
#[must_use]
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Renders `values` as a parenthesized list of string literals. An empty
/// list renders as `(NULL)`, which matches nothing.
#[must_use]
pub fn in_list(values: &[String]) -> String {
    if values.is_empty() {
        return "(NULL)".to_string();
    }
    let literals: Vec<String> = values.iter().map(|v| sql_literal(v)).collect();
    format!("({})", literals.join(", "))
}

/// SQL text for every metadata question the orchestrator asks.
///
/// `schema` and `tables` arguments are plain values in the case the
/// database stores them; the provider renders them as literals.
/// Identifier arguments (`set_catalog`, `set_schema`) arrive already
/// quoted. A method returning `None` means the vendor has no such
/// capability.
pub trait QueryProvider: Send + Sync + fmt::Debug {
    /// Query returning the current catalog, or `None` when the vendor has
    /// no catalog level.
    fn current_catalog(&self) -> Option<String> {
        Some("SELECT CURRENT_CATALOG AS CURRENT_NAME".to_string())
    }

    /// Query returning the current schema.
    fn current_schema(&self) -> String {
        "SELECT CURRENT_SCHEMA AS CURRENT_NAME".to_string()
    }

    /// Statement switching the current catalog.
    fn set_catalog(&self, _catalog: &str) -> Option<String> {
        None
    }

    /// Statement switching the current schema.
    fn set_schema(&self, schema: &str) -> Option<String> {
        Some(format!("SET SCHEMA {schema}"))
    }

    /// Lists catalogs.
    fn catalogs(&self) -> String {
        "SELECT CATALOG_NAME AS TABLE_CAT FROM INFORMATION_SCHEMA.INFORMATION_SCHEMA_CATALOG_NAME"
            .to_string()
    }

    /// Lists schemas.
    fn schemas(&self) -> String {
        "SELECT SCHEMA_NAME AS TABLE_SCHEM FROM INFORMATION_SCHEMA.SCHEMATA \
         WHERE SCHEMA_NAME <> 'INFORMATION_SCHEMA' ORDER BY SCHEMA_NAME"
            .to_string()
    }

    /// Lists base tables of `schema`, or of every user schema when `None`.
    fn tables(&self, schema: Option<&str>) -> String {
        let filter = schema.map_or_else(
            || "TABLE_SCHEMA <> 'INFORMATION_SCHEMA'".to_string(),
            |s| format!("TABLE_SCHEMA = {}", sql_literal(s)),
        );
        format!(
            "SELECT TABLE_CATALOG AS TABLE_CAT, TABLE_SCHEMA AS TABLE_SCHEM, TABLE_NAME \
             FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE = 'BASE TABLE' AND {filter} \
             ORDER BY TABLE_SCHEMA, TABLE_NAME"
        )
    }

    /// Lists columns of `tables`, in ordinal order.
    fn columns(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT TABLE_SCHEMA AS TABLE_SCHEM, TABLE_NAME, COLUMN_NAME, {data_type}, \
             DATA_TYPE AS TYPE_NAME, {size}, NUMERIC_SCALE AS DECIMAL_DIGITS, \
             CASE IS_NULLABLE WHEN 'YES' THEN 1 ELSE 0 END AS NULLABLE, \
             COLUMN_DEFAULT AS COLUMN_DEF, \
             CASE WHEN IS_IDENTITY = 'YES' THEN 'YES' ELSE 'NO' END AS IS_AUTOINCREMENT, \
             ORDINAL_POSITION \
             FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_SCHEMA = {schema} AND TABLE_NAME IN {tables} \
             ORDER BY TABLE_NAME, ORDINAL_POSITION",
            data_type = types.data_types_case("DATA_TYPE", "DATA_TYPE"),
            size = types.data_precisions_case("DATA_TYPE", "COLUMN_SIZE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    /// Lists primary-key columns of `tables`.
    fn primary_keys(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT kcu.TABLE_NAME, kcu.COLUMN_NAME, kcu.ORDINAL_POSITION AS KEY_SEQ, \
             tc.CONSTRAINT_NAME AS PK_NAME \
             FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc \
             JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
             ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA \
             AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME AND kcu.TABLE_NAME = tc.TABLE_NAME \
             WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY' AND tc.TABLE_SCHEMA = {} \
             AND tc.TABLE_NAME IN {} \
             ORDER BY kcu.TABLE_NAME, kcu.ORDINAL_POSITION",
            sql_literal(schema),
            in_list(tables)
        )
    }

    /// Lists index key columns of `tables`, one row per key part.
    fn index_info(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT i.TABLE_NAME, \
             CASE WHEN i.INDEX_TYPE_NAME IN ('UNIQUE INDEX', 'PRIMARY KEY') THEN 0 ELSE 1 END AS NON_UNIQUE, \
             i.INDEX_NAME, NULL AS INDEX_TYPE, ic.ORDINAL_POSITION, ic.COLUMN_NAME, \
             NULL AS FUNCTION_EXPR, NULL AS FILTER_CONDITION, \
             CASE WHEN i.INDEX_TYPE_NAME = 'PRIMARY KEY' THEN 1 ELSE 0 END AS PRIMARY_KEY \
             FROM INFORMATION_SCHEMA.INDEXES i \
             JOIN INFORMATION_SCHEMA.INDEX_COLUMNS ic \
             ON ic.INDEX_SCHEMA = i.INDEX_SCHEMA AND ic.INDEX_NAME = i.INDEX_NAME \
             AND ic.TABLE_NAME = i.TABLE_NAME \
             WHERE i.TABLE_SCHEMA = {} AND i.TABLE_NAME IN {} \
             ORDER BY i.TABLE_NAME, i.INDEX_NAME, ic.ORDINAL_POSITION",
            sql_literal(schema),
            in_list(tables)
        )
    }

    /// Lists foreign-key column pairs declared on `tables`.
    fn imported_keys(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT pk.TABLE_SCHEMA AS PKTABLE_SCHEM, pk.TABLE_NAME AS PKTABLE_NAME, \
             pk.COLUMN_NAME AS PKCOLUMN_NAME, fk.TABLE_NAME AS FKTABLE_NAME, \
             fk.COLUMN_NAME AS FKCOLUMN_NAME, fk.ORDINAL_POSITION AS KEY_SEQ, \
             {update_rule}, {delete_rule}, rc.CONSTRAINT_NAME AS FK_NAME \
             FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc \
             JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE fk \
             ON fk.CONSTRAINT_SCHEMA = rc.CONSTRAINT_SCHEMA AND fk.CONSTRAINT_NAME = rc.CONSTRAINT_NAME \
             JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE pk \
             ON pk.CONSTRAINT_SCHEMA = rc.UNIQUE_CONSTRAINT_SCHEMA \
             AND pk.CONSTRAINT_NAME = rc.UNIQUE_CONSTRAINT_NAME \
             AND pk.ORDINAL_POSITION = fk.POSITION_IN_UNIQUE_CONSTRAINT \
             WHERE fk.TABLE_SCHEMA = {schema} AND fk.TABLE_NAME IN {tables} \
             ORDER BY fk.TABLE_NAME, rc.CONSTRAINT_NAME, fk.ORDINAL_POSITION",
            update_rule = types.reference_options_case("rc.UPDATE_RULE", "UPDATE_RULE"),
            delete_rule = types.reference_options_case("rc.DELETE_RULE", "DELETE_RULE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    /// Lists sequences of `schema`; `None` when the vendor has no native
    /// sequences.
    fn sequences(&self, schema: &str) -> Option<String> {
        Some(format!(
            "SELECT SEQUENCE_NAME, START_VALUE, INCREMENT, MINIMUM_VALUE AS MIN_VALUE, \
             MAXIMUM_VALUE AS MAX_VALUE, CASE CYCLE_OPTION WHEN 'YES' THEN 1 ELSE 0 END AS CYCLE, \
             CACHE AS CACHE_SIZE \
             FROM INFORMATION_SCHEMA.SEQUENCES WHERE SEQUENCE_SCHEMA = {} \
             ORDER BY SEQUENCE_NAME",
            sql_literal(schema)
        ))
    }

    /// Lists sequences backing auto-increment columns of `tables`.
    fn table_sequences(&self, _schema: &str, _tables: &[String]) -> Option<String> {
        None
    }

    /// Statement setting the session isolation level.
    fn set_transaction_isolation(&self, level: IsolationLevel) -> Option<String> {
        Some(format!(
            "SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL {}",
            level.as_sql()
        ))
    }

    /// Statement making the session read-only (or read-write).
    fn set_read_only(&self, _read_only: bool) -> Option<String> {
        None
    }

    /// Query answering whether `UPDATE`/`DELETE` accept `LIMIT`, for
    /// vendors where that depends on the build. The answer is read from
    /// `LIMIT_ENABLED`.
    fn update_delete_limit_probe(&self) -> Option<String> {
        None
    }

    /// Query returning the compatibility mode of the database in
    /// `SETTING_VALUE`.
    fn mode_probe(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_escaped() {
        assert_eq!(sql_literal("o'brien"), "'o''brien'");
        assert_eq!(in_list(&["a".into(), "b'c".into()]), "('a', 'b''c')");
        assert_eq!(in_list(&[]), "(NULL)");
    }
}
