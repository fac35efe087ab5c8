//! MySQL and MariaDB metadata queries.
//!
//! A MySQL "database" is both the catalog and the schema, so every
//! schema-scoped query filters on `TABLE_SCHEMA` alone. Unsigned catalog
//! columns are cast to `SIGNED` so drivers read plain integers.

use crate::model::IsolationLevel;
use crate::provider::SqlTypeProvider;

use super::{in_list, sql_literal, QueryProvider};

/// MySQL queries. MariaDB reuses them with two fields swapped.
#[derive(Debug, Clone, Copy)]
pub struct MySqlQueries {
    /// Expression yielding `COLUMN_DEF`.
    column_default: &'static str,
    /// Expression yielding `FUNCTION_EXPR` for index key parts.
    function_expression: &'static str,
}

impl Default for MySqlQueries {
    fn default() -> Self {
        Self::mysql()
    }
}

impl MySqlQueries {
    /// Queries for MySQL 8.
    #[must_use]
    pub const fn mysql() -> Self {
        Self {
            column_default: "COLUMN_DEFAULT",
            function_expression: "EXPRESSION",
        }
    }

    /// Queries for MariaDB, which reports a missing default as the string
    /// `NULL` and has no functional key parts in `STATISTICS`.
    #[must_use]
    pub const fn mariadb() -> Self {
        Self {
            column_default: "CASE WHEN COLUMN_DEFAULT = 'NULL' THEN NULL ELSE COLUMN_DEFAULT END",
            function_expression: "NULL",
        }
    }
}

const SYSTEM_SCHEMAS: &str = "('information_schema', 'mysql', 'performance_schema', 'sys')";

impl QueryProvider for MySqlQueries {
    fn current_catalog(&self) -> Option<String> {
        Some("SELECT DATABASE() AS CURRENT_NAME".to_string())
    }

    fn current_schema(&self) -> String {
        "SELECT DATABASE() AS CURRENT_NAME".to_string()
    }

    fn set_catalog(&self, catalog: &str) -> Option<String> {
        Some(format!("USE {catalog}"))
    }

    fn set_schema(&self, schema: &str) -> Option<String> {
        Some(format!("USE {schema}"))
    }

    fn catalogs(&self) -> String {
        format!(
            "SELECT SCHEMA_NAME AS TABLE_CAT FROM INFORMATION_SCHEMA.SCHEMATA \
             WHERE SCHEMA_NAME NOT IN {SYSTEM_SCHEMAS} ORDER BY SCHEMA_NAME"
        )
    }

    fn schemas(&self) -> String {
        format!(
            "SELECT SCHEMA_NAME AS TABLE_SCHEM FROM INFORMATION_SCHEMA.SCHEMATA \
             WHERE SCHEMA_NAME NOT IN {SYSTEM_SCHEMAS} ORDER BY SCHEMA_NAME"
        )
    }

    fn tables(&self, schema: Option<&str>) -> String {
        let filter = schema.map_or_else(
            || format!("TABLE_SCHEMA NOT IN {SYSTEM_SCHEMAS}"),
            |s| format!("TABLE_SCHEMA = {}", sql_literal(s)),
        );
        format!(
            "SELECT TABLE_SCHEMA AS TABLE_CAT, TABLE_SCHEMA AS TABLE_SCHEM, TABLE_NAME \
             FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE = 'BASE TABLE' AND {filter} \
             ORDER BY TABLE_SCHEMA, TABLE_NAME"
        )
    }

    fn columns(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT TABLE_SCHEMA AS TABLE_SCHEM, TABLE_NAME, COLUMN_NAME, {data_type}, \
             DATA_TYPE AS TYPE_NAME, {size}, CAST(NUMERIC_SCALE AS SIGNED) AS DECIMAL_DIGITS, \
             CASE IS_NULLABLE WHEN 'YES' THEN 1 ELSE 0 END AS NULLABLE, \
             {default} AS COLUMN_DEF, \
             CASE WHEN EXTRA LIKE '%auto_increment%' THEN 'YES' ELSE 'NO' END AS IS_AUTOINCREMENT, \
             CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION \
             FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_SCHEMA = {schema} AND TABLE_NAME IN {tables} \
             ORDER BY TABLE_NAME, ORDINAL_POSITION",
            data_type = types.data_types_case("DATA_TYPE", "DATA_TYPE"),
            size = types.data_precisions_case("DATA_TYPE", "COLUMN_SIZE"),
            default = self.column_default,
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn primary_keys(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT TABLE_NAME, COLUMN_NAME, CAST(SEQ_IN_INDEX AS SIGNED) AS KEY_SEQ, \
             INDEX_NAME AS PK_NAME FROM INFORMATION_SCHEMA.STATISTICS \
             WHERE INDEX_NAME = 'PRIMARY' AND TABLE_SCHEMA = {} AND TABLE_NAME IN {} \
             ORDER BY TABLE_NAME, SEQ_IN_INDEX",
            sql_literal(schema),
            in_list(tables)
        )
    }

    fn index_info(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT TABLE_NAME, CAST(NON_UNIQUE AS SIGNED) AS NON_UNIQUE, INDEX_NAME, INDEX_TYPE, \
             CAST(SEQ_IN_INDEX AS SIGNED) AS ORDINAL_POSITION, COLUMN_NAME, \
             {function} AS FUNCTION_EXPR, NULL AS FILTER_CONDITION, \
             CASE WHEN INDEX_NAME = 'PRIMARY' THEN 1 ELSE 0 END AS PRIMARY_KEY \
             FROM INFORMATION_SCHEMA.STATISTICS \
             WHERE TABLE_SCHEMA = {schema} AND TABLE_NAME IN {tables} \
             ORDER BY TABLE_NAME, INDEX_NAME, SEQ_IN_INDEX",
            function = self.function_expression,
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn imported_keys(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT kcu.REFERENCED_TABLE_SCHEMA AS PKTABLE_SCHEM, \
             kcu.REFERENCED_TABLE_NAME AS PKTABLE_NAME, \
             kcu.REFERENCED_COLUMN_NAME AS PKCOLUMN_NAME, kcu.TABLE_NAME AS FKTABLE_NAME, \
             kcu.COLUMN_NAME AS FKCOLUMN_NAME, CAST(kcu.ORDINAL_POSITION AS SIGNED) AS KEY_SEQ, \
             {update_rule}, {delete_rule}, kcu.CONSTRAINT_NAME AS FK_NAME \
             FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
             JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc \
             ON rc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA \
             AND rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME AND rc.TABLE_NAME = kcu.TABLE_NAME \
             WHERE kcu.REFERENCED_TABLE_NAME IS NOT NULL \
             AND kcu.TABLE_SCHEMA = {schema} AND kcu.TABLE_NAME IN {tables} \
             ORDER BY kcu.TABLE_NAME, kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
            update_rule = types.reference_options_case("rc.UPDATE_RULE", "UPDATE_RULE"),
            delete_rule = types.reference_options_case("rc.DELETE_RULE", "DELETE_RULE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn sequences(&self, _schema: &str) -> Option<String> {
        None
    }

    fn set_transaction_isolation(&self, level: IsolationLevel) -> Option<String> {
        Some(format!(
            "SET SESSION TRANSACTION ISOLATION LEVEL {}",
            level.as_sql()
        ))
    }

    fn set_read_only(&self, read_only: bool) -> Option<String> {
        Some(format!(
            "SET SESSION TRANSACTION {}",
            if read_only { "READ ONLY" } else { "READ WRITE" }
        ))
    }
}
