//! SQL Server metadata queries.
//!
//! Tables and columns come from `INFORMATION_SCHEMA`; indexes and foreign
//! keys from the `sys` catalog views, which carry filter definitions,
//! clustering and numeric referential actions.

use crate::provider::SqlTypeProvider;

use super::{in_list, sql_literal, QueryProvider};

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerQueries;

impl QueryProvider for SqlServerQueries {
    fn current_catalog(&self) -> Option<String> {
        Some("SELECT DB_NAME() AS CURRENT_NAME".to_string())
    }

    fn current_schema(&self) -> String {
        "SELECT SCHEMA_NAME() AS CURRENT_NAME".to_string()
    }

    fn set_catalog(&self, catalog: &str) -> Option<String> {
        Some(format!("USE {catalog}"))
    }

    fn set_schema(&self, _schema: &str) -> Option<String> {
        None
    }

    fn catalogs(&self) -> String {
        "SELECT name AS TABLE_CAT FROM sys.databases ORDER BY name".to_string()
    }

    fn schemas(&self) -> String {
        "SELECT name AS TABLE_SCHEM FROM sys.schemas \
         WHERE name NOT IN ('sys', 'INFORMATION_SCHEMA', 'guest') AND name NOT LIKE 'db[_]%' \
         ORDER BY name"
            .to_string()
    }

    fn columns(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT c.TABLE_SCHEMA AS TABLE_SCHEM, c.TABLE_NAME, c.COLUMN_NAME, {data_type}, \
             c.DATA_TYPE AS TYPE_NAME, {size}, c.NUMERIC_SCALE AS DECIMAL_DIGITS, \
             CASE c.IS_NULLABLE WHEN 'YES' THEN 1 ELSE 0 END AS NULLABLE, \
             c.COLUMN_DEFAULT AS COLUMN_DEF, \
             CASE WHEN COLUMNPROPERTY(OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + \
             QUOTENAME(c.TABLE_NAME)), c.COLUMN_NAME, 'IsIdentity') = 1 \
             THEN 'YES' ELSE 'NO' END AS IS_AUTOINCREMENT, \
             c.ORDINAL_POSITION \
             FROM INFORMATION_SCHEMA.COLUMNS c \
             WHERE c.TABLE_SCHEMA = {schema} AND c.TABLE_NAME IN {tables} \
             ORDER BY c.TABLE_NAME, c.ORDINAL_POSITION",
            data_type = types.data_types_case("c.DATA_TYPE", "DATA_TYPE"),
            size = types.data_precisions_case("c.DATA_TYPE", "COLUMN_SIZE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn index_info(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT t.name AS TABLE_NAME, CASE WHEN i.is_unique = 1 THEN 0 ELSE 1 END AS NON_UNIQUE, \
             i.name AS INDEX_NAME, i.type_desc AS INDEX_TYPE, \
             CAST(ic.key_ordinal AS INT) AS ORDINAL_POSITION, c.name AS COLUMN_NAME, \
             NULL AS FUNCTION_EXPR, i.filter_definition AS FILTER_CONDITION, \
             CAST(i.is_primary_key AS INT) AS PRIMARY_KEY \
             FROM sys.indexes i \
             JOIN sys.tables t ON t.object_id = i.object_id \
             JOIN sys.schemas s ON s.schema_id = t.schema_id \
             JOIN sys.index_columns ic ON ic.object_id = i.object_id \
             AND ic.index_id = i.index_id AND ic.is_included_column = 0 \
             JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id \
             WHERE i.type > 0 AND s.name = {} AND t.name IN {} \
             ORDER BY t.name, i.name, ic.key_ordinal",
            sql_literal(schema),
            in_list(tables)
        )
    }

    fn imported_keys(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT ps.name AS PKTABLE_SCHEM, pt.name AS PKTABLE_NAME, pc.name AS PKCOLUMN_NAME, \
             ft.name AS FKTABLE_NAME, fc.name AS FKCOLUMN_NAME, \
             CAST(fkc.constraint_column_id AS INT) AS KEY_SEQ, \
             {update_rule}, {delete_rule}, fk.name AS FK_NAME \
             FROM sys.foreign_keys fk \
             JOIN sys.foreign_key_columns fkc ON fkc.constraint_object_id = fk.object_id \
             JOIN sys.tables ft ON ft.object_id = fk.parent_object_id \
             JOIN sys.schemas fs ON fs.schema_id = ft.schema_id \
             JOIN sys.columns fc \
             ON fc.object_id = fkc.parent_object_id AND fc.column_id = fkc.parent_column_id \
             JOIN sys.tables pt ON pt.object_id = fk.referenced_object_id \
             JOIN sys.schemas ps ON ps.schema_id = pt.schema_id \
             JOIN sys.columns pc \
             ON pc.object_id = fkc.referenced_object_id AND pc.column_id = fkc.referenced_column_id \
             WHERE fs.name = {schema} AND ft.name IN {tables} \
             ORDER BY ft.name, fk.name, fkc.constraint_column_id",
            update_rule = types.reference_options_case("fk.update_referential_action", "UPDATE_RULE"),
            delete_rule = types.reference_options_case("fk.delete_referential_action", "DELETE_RULE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn sequences(&self, schema: &str) -> Option<String> {
        Some(format!(
            "SELECT name AS SEQUENCE_NAME, CAST(start_value AS BIGINT) AS START_VALUE, \
             CAST(increment AS BIGINT) AS INCREMENT, CAST(minimum_value AS BIGINT) AS MIN_VALUE, \
             CAST(maximum_value AS BIGINT) AS MAX_VALUE, CAST(is_cycling AS INT) AS CYCLE, \
             CAST(cache_size AS BIGINT) AS CACHE_SIZE \
             FROM sys.sequences WHERE SCHEMA_NAME(schema_id) = {} ORDER BY name",
            sql_literal(schema)
        ))
    }
}
