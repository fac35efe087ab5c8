//! SQLite metadata queries.
//!
//! SQLite has no information schema. Everything is read by joining
//! `sqlite_master` with the table-valued pragma functions
//! (`pragma_table_info`, `pragma_index_list`, `pragma_index_info`,
//! `pragma_foreign_key_list`). Foreign keys are anonymous, so their names
//! are synthesized from the table name and the pragma's key id.

use crate::model::IsolationLevel;
use crate::provider::SqlTypeProvider;

use super::{in_list, sql_literal, QueryProvider};

const BASE_TYPE: &str = "TRIM(CASE WHEN instr(p.type, '(') > 0 \
     THEN substr(p.type, 1, instr(p.type, '(') - 1) ELSE p.type END)";

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteQueries;

fn master(schema: &str) -> String {
    format!("\"{}\".sqlite_master", schema.replace('"', "\"\""))
}

impl QueryProvider for SqliteQueries {
    fn current_catalog(&self) -> Option<String> {
        None
    }

    fn current_schema(&self) -> String {
        "SELECT 'main' AS CURRENT_NAME".to_string()
    }

    fn set_schema(&self, _schema: &str) -> Option<String> {
        None
    }

    fn catalogs(&self) -> String {
        "SELECT NULL AS TABLE_CAT WHERE 1=0".to_string()
    }

    fn schemas(&self) -> String {
        "SELECT name AS TABLE_SCHEM FROM pragma_database_list WHERE name <> 'temp' ORDER BY seq"
            .to_string()
    }

    fn tables(&self, schema: Option<&str>) -> String {
        let schema = schema.unwrap_or("main");
        format!(
            "SELECT NULL AS TABLE_CAT, {} AS TABLE_SCHEM, name AS TABLE_NAME FROM {} \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name",
            sql_literal(schema),
            master(schema)
        )
    }

    fn columns(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT {schema_literal} AS TABLE_SCHEM, m.name AS TABLE_NAME, p.name AS COLUMN_NAME, \
             {data_type}, p.type AS TYPE_NAME, \
             CASE WHEN instr(p.type, '(') > 0 \
             THEN CAST(substr(p.type, instr(p.type, '(') + 1) AS INTEGER) ELSE NULL END AS COLUMN_SIZE, \
             CASE WHEN instr(p.type, ',') > 0 \
             THEN CAST(TRIM(substr(p.type, instr(p.type, ',') + 1)) AS INTEGER) ELSE NULL END AS DECIMAL_DIGITS, \
             CASE WHEN p.\"notnull\" = 1 OR p.pk > 0 THEN 0 ELSE 1 END AS NULLABLE, \
             p.dflt_value AS COLUMN_DEF, \
             CASE WHEN p.pk = 1 AND UPPER(p.type) = 'INTEGER' AND UPPER(m.sql) LIKE '%AUTOINCREMENT%' \
             THEN 'YES' ELSE 'NO' END AS IS_AUTOINCREMENT, \
             p.cid + 1 AS ORDINAL_POSITION \
             FROM {master} m JOIN pragma_table_info(m.name) p \
             WHERE m.type = 'table' AND m.name COLLATE NOCASE IN {tables} \
             ORDER BY m.name, p.cid",
            schema_literal = sql_literal(schema),
            data_type = types.data_types_case(BASE_TYPE, "DATA_TYPE"),
            master = master(schema),
            tables = in_list(tables),
        )
    }

    fn primary_keys(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT m.name AS TABLE_NAME, p.name AS COLUMN_NAME, p.pk AS KEY_SEQ, \
             COALESCE((SELECT il.name FROM pragma_index_list(m.name) il WHERE il.origin = 'pk'), \
             'pk_' || m.name) AS PK_NAME \
             FROM {} m JOIN pragma_table_info(m.name) p ON p.pk > 0 \
             WHERE m.type = 'table' AND m.name COLLATE NOCASE IN {} \
             ORDER BY m.name, p.pk",
            master(schema),
            in_list(tables)
        )
    }

    fn index_info(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT m.name AS TABLE_NAME, CASE WHEN il.\"unique\" = 1 THEN 0 ELSE 1 END AS NON_UNIQUE, \
             il.name AS INDEX_NAME, NULL AS INDEX_TYPE, ii.seqno + 1 AS ORDINAL_POSITION, \
             ii.name AS COLUMN_NAME, CASE WHEN ii.cid = -2 THEN '' ELSE NULL END AS FUNCTION_EXPR, \
             CASE WHEN il.partial = 1 \
             THEN TRIM(substr(s.sql, instr(UPPER(replace(replace(replace(s.sql, char(10), ' '), char(13), ' '), char(9), ' ')), ' WHERE ') + 7)) \
             ELSE NULL END AS FILTER_CONDITION, \
             CASE WHEN il.origin = 'pk' THEN 1 ELSE 0 END AS PRIMARY_KEY \
             FROM {master} m \
             JOIN pragma_index_list(m.name) il \
             JOIN pragma_index_info(il.name) ii \
             LEFT JOIN {master} s ON s.type = 'index' AND s.name = il.name \
             WHERE m.type = 'table' AND m.name COLLATE NOCASE IN {tables} \
             ORDER BY m.name, il.name, ii.seqno",
            master = master(schema),
            tables = in_list(tables),
        )
    }

    fn imported_keys(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT {schema_literal} AS PKTABLE_SCHEM, fk.\"table\" AS PKTABLE_NAME, \
             COALESCE(fk.\"to\", (SELECT k.name FROM pragma_table_info(fk.\"table\") k \
             WHERE k.pk = fk.seq + 1)) AS PKCOLUMN_NAME, \
             m.name AS FKTABLE_NAME, fk.\"from\" AS FKCOLUMN_NAME, fk.seq + 1 AS KEY_SEQ, \
             {update_rule}, {delete_rule}, 'fk_' || m.name || '_' || fk.id AS FK_NAME \
             FROM {master} m JOIN pragma_foreign_key_list(m.name) fk \
             WHERE m.type = 'table' AND m.name COLLATE NOCASE IN {tables} \
             ORDER BY m.name, fk.id, fk.seq",
            schema_literal = sql_literal(schema),
            update_rule = types.reference_options_case("fk.on_update", "UPDATE_RULE"),
            delete_rule = types.reference_options_case("fk.on_delete", "DELETE_RULE"),
            master = master(schema),
            tables = in_list(tables),
        )
    }

    fn sequences(&self, _schema: &str) -> Option<String> {
        None
    }

    fn set_transaction_isolation(&self, level: IsolationLevel) -> Option<String> {
        Some(format!(
            "PRAGMA read_uncommitted = {}",
            i32::from(level == IsolationLevel::ReadUncommitted)
        ))
    }

    fn set_read_only(&self, read_only: bool) -> Option<String> {
        Some(format!(
            "PRAGMA query_only = {}",
            if read_only { "ON" } else { "OFF" }
        ))
    }

    fn update_delete_limit_probe(&self) -> Option<String> {
        Some(
            "SELECT sqlite_compileoption_used('ENABLE_UPDATE_DELETE_LIMIT') AS LIMIT_ENABLED"
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectName;

    #[test]
    fn tables_skip_internal_tables() {
        assert_eq!(
            SqliteQueries.tables(None),
            "SELECT NULL AS TABLE_CAT, 'main' AS TABLE_SCHEM, name AS TABLE_NAME \
             FROM \"main\".sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name"
        );
    }

    #[test]
    fn columns_parse_declared_type() {
        let types = SqlTypeProvider::for_dialect(DialectName::Sqlite);
        let sql = SqliteQueries.columns(&types, "main", &["users".into()]);
        assert!(sql.contains("JOIN pragma_table_info(m.name) p"));
        assert!(sql.contains("CASE UPPER(TRIM(CASE WHEN instr(p.type, '(') > 0"));
        assert!(sql.contains("m.name COLLATE NOCASE IN ('users')"));
    }

    #[test]
    fn foreign_keys_get_synthesized_names() {
        let types = SqlTypeProvider::for_dialect(DialectName::Sqlite);
        let sql = SqliteQueries.imported_keys(&types, "main", &["orders".into()]);
        assert!(sql.contains("'fk_' || m.name || '_' || fk.id AS FK_NAME"));
        assert!(sql.contains("COALESCE(fk.\"to\""));
        assert!(sql.contains("CASE fk.on_delete WHEN 'CASCADE' THEN 0"));
    }

    #[test]
    fn index_info_extracts_partial_predicate() {
        let sql = SqliteQueries.index_info("main", &["people".into()]);
        assert!(sql.contains("il.partial = 1"));
        assert!(sql.contains("il.origin = 'pk'"));
        assert!(sql.contains("m.name COLLATE NOCASE IN ('people')"));
        assert!(sql.contains("instr(UPPER(replace(replace(replace(s.sql, char(10), ' ')"));
    }

    #[test]
    fn limit_probe_and_session() {
        assert_eq!(
            SqliteQueries.update_delete_limit_probe().unwrap(),
            "SELECT sqlite_compileoption_used('ENABLE_UPDATE_DELETE_LIMIT') AS LIMIT_ENABLED"
        );
        assert!(SqliteQueries.current_catalog().is_none());
        assert_eq!(
            SqliteQueries.set_read_only(true).unwrap(),
            "PRAGMA query_only = ON"
        );
    }
}
