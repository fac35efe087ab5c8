//! Oracle metadata queries over the `ALL_*` dictionary views.
//!
//! Oracle has no catalogs: the catalog listing is a `WHERE 1=0` query the
//! orchestrator never sends. Owners play the role of schemas.

use crate::model::IsolationLevel;
use crate::provider::SqlTypeProvider;

use super::{in_list, sql_literal, QueryProvider};

/// Strips the `(n)` precision suffix Oracle appends to some type names,
/// e.g. `TIMESTAMP(6) WITH TIME ZONE`.
const BASE_TYPE: &str = r"REGEXP_REPLACE(c.DATA_TYPE, '\(\d+\)', '')";

#[derive(Debug, Clone, Copy, Default)]
pub struct OracleQueries;

impl QueryProvider for OracleQueries {
    fn current_catalog(&self) -> Option<String> {
        Some("SELECT SYS_CONTEXT('USERENV', 'DB_NAME') AS CURRENT_NAME FROM DUAL".to_string())
    }

    fn current_schema(&self) -> String {
        "SELECT SYS_CONTEXT('USERENV', 'CURRENT_SCHEMA') AS CURRENT_NAME FROM DUAL".to_string()
    }

    fn set_schema(&self, schema: &str) -> Option<String> {
        Some(format!("ALTER SESSION SET CURRENT_SCHEMA = {schema}"))
    }

    fn catalogs(&self) -> String {
        "SELECT NULL AS TABLE_CAT FROM DUAL WHERE 1=0".to_string()
    }

    fn schemas(&self) -> String {
        "SELECT USERNAME AS TABLE_SCHEM FROM ALL_USERS \
         WHERE ORACLE_MAINTAINED = 'N' ORDER BY USERNAME"
            .to_string()
    }

    fn tables(&self, schema: Option<&str>) -> String {
        let filter = schema.map_or_else(
            || "OWNER IN (SELECT USERNAME FROM ALL_USERS WHERE ORACLE_MAINTAINED = 'N')".to_string(),
            |s| format!("OWNER = {}", sql_literal(s)),
        );
        format!(
            "SELECT NULL AS TABLE_CAT, OWNER AS TABLE_SCHEM, TABLE_NAME FROM ALL_TABLES \
             WHERE {filter} ORDER BY OWNER, TABLE_NAME"
        )
    }

    fn columns(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT c.OWNER AS TABLE_SCHEM, c.TABLE_NAME, c.COLUMN_NAME, {data_type}, \
             c.DATA_TYPE AS TYPE_NAME, {size}, c.DATA_SCALE AS DECIMAL_DIGITS, \
             CASE c.NULLABLE WHEN 'Y' THEN 1 ELSE 0 END AS NULLABLE, \
             c.DATA_DEFAULT AS COLUMN_DEF, c.IDENTITY_COLUMN AS IS_AUTOINCREMENT, \
             c.COLUMN_ID AS ORDINAL_POSITION \
             FROM ALL_TAB_COLUMNS c \
             WHERE c.OWNER = {schema} AND c.TABLE_NAME IN {tables} \
             ORDER BY c.TABLE_NAME, c.COLUMN_ID",
            data_type = types.data_types_case(BASE_TYPE, "DATA_TYPE"),
            size = types.data_precisions_case(BASE_TYPE, "COLUMN_SIZE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn primary_keys(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT cc.TABLE_NAME, cc.COLUMN_NAME, cc.POSITION AS KEY_SEQ, \
             c.CONSTRAINT_NAME AS PK_NAME \
             FROM ALL_CONSTRAINTS c \
             JOIN ALL_CONS_COLUMNS cc \
             ON cc.OWNER = c.OWNER AND cc.CONSTRAINT_NAME = c.CONSTRAINT_NAME \
             WHERE c.CONSTRAINT_TYPE = 'P' AND c.OWNER = {} AND c.TABLE_NAME IN {} \
             ORDER BY cc.TABLE_NAME, cc.POSITION",
            sql_literal(schema),
            in_list(tables)
        )
    }

    fn index_info(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT i.TABLE_NAME, CASE i.UNIQUENESS WHEN 'UNIQUE' THEN 0 ELSE 1 END AS NON_UNIQUE, \
             i.INDEX_NAME, i.INDEX_TYPE, ic.COLUMN_POSITION AS ORDINAL_POSITION, \
             CASE WHEN ie.COLUMN_EXPRESSION IS NULL THEN ic.COLUMN_NAME ELSE NULL END AS COLUMN_NAME, \
             ie.COLUMN_EXPRESSION AS FUNCTION_EXPR, NULL AS FILTER_CONDITION, \
             CASE WHEN EXISTS (SELECT 1 FROM ALL_CONSTRAINTS pk WHERE pk.OWNER = i.TABLE_OWNER \
             AND pk.INDEX_NAME = i.INDEX_NAME AND pk.CONSTRAINT_TYPE = 'P') \
             THEN 1 ELSE 0 END AS PRIMARY_KEY \
             FROM ALL_INDEXES i \
             JOIN ALL_IND_COLUMNS ic ON ic.INDEX_OWNER = i.OWNER AND ic.INDEX_NAME = i.INDEX_NAME \
             LEFT JOIN ALL_IND_EXPRESSIONS ie ON ie.INDEX_OWNER = ic.INDEX_OWNER \
             AND ie.INDEX_NAME = ic.INDEX_NAME AND ie.COLUMN_POSITION = ic.COLUMN_POSITION \
             WHERE i.TABLE_OWNER = {} AND i.TABLE_NAME IN {} \
             ORDER BY i.TABLE_NAME, i.INDEX_NAME, ic.COLUMN_POSITION",
            sql_literal(schema),
            in_list(tables)
        )
    }

    fn imported_keys(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT pk.OWNER AS PKTABLE_SCHEM, pk.TABLE_NAME AS PKTABLE_NAME, \
             pkc.COLUMN_NAME AS PKCOLUMN_NAME, fk.TABLE_NAME AS FKTABLE_NAME, \
             fkc.COLUMN_NAME AS FKCOLUMN_NAME, fkc.POSITION AS KEY_SEQ, \
             NULL AS UPDATE_RULE, {delete_rule}, fk.CONSTRAINT_NAME AS FK_NAME \
             FROM ALL_CONSTRAINTS fk \
             JOIN ALL_CONS_COLUMNS fkc \
             ON fkc.OWNER = fk.OWNER AND fkc.CONSTRAINT_NAME = fk.CONSTRAINT_NAME \
             JOIN ALL_CONSTRAINTS pk \
             ON pk.OWNER = fk.R_OWNER AND pk.CONSTRAINT_NAME = fk.R_CONSTRAINT_NAME \
             JOIN ALL_CONS_COLUMNS pkc ON pkc.OWNER = pk.OWNER \
             AND pkc.CONSTRAINT_NAME = pk.CONSTRAINT_NAME AND pkc.POSITION = fkc.POSITION \
             WHERE fk.CONSTRAINT_TYPE = 'R' AND fk.OWNER = {schema} AND fk.TABLE_NAME IN {tables} \
             ORDER BY fk.TABLE_NAME, fk.CONSTRAINT_NAME, fkc.POSITION",
            delete_rule = types.reference_options_case("fk.DELETE_RULE", "DELETE_RULE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn sequences(&self, schema: &str) -> Option<String> {
        Some(format!(
            "SELECT SEQUENCE_NAME, NULL AS START_VALUE, INCREMENT_BY AS INCREMENT, \
             MIN_VALUE, MAX_VALUE, CASE CYCLE_FLAG WHEN 'Y' THEN 1 ELSE 0 END AS CYCLE, \
             CACHE_SIZE FROM ALL_SEQUENCES WHERE SEQUENCE_OWNER = {} ORDER BY SEQUENCE_NAME",
            sql_literal(schema)
        ))
    }

    fn table_sequences(&self, schema: &str, tables: &[String]) -> Option<String> {
        Some(format!(
            "SELECT ic.TABLE_NAME, s.SEQUENCE_NAME, NULL AS START_VALUE, \
             s.INCREMENT_BY AS INCREMENT, s.MIN_VALUE, s.MAX_VALUE, \
             CASE s.CYCLE_FLAG WHEN 'Y' THEN 1 ELSE 0 END AS CYCLE, s.CACHE_SIZE \
             FROM ALL_TAB_IDENTITY_COLS ic \
             JOIN ALL_SEQUENCES s \
             ON s.SEQUENCE_OWNER = ic.OWNER AND s.SEQUENCE_NAME = ic.SEQUENCE_NAME \
             WHERE ic.OWNER = {} AND ic.TABLE_NAME IN {} \
             ORDER BY ic.TABLE_NAME, s.SEQUENCE_NAME",
            sql_literal(schema),
            in_list(tables)
        ))
    }

    fn set_transaction_isolation(&self, level: IsolationLevel) -> Option<String> {
        match level {
            IsolationLevel::ReadCommitted | IsolationLevel::Serializable => Some(format!(
                "ALTER SESSION SET ISOLATION_LEVEL = {}",
                level.as_sql()
            )),
            IsolationLevel::ReadUncommitted | IsolationLevel::RepeatableRead => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectName;

    #[test]
    fn catalogs_return_nothing() {
        assert_eq!(
            OracleQueries.catalogs(),
            "SELECT NULL AS TABLE_CAT FROM DUAL WHERE 1=0"
        );
        assert!(OracleQueries.set_catalog("X").is_none());
    }

    #[test]
    fn columns_normalize_type_names() {
        let types = SqlTypeProvider::for_dialect(DialectName::Oracle);
        let sql = OracleQueries.columns(&types, "APP", &["USERS".into()]);
        assert!(sql.contains(r"CASE UPPER(REGEXP_REPLACE(c.DATA_TYPE, '\(\d+\)', ''))"));
        assert!(sql.contains("WHEN 'NUMBER' THEN DATA_PRECISION"));
        assert!(sql.contains("FROM ALL_TAB_COLUMNS c"));
    }

    #[test]
    fn imported_keys_have_no_update_rule() {
        let types = SqlTypeProvider::for_dialect(DialectName::Oracle);
        let sql = OracleQueries.imported_keys(&types, "APP", &["ORDERS".into()]);
        assert!(sql.contains("NULL AS UPDATE_RULE"));
        assert!(sql.contains("CASE fk.DELETE_RULE WHEN 'CASCADE' THEN 0"));
        assert!(sql.contains("fk.CONSTRAINT_TYPE = 'R'"));
    }

    #[test]
    fn session_statements() {
        assert_eq!(
            OracleQueries.set_schema("APP").unwrap(),
            "ALTER SESSION SET CURRENT_SCHEMA = APP"
        );
        assert!(OracleQueries
            .set_transaction_isolation(IsolationLevel::RepeatableRead)
            .is_none());
        assert_eq!(
            OracleQueries
                .set_transaction_isolation(IsolationLevel::Serializable)
                .unwrap(),
            "ALTER SESSION SET ISOLATION_LEVEL = SERIALIZABLE"
        );
    }
}
