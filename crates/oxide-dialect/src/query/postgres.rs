//! PostgreSQL metadata queries.
//!
//! Key and index columns live in `int2vector` catalog columns, so the
//! primary-key and index queries expand them with
//! `information_schema._pg_expandarray` to get one row per key position.
//! Name-typed outputs are cast to `text` so every driver reads them as
//! strings.

use crate::provider::SqlTypeProvider;

use super::{in_list, sql_literal, QueryProvider};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQueries;

impl QueryProvider for PostgresQueries {
    fn current_catalog(&self) -> Option<String> {
        Some("SELECT current_database()::text AS CURRENT_NAME".to_string())
    }

    fn current_schema(&self) -> String {
        "SELECT current_schema()::text AS CURRENT_NAME".to_string()
    }

    fn set_schema(&self, schema: &str) -> Option<String> {
        Some(format!("SET search_path TO {schema}"))
    }

    fn catalogs(&self) -> String {
        "SELECT datname::text AS TABLE_CAT FROM pg_catalog.pg_database \
         WHERE NOT datistemplate ORDER BY datname"
            .to_string()
    }

    fn schemas(&self) -> String {
        "SELECT nspname::text AS TABLE_SCHEM FROM pg_catalog.pg_namespace \
         WHERE left(nspname, 3) <> 'pg_' AND nspname <> 'information_schema' \
         ORDER BY nspname"
            .to_string()
    }

    fn tables(&self, schema: Option<&str>) -> String {
        let filter = schema.map_or_else(
            || "table_schema NOT IN ('pg_catalog', 'information_schema')".to_string(),
            |s| format!("table_schema = {}", sql_literal(s)),
        );
        format!(
            "SELECT table_catalog::text AS TABLE_CAT, table_schema::text AS TABLE_SCHEM, \
             table_name::text AS TABLE_NAME FROM information_schema.tables \
             WHERE table_type = 'BASE TABLE' AND {filter} \
             ORDER BY table_schema, table_name"
        )
    }

    fn columns(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT c.table_schema::text AS TABLE_SCHEM, c.table_name::text AS TABLE_NAME, \
             c.column_name::text AS COLUMN_NAME, {data_type}, c.udt_name::text AS TYPE_NAME, \
             {size}, c.numeric_scale::int AS DECIMAL_DIGITS, \
             CASE c.is_nullable WHEN 'YES' THEN 1 ELSE 0 END AS NULLABLE, \
             c.column_default::text AS COLUMN_DEF, \
             CASE WHEN c.column_default LIKE 'nextval(%' OR c.is_identity = 'YES' \
             THEN 'YES' ELSE 'NO' END AS IS_AUTOINCREMENT, \
             c.ordinal_position::int AS ORDINAL_POSITION \
             FROM information_schema.columns c \
             WHERE c.table_schema = {schema} AND c.table_name IN {tables} \
             ORDER BY c.table_name, c.ordinal_position",
            data_type = types.data_types_case("c.udt_name::text", "DATA_TYPE"),
            size = types.data_precisions_case("c.udt_name::text", "COLUMN_SIZE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn primary_keys(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT result.TABLE_NAME, result.COLUMN_NAME, result.KEY_SEQ, result.PK_NAME \
             FROM (SELECT ct.relname::text AS TABLE_NAME, a.attname::text AS COLUMN_NAME, \
             (information_schema._pg_expandarray(i.indkey)).n::int AS KEY_SEQ, \
             ci.relname::text AS PK_NAME, \
             information_schema._pg_expandarray(i.indkey) AS KEYS, a.attnum AS A_ATTNUM \
             FROM pg_catalog.pg_class ct \
             JOIN pg_catalog.pg_attribute a ON ct.oid = a.attrelid \
             JOIN pg_catalog.pg_namespace n ON ct.relnamespace = n.oid \
             JOIN pg_catalog.pg_index i ON a.attrelid = i.indrelid \
             JOIN pg_catalog.pg_class ci ON ci.oid = i.indexrelid \
             WHERE i.indisprimary AND n.nspname = {} AND ct.relname IN {}) result \
             WHERE result.A_ATTNUM = (result.KEYS).x \
             ORDER BY result.TABLE_NAME, result.PK_NAME, result.KEY_SEQ",
            sql_literal(schema),
            in_list(tables)
        )
    }

    fn index_info(&self, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT tmp.TABLE_NAME, tmp.NON_UNIQUE, tmp.INDEX_NAME, tmp.INDEX_TYPE, \
             tmp.ORDINAL_POSITION, \
             CASE WHEN tmp.ATTNUM = 0 THEN NULL ELSE tmp.KEY_DEF END AS COLUMN_NAME, \
             CASE WHEN tmp.ATTNUM = 0 THEN tmp.KEY_DEF ELSE NULL END AS FUNCTION_EXPR, \
             tmp.FILTER_CONDITION, tmp.PRIMARY_KEY \
             FROM (SELECT ct.relname::text AS TABLE_NAME, \
             CASE WHEN i.indisunique THEN 0 ELSE 1 END AS NON_UNIQUE, \
             ci.relname::text AS INDEX_NAME, am.amname::text AS INDEX_TYPE, \
             (i.keys).n::int AS ORDINAL_POSITION, (i.keys).x AS ATTNUM, \
             pg_catalog.pg_get_indexdef(ci.oid, (i.keys).n, false)::text AS KEY_DEF, \
             pg_catalog.pg_get_expr(i.indpred, i.indrelid)::text AS FILTER_CONDITION, \
             CASE WHEN i.indisprimary THEN 1 ELSE 0 END AS PRIMARY_KEY \
             FROM pg_catalog.pg_class ct \
             JOIN pg_catalog.pg_namespace n ON ct.relnamespace = n.oid \
             JOIN (SELECT i.indexrelid, i.indrelid, i.indisunique, i.indisprimary, i.indpred, \
             information_schema._pg_expandarray(i.indkey) AS keys \
             FROM pg_catalog.pg_index i) i ON ct.oid = i.indrelid \
             JOIN pg_catalog.pg_class ci ON ci.oid = i.indexrelid \
             JOIN pg_catalog.pg_am am ON ci.relam = am.oid \
             WHERE n.nspname = {} AND ct.relname IN {}) tmp \
             ORDER BY tmp.TABLE_NAME, tmp.INDEX_NAME, tmp.ORDINAL_POSITION",
            sql_literal(schema),
            in_list(tables)
        )
    }

    fn imported_keys(&self, types: &SqlTypeProvider, schema: &str, tables: &[String]) -> String {
        format!(
            "SELECT pkn.nspname::text AS PKTABLE_SCHEM, pkc.relname::text AS PKTABLE_NAME, \
             pka.attname::text AS PKCOLUMN_NAME, fkc.relname::text AS FKTABLE_NAME, \
             fka.attname::text AS FKCOLUMN_NAME, pos.n AS KEY_SEQ, \
             {update_rule}, {delete_rule}, con.conname::text AS FK_NAME \
             FROM pg_catalog.pg_constraint con \
             JOIN pg_catalog.pg_class fkc ON fkc.oid = con.conrelid \
             JOIN pg_catalog.pg_namespace fkn ON fkn.oid = fkc.relnamespace \
             JOIN pg_catalog.pg_class pkc ON pkc.oid = con.confrelid \
             JOIN pg_catalog.pg_namespace pkn ON pkn.oid = pkc.relnamespace \
             CROSS JOIN generate_series(1, 32) pos(n) \
             JOIN pg_catalog.pg_attribute fka \
             ON fka.attrelid = con.conrelid AND fka.attnum = con.conkey[pos.n] \
             JOIN pg_catalog.pg_attribute pka \
             ON pka.attrelid = con.confrelid AND pka.attnum = con.confkey[pos.n] \
             WHERE con.contype = 'f' AND fkn.nspname = {schema} AND fkc.relname IN {tables} \
             ORDER BY fkc.relname, con.conname, pos.n",
            update_rule = types.reference_options_case("con.confupdtype", "UPDATE_RULE"),
            delete_rule = types.reference_options_case("con.confdeltype", "DELETE_RULE"),
            schema = sql_literal(schema),
            tables = in_list(tables),
        )
    }

    fn sequences(&self, schema: &str) -> Option<String> {
        Some(format!(
            "SELECT sequencename::text AS SEQUENCE_NAME, start_value AS START_VALUE, \
             increment_by AS INCREMENT, min_value AS MIN_VALUE, max_value AS MAX_VALUE, \
             cycle AS CYCLE, cache_size AS CACHE_SIZE \
             FROM pg_catalog.pg_sequences WHERE schemaname = {} ORDER BY sequencename",
            sql_literal(schema)
        ))
    }

    fn table_sequences(&self, schema: &str, tables: &[String]) -> Option<String> {
        Some(format!(
            "SELECT c.table_name::text AS TABLE_NAME, s.sequencename::text AS SEQUENCE_NAME, \
             s.start_value AS START_VALUE, s.increment_by AS INCREMENT, \
             s.min_value AS MIN_VALUE, s.max_value AS MAX_VALUE, s.cycle AS CYCLE, \
             s.cache_size AS CACHE_SIZE \
             FROM information_schema.columns c \
             JOIN pg_catalog.pg_sequences s ON s.schemaname = c.table_schema \
             AND quote_ident(s.schemaname) || '.' || quote_ident(s.sequencename) = \
             pg_get_serial_sequence(quote_ident(c.table_schema) || '.' || quote_ident(c.table_name), \
             c.column_name) \
             WHERE c.table_schema = {} AND c.table_name IN {} \
             ORDER BY c.table_name, s.sequencename",
            sql_literal(schema),
            in_list(tables)
        ))
    }

    fn set_read_only(&self, read_only: bool) -> Option<String> {
        Some(format!(
            "SET SESSION CHARACTERISTICS AS TRANSACTION {}",
            if read_only { "READ ONLY" } else { "READ WRITE" }
        ))
    }
}
