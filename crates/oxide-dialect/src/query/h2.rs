//! H2 metadata queries (2.x `INFORMATION_SCHEMA`).

use super::QueryProvider;

/// H2 speaks the ANSI information schema; only the mode probe is its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2Queries;

impl QueryProvider for H2Queries {
    fn mode_probe(&self) -> Option<String> {
        Some(
            "SELECT SETTING_VALUE FROM INFORMATION_SCHEMA.SETTINGS WHERE SETTING_NAME = 'MODE'"
                .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DialectName, H2Mode};
    use crate::provider::SqlTypeProvider;

    #[test]
    fn tables_filter_on_schema() {
        assert_eq!(
            H2Queries.tables(Some("PUBLIC")),
            "SELECT TABLE_CATALOG AS TABLE_CAT, TABLE_SCHEMA AS TABLE_SCHEM, TABLE_NAME \
             FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_SCHEMA = 'PUBLIC' \
             ORDER BY TABLE_SCHEMA, TABLE_NAME"
        );
    }

    #[test]
    fn imported_keys_use_unique_constraint_position() {
        let types = SqlTypeProvider::for_dialect(DialectName::H2(H2Mode::Regular));
        let sql = H2Queries.imported_keys(&types, "PUBLIC", &["ORDERS".into()]);
        assert!(sql.contains("pk.ORDINAL_POSITION = fk.POSITION_IN_UNIQUE_CONSTRAINT"));
        assert!(sql.contains("CASE rc.DELETE_RULE WHEN 'CASCADE' THEN 0"));
        assert!(sql.contains("fk.TABLE_NAME IN ('ORDERS')"));
    }

    #[test]
    fn columns_inline_type_mapping() {
        let types = SqlTypeProvider::for_dialect(DialectName::H2(H2Mode::Regular));
        let sql = H2Queries.columns(&types, "PUBLIC", &["USERS".into()]);
        assert!(sql.contains("WHEN 'CHARACTER VARYING' THEN 12"));
        assert!(sql.contains("WHEN 'CHARACTER VARYING' THEN CHARACTER_MAXIMUM_LENGTH"));
        assert!(sql.contains("IS_IDENTITY = 'YES'"));
    }

    #[test]
    fn mode_probe_reads_settings() {
        assert!(H2Queries
            .mode_probe()
            .unwrap()
            .contains("SETTING_NAME = 'MODE'"));
        assert_eq!(H2Queries.set_schema("APP").unwrap(), "SET SCHEMA APP");
        assert!(H2Queries.set_catalog("X").is_none());
    }
}
