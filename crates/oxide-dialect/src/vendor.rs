//! Per-vendor wiring.
//!
//! A vendor is not a type hierarchy: it is one [`VendorMetadata`] value
//! composed of a property table, a type registry and a query provider,
//! picked from a single dispatch table keyed on [`DialectName`].

use std::fmt;
use std::sync::Arc;

use crate::dialect::{DialectName, H2Mode};
use crate::identifier::IdentifierManager;
use crate::provider::{PropertyProvider, SqlTypeProvider};
use crate::query::{
    H2Queries, MySqlQueries, OracleQueries, PostgresQueries, QueryProvider, SqlServerQueries,
    SqliteQueries,
};

/// Everything the engine knows statically about one vendor.
#[derive(Clone)]
pub struct VendorMetadata {
    pub dialect: DialectName,
    pub properties: PropertyProvider,
    pub types: SqlTypeProvider,
    pub queries: Arc<dyn QueryProvider>,
}

impl fmt::Debug for VendorMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorMetadata")
            .field("dialect", &self.dialect)
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

impl VendorMetadata {
    /// Wires up the vendor for `dialect`.
    #[must_use]
    pub fn for_dialect(dialect: DialectName) -> Self {
        let queries: Arc<dyn QueryProvider> = match dialect {
            DialectName::H2(_) => Arc::new(H2Queries),
            DialectName::MySql => Arc::new(MySqlQueries::mysql()),
            DialectName::MariaDb => Arc::new(MySqlQueries::mariadb()),
            DialectName::Oracle => Arc::new(OracleQueries),
            DialectName::PostgreSql => Arc::new(PostgresQueries),
            DialectName::SqlServer => Arc::new(SqlServerQueries),
            DialectName::Sqlite => Arc::new(SqliteQueries),
        };
        Self {
            dialect,
            properties: PropertyProvider::for_dialect(dialect),
            types: SqlTypeProvider::for_dialect(dialect),
            queries,
        }
    }

    /// Re-wires an H2 vendor for a discovered compatibility mode. Other
    /// vendors are returned unchanged.
    #[must_use]
    pub fn with_h2_mode(self, mode: H2Mode) -> Self {
        match self.dialect {
            DialectName::H2(current) if current != mode => {
                Self::for_dialect(DialectName::H2(mode))
            }
            _ => self,
        }
    }

    /// Builds a fresh identifier manager from the vendor properties.
    #[must_use]
    pub fn identifier_manager(&self) -> IdentifierManager {
        IdentifierManager::new(&self.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceOption;

    #[test]
    fn mariadb_reuses_mysql_wiring() {
        let mysql = VendorMetadata::for_dialect(DialectName::MySql);
        let mariadb = VendorMetadata::for_dialect(DialectName::MariaDb);
        assert_eq!(mysql.properties.identifier_quote, mariadb.properties.identifier_quote);
        assert_eq!(
            mysql.queries.current_schema(),
            mariadb.queries.current_schema()
        );
        assert_eq!(mariadb.types.default_reference_option, ReferenceOption::Restrict);
    }

    #[test]
    fn h2_mode_rewires_properties() {
        let regular = VendorMetadata::for_dialect(DialectName::H2(H2Mode::Regular));
        assert!(regular.properties.stores_upper_case_identifiers);

        let pg = regular.with_h2_mode(H2Mode::PostgreSql);
        assert_eq!(pg.dialect, DialectName::H2(H2Mode::PostgreSql));
        assert!(pg.properties.stores_lower_case_identifiers);
        assert!(pg.properties.keywords.contains(&"ILIKE"));
    }

    #[test]
    fn h2_mode_is_ignored_elsewhere() {
        let oracle = VendorMetadata::for_dialect(DialectName::Oracle).with_h2_mode(H2Mode::MySql);
        assert_eq!(oracle.dialect, DialectName::Oracle);
    }

    #[test]
    fn every_dialect_has_a_schema_query() {
        for dialect in [
            DialectName::H2(H2Mode::Regular),
            DialectName::MySql,
            DialectName::MariaDb,
            DialectName::Oracle,
            DialectName::PostgreSql,
            DialectName::SqlServer,
            DialectName::Sqlite,
        ] {
            let vendor = VendorMetadata::for_dialect(dialect);
            assert!(vendor.queries.current_schema().contains("CURRENT_NAME"));
        }
    }
}
