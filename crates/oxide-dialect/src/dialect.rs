//! Dialect identification.
//!
//! A [`DialectName`] is resolved once from a connection URL (or a driver
//! name) and selects the vendor metadata wired up in
//! [`VendorMetadata::for_dialect`](crate::vendor::VendorMetadata::for_dialect).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MetadataError, Result};

/// Compatibility mode of an H2 database.
///
/// H2 emulates other vendors; the mode changes keyword lists, identifier
/// case folding and which reference options are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum H2Mode {
    /// Native H2 behavior.
    #[default]
    Regular,
    /// `MODE=MySQL`.
    MySql,
    /// `MODE=MariaDB`.
    MariaDb,
    /// `MODE=Oracle`.
    Oracle,
    /// `MODE=PostgreSQL`.
    PostgreSql,
    /// `MODE=MSSQLServer`.
    SqlServer,
}

impl H2Mode {
    /// Parses the value of H2's `MODE` setting. Unknown modes fall back to
    /// [`H2Mode::Regular`].
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "MYSQL" => Self::MySql,
            "MARIADB" => Self::MariaDb,
            "ORACLE" => Self::Oracle,
            "POSTGRESQL" => Self::PostgreSql,
            "MSSQLSERVER" => Self::SqlServer,
            _ => Self::Regular,
        }
    }
}

/// A supported SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectName {
    /// H2, in the given compatibility mode.
    H2(H2Mode),
    /// MySQL.
    MySql,
    /// MariaDB.
    MariaDb,
    /// Oracle Database.
    Oracle,
    /// PostgreSQL.
    PostgreSql,
    /// Microsoft SQL Server.
    SqlServer,
    /// SQLite.
    Sqlite,
}

impl DialectName {
    /// Resolves the dialect from a connection URL such as
    /// `postgres://host/db`, `sqlite::memory:` or `jdbc:h2:mem:test`.
    pub fn from_url(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        let without_jdbc = trimmed
            .strip_prefix("jdbc:")
            .or_else(|| trimmed.strip_prefix("r2dbc:"))
            .unwrap_or(trimmed);
        let scheme = without_jdbc
            .split(':')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::from_driver_name(&scheme)
            .map_err(|_| MetadataError::UnsupportedDialect(url.to_string()))
    }

    /// Resolves the dialect from a driver or vendor name.
    pub fn from_driver_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "h2" => Ok(Self::H2(H2Mode::Regular)),
            "mysql" => Ok(Self::MySql),
            "mariadb" => Ok(Self::MariaDb),
            "oracle" => Ok(Self::Oracle),
            "postgres" | "postgresql" | "pgsql" => Ok(Self::PostgreSql),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(MetadataError::UnsupportedDialect(other.to_string())),
        }
    }

    /// Returns the dialect name used in logs and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::H2(_) => "h2",
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::Oracle => "oracle",
            Self::PostgreSql => "postgresql",
            Self::SqlServer => "sqlserver",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns `true` for MySQL and MariaDB, where a catalog doubles as a
    /// schema.
    #[must_use]
    pub fn is_mysql_family(self) -> bool {
        matches!(self, Self::MySql | Self::MariaDb)
    }
}

impl fmt::Display for DialectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::H2(H2Mode::Regular) => f.write_str("h2"),
            Self::H2(mode) => write!(f, "h2 ({mode:?} mode)"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_from_url() {
        assert_eq!(
            DialectName::from_url("postgres://localhost/app").unwrap(),
            DialectName::PostgreSql
        );
        assert_eq!(
            DialectName::from_url("sqlite::memory:").unwrap(),
            DialectName::Sqlite
        );
        assert_eq!(
            DialectName::from_url("jdbc:h2:mem:test").unwrap(),
            DialectName::H2(H2Mode::Regular)
        );
        assert_eq!(
            DialectName::from_url("mariadb://db/app").unwrap(),
            DialectName::MariaDb
        );
        assert_eq!(
            DialectName::from_url("jdbc:sqlserver://host;databaseName=x").unwrap(),
            DialectName::SqlServer
        );
    }

    #[test]
    fn unknown_driver_is_fatal() {
        let err = DialectName::from_url("cockroach://host/db").unwrap_err();
        assert!(matches!(err, MetadataError::UnsupportedDialect(ref u) if u == "cockroach://host/db"));
        assert!(!err.is_unsupported_feature());
    }

    #[test]
    fn h2_mode_setting() {
        assert_eq!(H2Mode::from_setting("MSSQLServer"), H2Mode::SqlServer);
        assert_eq!(H2Mode::from_setting("PostgreSQL"), H2Mode::PostgreSql);
        assert_eq!(H2Mode::from_setting(""), H2Mode::Regular);
        assert_eq!(H2Mode::from_setting("DB2"), H2Mode::Regular);
    }

    #[test]
    fn display_includes_h2_mode() {
        assert_eq!(DialectName::H2(H2Mode::Oracle).to_string(), "h2 (Oracle mode)");
        assert_eq!(DialectName::MySql.to_string(), "mysql");
    }
}
