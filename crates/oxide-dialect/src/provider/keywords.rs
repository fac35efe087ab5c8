//! Reserved word lists.
//!
//! The baseline is the SQL:2003 reserved word list; vendors add their own
//! words on top. Every list is upper case.

use crate::dialect::{DialectName, H2Mode};

/// SQL:2003 reserved words shared by every dialect.
pub const SQL_2003: &[&str] = &[
    "ABS", "ALL", "ALLOCATE", "ALTER", "AND", "ANY", "ARE", "ARRAY", "AS", "ASENSITIVE",
    "ASYMMETRIC", "AT", "ATOMIC", "AUTHORIZATION", "AVG", "BEGIN", "BETWEEN", "BIGINT",
    "BINARY", "BLOB", "BOOLEAN", "BOTH", "BY", "CALL", "CALLED", "CARDINALITY", "CASCADED",
    "CASE", "CAST", "CEIL", "CEILING", "CHAR", "CHARACTER", "CHARACTER_LENGTH", "CHAR_LENGTH",
    "CHECK", "CLOB", "CLOSE", "COALESCE", "COLLATE", "COLLECT", "COLUMN", "COMMIT",
    "CONDITION", "CONNECT", "CONSTRAINT", "CONVERT", "CORR", "CORRESPONDING", "COUNT",
    "COVAR_POP", "COVAR_SAMP", "CREATE", "CROSS", "CUBE", "CUME_DIST", "CURRENT",
    "CURRENT_DATE", "CURRENT_DEFAULT_TRANSFORM_GROUP", "CURRENT_PATH", "CURRENT_ROLE",
    "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_TRANSFORM_GROUP_FOR_TYPE", "CURRENT_USER",
    "CURSOR", "CYCLE", "DATE", "DAY", "DEALLOCATE", "DEC", "DECIMAL", "DECLARE", "DEFAULT",
    "DELETE", "DENSE_RANK", "DEREF", "DESCRIBE", "DETERMINISTIC", "DISCONNECT", "DISTINCT",
    "DOUBLE", "DROP", "DYNAMIC", "EACH", "ELEMENT", "ELSE", "END", "END-EXEC", "ESCAPE",
    "EVERY", "EXCEPT", "EXEC", "EXECUTE", "EXISTS", "EXP", "EXTERNAL", "EXTRACT", "FALSE",
    "FETCH", "FILTER", "FLOAT", "FLOOR", "FOR", "FOREIGN", "FREE", "FROM", "FULL",
    "FUNCTION", "FUSION", "GET", "GLOBAL", "GRANT", "GROUP", "GROUPING", "HAVING", "HOLD",
    "HOUR", "IDENTITY", "IN", "INDICATOR", "INNER", "INOUT", "INSENSITIVE", "INSERT", "INT",
    "INTEGER", "INTERSECT", "INTERSECTION", "INTERVAL", "INTO", "IS", "JOIN", "LANGUAGE",
    "LARGE", "LATERAL", "LEADING", "LEFT", "LIKE", "LN", "LOCAL", "LOCALTIME",
    "LOCALTIMESTAMP", "LOWER", "MATCH", "MAX", "MEMBER", "MERGE", "METHOD", "MIN", "MINUTE",
    "MOD", "MODIFIES", "MODULE", "MONTH", "MULTISET", "NATIONAL", "NATURAL", "NCHAR",
    "NCLOB", "NEW", "NO", "NONE", "NORMALIZE", "NOT", "NULL", "NULLIF", "NUMERIC",
    "OCTET_LENGTH", "OF", "OLD", "ON", "ONLY", "OPEN", "OR", "ORDER", "OUT", "OUTER",
    "OVER", "OVERLAPS", "OVERLAY", "PARAMETER", "PARTITION", "PERCENTILE_CONT",
    "PERCENTILE_DISC", "PERCENT_RANK", "POSITION", "POWER", "PRECISION", "PREPARE",
    "PRIMARY", "PROCEDURE", "RANGE", "RANK", "READS", "REAL", "RECURSIVE", "REF",
    "REFERENCES", "REFERENCING", "REGR_AVGX", "REGR_AVGY", "REGR_COUNT", "REGR_INTERCEPT",
    "REGR_R2", "REGR_SLOPE", "REGR_SXX", "REGR_SXY", "REGR_SYY", "RELEASE", "RESULT",
    "RETURN", "RETURNS", "REVOKE", "RIGHT", "ROLLBACK", "ROLLUP", "ROW", "ROWS",
    "ROW_NUMBER", "SAVEPOINT", "SCOPE", "SCROLL", "SEARCH", "SECOND", "SELECT",
    "SENSITIVE", "SESSION_USER", "SET", "SIMILAR", "SMALLINT", "SOME", "SPECIFIC",
    "SPECIFICTYPE", "SQL", "SQLEXCEPTION", "SQLSTATE", "SQLWARNING", "SQRT", "START",
    "STATIC", "STDDEV_POP", "STDDEV_SAMP", "SUBMULTISET", "SUBSTRING", "SUM", "SYMMETRIC",
    "SYSTEM", "SYSTEM_USER", "TABLE", "TABLESAMPLE", "THEN", "TIME", "TIMESTAMP",
    "TIMEZONE_HOUR", "TIMEZONE_MINUTE", "TO", "TRAILING", "TRANSLATE", "TRANSLATION",
    "TREAT", "TRIGGER", "TRIM", "TRUE", "UESCAPE", "UNION", "UNIQUE", "UNKNOWN", "UNNEST",
    "UPDATE", "UPPER", "USER", "USING", "VALUE", "VALUES", "VARCHAR", "VARYING", "VAR_POP",
    "VAR_SAMP", "WHEN", "WHENEVER", "WHERE", "WIDTH_BUCKET", "WINDOW", "WITH", "WITHIN",
    "WITHOUT", "YEAR",
];

pub(crate) const H2: &[&str] = &[
    "_ROWID_", "DATABASE", "DAY_OF_WEEK", "DAY_OF_YEAR", "LIMIT", "MINUS", "OFFSET",
    "QUALIFY", "REGEXP", "ROWNUM", "TOP", "SYSDATE", "SYSTIME", "SYSTIMESTAMP", "TODAY",
    "VALUES",
];

pub(crate) const MYSQL: &[&str] = &[
    "ACCESSIBLE", "ANALYZE", "ASC", "BEFORE", "CHANGE", "DATABASE", "DATABASES",
    "DAY_HOUR", "DAY_MICROSECOND", "DAY_MINUTE", "DAY_SECOND", "DELAYED", "DESC",
    "DISTINCTROW", "DIV", "DUAL", "ENCLOSED", "ESCAPED", "EXPLAIN", "FIELDS", "FORCE",
    "FULLTEXT", "GENERATED", "HIGH_PRIORITY", "HOUR_MICROSECOND", "HOUR_MINUTE",
    "HOUR_SECOND", "IGNORE", "INDEX", "INFILE", "KEY", "KEYS", "KILL", "LIMIT", "LINEAR",
    "LINES", "LOAD", "LOCK", "LONG", "LONGBLOB", "LONGTEXT", "LOW_PRIORITY", "MASTER_BIND",
    "MEDIUMBLOB", "MEDIUMINT", "MEDIUMTEXT", "OPTIMIZE", "OPTIONALLY", "OUTFILE", "PURGE",
    "READ_WRITE", "REGEXP", "RENAME", "REPLACE", "REQUIRE", "RLIKE", "SCHEMAS", "SEPARATOR",
    "SHOW", "SPATIAL", "SQL_BIG_RESULT", "SQL_CALC_FOUND_ROWS", "SQL_SMALL_RESULT", "SSL",
    "STARTING", "STORED", "STRAIGHT_JOIN", "TERMINATED", "TINYBLOB", "TINYINT", "TINYTEXT",
    "UNLOCK", "UNSIGNED", "USAGE", "USE", "UTC_DATE", "UTC_TIME", "UTC_TIMESTAMP",
    "VARBINARY", "VIRTUAL", "XOR", "YEAR_MONTH", "ZEROFILL",
];

pub(crate) const MARIADB: &[&str] = &[
    "CURRENT_ROLE", "DELETE_DOMAIN_ID", "DO_DOMAIN_IDS", "GENERAL", "IGNORE_DOMAIN_IDS",
    "IGNORE_SERVER_IDS", "MASTER_HEARTBEAT_PERIOD", "PAGE_CHECKSUM", "PARSE_VCOL_EXPR",
    "POSITION", "REF_SYSTEM_ID", "RETURNING", "SLOW", "STATS_AUTO_RECALC",
    "STATS_PERSISTENT", "STATS_SAMPLE_PAGES",
];

pub(crate) const ORACLE: &[&str] = &[
    "ACCESS", "ADD", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "EXCLUSIVE", "FILE",
    "IDENTIFIED", "IMMEDIATE", "INCREMENT", "INDEX", "INITIAL", "LEVEL", "LOCK", "LONG",
    "MAXEXTENTS", "MINUS", "MLSLABEL", "MODE", "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOWAIT",
    "NUMBER", "OFFLINE", "ONLINE", "OPTION", "PCTFREE", "PRIOR", "PRIVILEGES", "PUBLIC",
    "RAW", "RENAME", "RESOURCE", "ROWID", "ROWNUM", "SESSION", "SHARE", "SIZE", "SYNONYM",
    "SYSDATE", "UID", "VALIDATE", "VARCHAR2", "VIEW",
];

pub(crate) const POSTGRES: &[&str] = &[
    "ANALYSE", "ANALYZE", "ASC", "CONCURRENTLY", "DESC", "DO", "FREEZE", "ILIKE",
    "INITIALLY", "ISNULL", "LIMIT", "NOTNULL", "OFFSET", "PLACING", "RETURNING",
    "VARIADIC", "VERBOSE",
];

pub(crate) const SQLSERVER: &[&str] = &[
    "BACKUP", "BREAK", "BROWSE", "BULK", "CHECKPOINT", "CLUSTERED", "COMPUTE", "CONTAINS",
    "CONTAINSTABLE", "CONTINUE", "DATABASE", "DBCC", "DENY", "DISK", "DISTRIBUTED", "DUMP",
    "ERRLVL", "EXIT", "FILE", "FILLFACTOR", "FREETEXT", "FREETEXTTABLE", "GOTO",
    "HOLDLOCK", "IDENTITYCOL", "IDENTITY_INSERT", "IF", "INDEX", "KEY", "KILL", "LINENO",
    "LOAD", "NOCHECK", "NONCLUSTERED", "OFF", "OFFSETS", "OPENDATASOURCE", "OPENQUERY",
    "OPENROWSET", "OPENXML", "PERCENT", "PIVOT", "PLAN", "PRINT", "PROC", "RAISERROR",
    "READTEXT", "RECONFIGURE", "REPLICATION", "RESTORE", "REVERT", "ROWCOUNT",
    "ROWGUIDCOL", "RULE", "SAVE", "SCHEMA", "SETUSER", "SHUTDOWN", "STATISTICS",
    "TEXTSIZE", "TOP", "TRAN", "TRANSACTION", "TRUNCATE", "TSEQUAL", "UNPIVOT",
    "UPDATETEXT", "USE", "WAITFOR", "WHILE", "WRITETEXT",
];

pub(crate) const SQLITE: &[&str] = &[
    "ABORT", "ACTION", "AFTER", "ANALYZE", "ASC", "ATTACH", "AUTOINCREMENT", "CONFLICT",
    "DATABASE", "DEFERRABLE", "DEFERRED", "DESC", "DETACH", "EXCLUSIVE", "EXPLAIN", "FAIL",
    "GLOB", "IF", "IGNORE", "IMMEDIATE", "INDEX", "INDEXED", "INITIALLY", "INSTEAD",
    "ISNULL", "KEY", "LIMIT", "NOTNULL", "OFFSET", "PLAN", "PRAGMA", "QUERY", "RAISE",
    "REGEXP", "REINDEX", "RENAME", "REPLACE", "RESTRICT", "VACUUM", "VIEW", "VIRTUAL",
];

/// Returns the vendor's reserved words beyond [`SQL_2003`].
///
/// An H2 database running in a compatibility mode also reserves the words
/// of the vendor it emulates.
#[must_use]
pub fn vendor_keywords(dialect: DialectName) -> Vec<&'static str> {
    match dialect {
        DialectName::H2(mode) => {
            let mut words = H2.to_vec();
            let emulated: &[&str] = match mode {
                H2Mode::Regular => &[],
                H2Mode::MySql => MYSQL,
                H2Mode::MariaDb => MARIADB,
                H2Mode::Oracle => ORACLE,
                H2Mode::PostgreSql => POSTGRES,
                H2Mode::SqlServer => SQLSERVER,
            };
            words.extend_from_slice(emulated);
            if mode == H2Mode::MariaDb {
                words.extend_from_slice(MYSQL);
            }
            words
        }
        DialectName::MySql => MYSQL.to_vec(),
        DialectName::MariaDb => {
            let mut words = MYSQL.to_vec();
            words.extend_from_slice(MARIADB);
            words
        }
        DialectName::Oracle => ORACLE.to_vec(),
        DialectName::PostgreSql => POSTGRES.to_vec(),
        DialectName::SqlServer => SQLSERVER.to_vec(),
        DialectName::Sqlite => SQLITE.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_upper_case() {
        for list in [SQL_2003, H2, MYSQL, MARIADB, ORACLE, POSTGRES, SQLSERVER, SQLITE] {
            for word in list {
                assert_eq!(*word, word.to_ascii_uppercase());
            }
        }
    }

    #[test]
    fn mariadb_includes_mysql_words() {
        let words = vendor_keywords(DialectName::MariaDb);
        assert!(words.contains(&"DATABASES"));
        assert!(words.contains(&"RETURNING"));
    }

    #[test]
    fn h2_mode_adds_emulated_words() {
        let regular = vendor_keywords(DialectName::H2(H2Mode::Regular));
        let oracle = vendor_keywords(DialectName::H2(H2Mode::Oracle));
        assert!(!regular.contains(&"VARCHAR2"));
        assert!(oracle.contains(&"VARCHAR2"));
        assert!(oracle.contains(&"_ROWID_"));
    }
}
