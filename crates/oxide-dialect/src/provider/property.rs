//! Static identifier and capability properties of a vendor.

use crate::dialect::{DialectName, H2Mode};

use super::keywords;

/// Identifier rules and capability flags of one vendor.
///
/// Pure data: vendors start from [`PropertyProvider::ansi`] and override the
/// fields that differ with struct update syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyProvider {
    /// String used to quote identifiers.
    pub identifier_quote: &'static str,
    /// Unquoted identifiers are folded to upper case.
    pub stores_upper_case_identifiers: bool,
    /// Unquoted identifiers are folded to lower case.
    pub stores_lower_case_identifiers: bool,
    /// Quoted identifiers are folded to upper case.
    pub stores_upper_case_quoted_identifiers: bool,
    /// Quoted identifiers are folded to lower case.
    pub stores_lower_case_quoted_identifiers: bool,
    /// Unquoted identifiers are case sensitive.
    pub supports_mixed_case_identifiers: bool,
    /// Quoted identifiers are case sensitive.
    pub supports_mixed_case_quoted_identifiers: bool,
    /// Characters beyond `[A-Za-z0-9_]` legal in an unquoted identifier.
    pub extra_name_characters: &'static str,
    /// Maximum identifier length; `0` means unlimited.
    pub max_column_name_length: usize,
    pub supports_alter_table_with_add_column: bool,
    pub supports_alter_table_with_drop_column: bool,
    pub supports_multiple_result_sets: bool,
    pub supports_select_for_update: bool,
    /// `UPDATE ... LIMIT` / `DELETE ... LIMIT` support when it is fixed for
    /// the vendor. SQLite overrides this with a live probe.
    pub supports_limit_with_update_or_delete: bool,
    /// The vendor has a catalog level above schemas.
    pub supports_catalogs: bool,
    /// Vendor reserved words beyond SQL:2003.
    pub keywords: Vec<&'static str>,
}

impl PropertyProvider {
    /// Defaults for an ANSI information-schema vendor.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            identifier_quote: "\"",
            stores_upper_case_identifiers: true,
            stores_lower_case_identifiers: false,
            stores_upper_case_quoted_identifiers: false,
            stores_lower_case_quoted_identifiers: false,
            supports_mixed_case_identifiers: false,
            supports_mixed_case_quoted_identifiers: true,
            extra_name_characters: "",
            max_column_name_length: 128,
            supports_alter_table_with_add_column: true,
            supports_alter_table_with_drop_column: true,
            supports_multiple_result_sets: false,
            supports_select_for_update: true,
            supports_limit_with_update_or_delete: false,
            supports_catalogs: true,
            keywords: Vec::new(),
        }
    }

    /// Properties for the given dialect.
    #[must_use]
    pub fn for_dialect(dialect: DialectName) -> Self {
        let keywords = keywords::vendor_keywords(dialect);
        match dialect {
            DialectName::H2(mode) => Self::h2(mode, keywords),
            DialectName::MySql | DialectName::MariaDb => Self {
                identifier_quote: "`",
                stores_upper_case_identifiers: false,
                supports_mixed_case_identifiers: true,
                extra_name_characters: "#@",
                max_column_name_length: 64,
                supports_multiple_result_sets: true,
                supports_limit_with_update_or_delete: true,
                keywords,
                ..Self::ansi()
            },
            DialectName::Oracle => Self {
                extra_name_characters: "$#",
                supports_catalogs: false,
                keywords,
                ..Self::ansi()
            },
            DialectName::PostgreSql => Self {
                stores_upper_case_identifiers: false,
                stores_lower_case_identifiers: true,
                max_column_name_length: 63,
                supports_multiple_result_sets: true,
                keywords,
                ..Self::ansi()
            },
            DialectName::SqlServer => Self {
                stores_upper_case_identifiers: false,
                supports_mixed_case_quoted_identifiers: false,
                extra_name_characters: "$#@",
                supports_multiple_result_sets: true,
                supports_select_for_update: false,
                keywords,
                ..Self::ansi()
            },
            DialectName::Sqlite => Self {
                stores_upper_case_identifiers: false,
                supports_mixed_case_identifiers: true,
                max_column_name_length: 0,
                supports_alter_table_with_drop_column: false,
                supports_select_for_update: false,
                supports_catalogs: false,
                keywords,
                ..Self::ansi()
            },
        }
    }

    fn h2(mode: H2Mode, keywords: Vec<&'static str>) -> Self {
        let lower = matches!(
            mode,
            H2Mode::MySql | H2Mode::MariaDb | H2Mode::PostgreSql
        );
        Self {
            stores_upper_case_identifiers: !lower,
            stores_lower_case_identifiers: lower,
            max_column_name_length: 256,
            supports_limit_with_update_or_delete: matches!(
                mode,
                H2Mode::MySql | H2Mode::MariaDb
            ),
            keywords,
            ..Self::ansi()
        }
    }
}
