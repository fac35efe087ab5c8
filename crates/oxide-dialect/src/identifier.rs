//! Identifier quoting and case folding.
//!
//! An [`IdentifierManager`] is derived from a vendor's
//! [`PropertyProvider`] and answers "how does this database store and
//! compare this name". Managers are immutable once built and are shared
//! process-wide per connection URL through [`identity_manager_for`].

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::provider::{keywords, PropertyProvider};

/// Quoting, case folding and length rules for one vendor.
#[derive(Debug, Clone)]
pub struct IdentifierManager {
    quote: String,
    stores_upper: bool,
    stores_lower: bool,
    stores_upper_quoted: bool,
    stores_lower_quoted: bool,
    supports_mixed: bool,
    supports_mixed_quoted: bool,
    extra_name_characters: String,
    max_length: usize,
    keywords: HashSet<String>,
}

impl IdentifierManager {
    /// Builds a manager from vendor properties.
    #[must_use]
    pub fn new(properties: &PropertyProvider) -> Self {
        let keywords = keywords::SQL_2003
            .iter()
            .chain(properties.keywords.iter())
            .map(|w| (*w).to_string())
            .collect();
        Self {
            quote: properties.identifier_quote.to_string(),
            stores_upper: properties.stores_upper_case_identifiers,
            stores_lower: properties.stores_lower_case_identifiers,
            stores_upper_quoted: properties.stores_upper_case_quoted_identifiers,
            stores_lower_quoted: properties.stores_lower_case_quoted_identifiers,
            supports_mixed: properties.supports_mixed_case_identifiers,
            supports_mixed_quoted: properties.supports_mixed_case_quoted_identifiers,
            extra_name_characters: properties.extra_name_characters.to_string(),
            max_length: properties.max_column_name_length,
            keywords,
        }
    }

    /// The identifier quote string.
    #[must_use]
    pub fn quote_string(&self) -> &str {
        &self.quote
    }

    /// Returns `true` if `identifier` is wrapped in quote strings.
    #[must_use]
    pub fn is_quoted(&self, identifier: &str) -> bool {
        identifier.len() >= 2 * self.quote.len()
            && identifier.starts_with(&self.quote)
            && identifier.ends_with(&self.quote)
    }

    /// Quotes `identifier`, doubling embedded quote strings.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        let escaped = identifier.replace(&self.quote, &self.quote.repeat(2));
        format!("{q}{escaped}{q}", q = self.quote)
    }

    /// Removes surrounding quotes, if any.
    #[must_use]
    pub fn unquote<'a>(&self, identifier: &'a str) -> std::borrow::Cow<'a, str> {
        if self.is_quoted(identifier) {
            let inner = &identifier[self.quote.len()..identifier.len() - self.quote.len()];
            std::borrow::Cow::Owned(inner.replace(&self.quote.repeat(2), &self.quote))
        } else {
            std::borrow::Cow::Borrowed(identifier)
        }
    }

    /// Returns `true` if `identifier` is a reserved word for this vendor.
    #[must_use]
    pub fn is_keyword(&self, identifier: &str) -> bool {
        self.keywords.contains(&identifier.to_ascii_uppercase())
    }

    fn is_legal_unquoted(&self, identifier: &str) -> bool {
        let mut chars = identifier.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        let legal = |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || self.extra_name_characters.contains(c)
        };
        (first.is_ascii_alphabetic() || first == '_' || self.extra_name_characters.contains(first))
            && chars.all(legal)
    }

    /// Returns `true` if `identifier` must be quoted to be used verbatim:
    /// it is a keyword or contains characters illegal in a bare name.
    #[must_use]
    pub fn needs_quotes(&self, identifier: &str) -> bool {
        !self.is_quoted(identifier)
            && (self.is_keyword(identifier) || !self.is_legal_unquoted(identifier))
    }

    /// Folds `identifier` the way the vendor stores it.
    ///
    /// Quoted identifiers keep their case unless the vendor folds quoted
    /// names as well.
    #[must_use]
    pub fn in_proper_case(&self, identifier: &str) -> String {
        let (upper, lower) = if self.is_quoted(identifier) {
            (self.stores_upper_quoted, self.stores_lower_quoted)
        } else {
            (self.stores_upper, self.stores_lower)
        };
        if upper {
            identifier.to_uppercase()
        } else if lower {
            identifier.to_lowercase()
        } else {
            identifier.to_string()
        }
    }

    /// Returns `true` if unquoted names are case sensitive (no folding, or
    /// the vendor supports mixed case).
    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.supports_mixed
    }

    /// Returns `true` when a declared name loses its case unless quoted.
    #[must_use]
    pub fn should_quote_identifiers(&self) -> bool {
        !self.supports_mixed && self.supports_mixed_quoted
    }

    /// Quotes `identifier` if it needs quotes. Dotted names are handled part
    /// by part, and already-quoted parts are left alone.
    #[must_use]
    pub fn quote_if_necessary(&self, identifier: &str) -> String {
        if self.is_quoted(identifier) {
            return identifier.to_string();
        }
        if identifier.contains('.') {
            return identifier
                .split('.')
                .map(|part| self.quote_token_if_necessary(part))
                .collect::<Vec<_>>()
                .join(".");
        }
        self.quote_token_if_necessary(identifier)
    }

    fn quote_token_if_necessary(&self, token: &str) -> String {
        if self.needs_quotes(token) {
            self.quote(token)
        } else {
            token.to_string()
        }
    }

    /// Renders a declared name for DDL.
    ///
    /// A keyword whose declared case differs from the vendor's storage case
    /// is quoted to keep its case; anything else is folded to proper case
    /// and quoted only if necessary.
    #[must_use]
    pub fn quote_identifier_when_wrong_case_or_necessary(&self, identifier: &str) -> String {
        let proper = self.in_proper_case(identifier);
        if self.should_quote_identifiers() && self.is_keyword(identifier) && proper != identifier
        {
            self.quote(identifier)
        } else {
            self.quote_if_necessary(&proper)
        }
    }

    /// Returns `true` if the vendor folds unquoted identifiers to one case.
    #[must_use]
    pub fn folds_identifiers(&self) -> bool {
        self.stores_upper || self.stores_lower
    }

    /// The name a declared identifier is stored under once created through
    /// DDL rendered with
    /// [`quote_identifier_when_wrong_case_or_necessary`](Self::quote_identifier_when_wrong_case_or_necessary).
    #[must_use]
    pub fn stored_name(&self, declared: &str) -> String {
        let rendered = self.quote_identifier_when_wrong_case_or_necessary(declared);
        self.unquote(&rendered).into_owned()
    }

    /// Returns `true` if the catalog name `stored` denotes the declared
    /// identifier `declared`. Vendors that do not fold compare without case.
    #[must_use]
    pub fn matches_stored(&self, declared: &str, stored: &str) -> bool {
        let expected = self.stored_name(declared);
        if self.folds_identifiers() {
            expected == stored
        } else {
            expected.eq_ignore_ascii_case(stored)
        }
    }

    /// Cache key for a name as the catalog stores it. Every spelling that
    /// the vendor resolves to the same object maps to the same key.
    #[must_use]
    pub fn cache_key(&self, stored: &str) -> String {
        if self.folds_identifiers() {
            stored.to_string()
        } else {
            stored.to_lowercase()
        }
    }

    /// Truncates `identifier` to the vendor's maximum length. Names within
    /// the limit, and every name when the vendor has no limit, are returned
    /// unchanged.
    #[must_use]
    pub fn cut_if_necessary(&self, identifier: &str) -> String {
        if self.max_length == 0 || identifier.chars().count() <= self.max_length {
            identifier.to_string()
        } else {
            identifier.chars().take(self.max_length).collect()
        }
    }

    /// The vendor's maximum identifier length (`0` when unlimited).
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

static IDENTITY_MANAGER_CACHE: Lazy<DashMap<String, Arc<IdentifierManager>>> =
    Lazy::new(DashMap::new);

/// Returns the process-wide manager for `url`, building it with `build` the
/// first time the URL is seen.
///
/// Concurrent callers racing on the same URL observe a single construction.
pub fn identity_manager_for(
    url: &str,
    build: impl FnOnce() -> IdentifierManager,
) -> Arc<IdentifierManager> {
    if let Some(existing) = IDENTITY_MANAGER_CACHE.get(url) {
        return Arc::clone(existing.value());
    }
    let entry = IDENTITY_MANAGER_CACHE
        .entry(url.to_string())
        .or_insert_with(|| {
            tracing::debug!(url = %url, "Building identifier manager");
            Arc::new(build())
        });
    Arc::clone(entry.value())
}
