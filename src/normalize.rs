//! Null-attribute normalization at the ingestion boundary.
//!
//! Metadata sources disagree on how to say "this token does not have the
//! trait": some omit the key, others store `"none"`, `"null"` or `"false"`.
//! The scoring layer only understands key absence, so every sentinel must be
//! stripped before a [`Token`](crate::Token) is built. With both encodings
//! reduced to absence, a collection scores identically however its metadata
//! spelled it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel values that mean "trait absent".
///
/// Matching ignores ASCII case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullPolicy {
    sentinels: Vec<String>,
}

impl Default for NullPolicy {
    fn default() -> Self {
        Self {
            sentinels: ["none", "null", "false", ""]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl NullPolicy {
    /// Policy that keeps every value, including the defaults' sentinels.
    #[must_use]
    pub const fn keep_all() -> Self {
        Self {
            sentinels: Vec::new(),
        }
    }

    /// Add another sentinel value.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        let sentinel = sentinel.into().trim().to_owned();
        if !self.is_null(&sentinel) {
            self.sentinels.push(sentinel);
        }
        self
    }

    /// Configured sentinels.
    #[must_use]
    pub fn sentinels(&self) -> &[String] {
        &self.sentinels
    }

    /// Whether `value` means "trait absent" under this policy.
    #[must_use]
    pub fn is_null(&self, value: &str) -> bool {
        let value = value.trim();
        self.sentinels.iter().any(|s| s.eq_ignore_ascii_case(value))
    }

    /// Collect raw `(trait_type, trait_value)` pairs, dropping sentinel values.
    pub fn normalize<I, K, V>(&self, attributes: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !self.is_null(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinels() {
        let policy = NullPolicy::default();
        assert!(policy.is_null("none"));
        assert!(policy.is_null("NULL"));
        assert!(policy.is_null(" False "));
        assert!(policy.is_null(""));
        assert!(!policy.is_null("true"));
        assert!(!policy.is_null("nonez"));
    }

    #[test]
    fn test_normalize_drops_sentinels() {
        let attrs = NullPolicy::default().normalize([
            ("hat", "cap"),
            ("special", "false"),
            ("eyes", "None"),
        ]);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("hat").map(String::as_str), Some("cap"));
    }

    #[test]
    fn test_keep_all() {
        let attrs = NullPolicy::keep_all().normalize([("special", "false")]);
        assert_eq!(attrs.get("special").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_with_sentinel_dedups() {
        let policy = NullPolicy::keep_all()
            .with_sentinel("n/a")
            .with_sentinel(" N/A ");
        assert_eq!(policy.sentinels(), ["n/a".to_string()]);
        assert!(policy.is_null("N/A"));
    }
}
