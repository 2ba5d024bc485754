//! Collection and token data model.
//!
//! A [`Collection`] owns an ordered list of [`Token`]s and the distribution of
//! trait values across them. Both are immutable once built: scoring only ever
//! borrows them.
//!
//! Absence of a trait is modeled purely as key absence. Sentinel values such as
//! `"none"` are stripped at construction by a [`NullPolicy`], so the scoring
//! layer never has to special-case them.
//!
//! ```rust
//! use rank_rarity::{Collection, NullPolicy};
//!
//! let collection = Collection::from_traits(
//!     "apes",
//!     [
//!         vec![("hat", "cap"), ("eyes", "laser")],
//!         vec![("hat", "none"), ("eyes", "sleepy")],
//!     ],
//!     &NullPolicy::default(),
//! );
//!
//! assert_eq!(collection.token_total_supply(), 2);
//! assert_eq!(collection.value_count("hat", "cap"), Some(1));
//! assert_eq!(collection.value_count("hat", "none"), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::NullPolicy;
use crate::{RarityError, Result};

/// Trait type → trait value → number of tokens holding that pair.
///
/// Ordered maps keep every walk over the distribution, and therefore every
/// floating-point sum built from it, deterministic.
pub type Distribution = BTreeMap<String, BTreeMap<String, u64>>;

/// Identifier of a token inside its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────────────

/// A single item of a collection, described by its string traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    attributes: BTreeMap<String, String>,
}

impl Token {
    /// Create a token from an already-normalized attribute map.
    #[must_use]
    pub fn new(id: impl Into<TokenId>, attributes: BTreeMap<String, String>) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Create a token from `(trait_type, trait_value)` pairs.
    ///
    /// Later duplicates of a trait type replace earlier ones.
    #[must_use]
    pub fn from_pairs<I, K, V>(id: impl Into<TokenId>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            id,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Token identifier.
    #[must_use]
    pub const fn id(&self) -> TokenId {
        self.id
    }

    /// Trait type → trait value, ordered by trait type.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Value of one trait, if the token has it.
    #[must_use]
    pub fn trait_value(&self, trait_type: &str) -> Option<&str> {
        self.attributes.get(trait_type).map(String::as_str)
    }

    /// Number of traits the token has.
    #[must_use]
    pub fn trait_count(&self) -> usize {
        self.attributes.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collection
// ─────────────────────────────────────────────────────────────────────────────

/// A fixed set of tokens plus the distribution of their trait values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CollectionData")]
pub struct Collection {
    slug: String,
    tokens: Vec<Token>,
    attributes_distribution: Distribution,
}

/// Wire shape of a collection; the distribution may be omitted and is then
/// derived from the tokens.
///
/// Sentinel values are stripped with `null_policy`, which defaults to
/// [`NullPolicy::default`].
#[derive(Deserialize)]
struct CollectionData {
    slug: String,
    tokens: Vec<Token>,
    #[serde(default)]
    attributes_distribution: Option<Distribution>,
    #[serde(default)]
    null_policy: NullPolicy,
}

impl TryFrom<CollectionData> for Collection {
    type Error = RarityError;

    fn try_from(data: CollectionData) -> Result<Self> {
        let policy = data.null_policy;
        let tokens = data
            .tokens
            .into_iter()
            .map(|token| Token::new(token.id, policy.normalize(token.attributes)))
            .collect();
        match data.attributes_distribution {
            Some(mut distribution) => {
                for values in distribution.values_mut() {
                    values.retain(|value, _| !policy.is_null(value));
                }
                Self::with_distribution(data.slug, tokens, distribution)
            }
            None => Ok(Self::new(data.slug, tokens)),
        }
    }
}

impl Collection {
    /// Build a collection, deriving the distribution from the tokens' traits.
    #[must_use]
    pub fn new(slug: impl Into<String>, tokens: Vec<Token>) -> Self {
        let attributes_distribution = derive_distribution(&tokens);
        Self {
            slug: slug.into(),
            tokens,
            attributes_distribution,
        }
    }

    /// Build a collection with an explicit distribution.
    ///
    /// Zero counts are dropped, since a value nobody holds is not part of the
    /// distribution.
    ///
    /// # Errors
    ///
    /// Returns [`RarityError::InvalidDistribution`] if the counts of any trait
    /// type add up to more than the number of tokens. A sum that overflows
    /// `u64` is reported with `total: u64::MAX`.
    pub fn with_distribution(
        slug: impl Into<String>,
        tokens: Vec<Token>,
        mut distribution: Distribution,
    ) -> Result<Self> {
        let supply = tokens.len() as u64;
        distribution.retain(|_, values| {
            values.retain(|_, count| *count > 0);
            !values.is_empty()
        });
        for (trait_type, values) in &distribution {
            let total = values
                .values()
                .try_fold(0u64, |acc, &count| acc.checked_add(count))
                .unwrap_or(u64::MAX);
            if total > supply {
                return Err(RarityError::InvalidDistribution {
                    trait_type: trait_type.clone(),
                    total,
                    supply,
                });
            }
        }
        Ok(Self {
            slug: slug.into(),
            tokens,
            attributes_distribution: distribution,
        })
    }

    /// Build a collection from raw trait maps, one per token.
    ///
    /// Tokens get ids `0..n` in iteration order, and sentinel values matched by
    /// `policy` are dropped so they count as absent traits.
    #[must_use]
    pub fn from_traits<I, A, K, V>(slug: impl Into<String>, traits: I, policy: &NullPolicy) -> Self
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tokens = traits
            .into_iter()
            .enumerate()
            .map(|(idx, attrs)| Token::new(idx as u64, policy.normalize(attrs)))
            .collect();
        Self::new(slug, tokens)
    }

    /// Collection identifier.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Tokens in index order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at `index`, if any.
    #[must_use]
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens in the collection.
    #[must_use]
    pub fn token_total_supply(&self) -> u64 {
        self.tokens.len() as u64
    }

    /// The full trait distribution.
    #[must_use]
    pub const fn attributes_distribution(&self) -> &Distribution {
        &self.attributes_distribution
    }

    /// Trait types present in the collection, in ascending order.
    pub fn trait_types(&self) -> impl Iterator<Item = &str> {
        self.attributes_distribution.keys().map(String::as_str)
    }

    /// Number of tokens holding `trait_type = trait_value`.
    #[must_use]
    pub fn value_count(&self, trait_type: &str, trait_value: &str) -> Option<u64> {
        self.attributes_distribution
            .get(trait_type)
            .and_then(|values| values.get(trait_value))
            .copied()
    }

    /// Number of distinct values observed for `trait_type`.
    #[must_use]
    pub fn distinct_value_count(&self, trait_type: &str) -> Option<usize> {
        self.attributes_distribution.get(trait_type).map(BTreeMap::len)
    }

    /// Number of distinct (trait type, trait value) pairs in the collection.
    #[must_use]
    pub fn total_distinct_values(&self) -> usize {
        self.attributes_distribution.values().map(BTreeMap::len).sum()
    }
}

fn derive_distribution(tokens: &[Token]) -> Distribution {
    let mut distribution = Distribution::new();
    for token in tokens {
        for (trait_type, trait_value) in token.attributes() {
            *distribution
                .entry(trait_type.clone())
                .or_default()
                .entry(trait_value.clone())
                .or_insert(0) += 1;
        }
    }
    distribution
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
