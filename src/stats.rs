//! Attribute statistics: how rare is each trait value.
//!
//! Every handler consumes the same per-token representation: one attribute
//! score per trait the token has, `1 / probability(trait_type, trait_value)`,
//! paired with a weight for that trait type.
//!
//! | Mode | Weight of a trait type |
//! |------|------------------------|
//! | [`WeightMode::Normalized`] | distinct values of the type / distinct values in the collection |
//! | [`WeightMode::Uniform`] | `1.0` |
//!
//! Traits a token lacks contribute nothing to its vectors. They only show up
//! through the denominator of the probability of the values that do appear,
//! which is what makes an omitted key and a stripped sentinel equivalent.
//!
//! Two paths produce the vectors:
//!
//! - [`token_scores_and_weights`] reads the collection directly. It is the
//!   reference path.
//! - [`AttributeStatistics`] precomputes every pair once and is used for
//!   batches. Its output is bit-identical to the reference path because each
//!   entry is computed with the same expression.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::information;
use crate::model::{Collection, Token};
use crate::{RarityError, Result};

/// How trait types are weighted against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightMode {
    /// Weight by the trait type's share of distinct values.
    Normalized,
    /// Every trait type counts once.
    Uniform,
}

/// Per-token attribute scores and their weights, aligned by trait type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeVector {
    /// `1 / probability` per trait, ascending trait-type order.
    pub scores: Vec<f64>,
    /// Weight per trait, same order as `scores`.
    pub weights: Vec<f64>,
}

impl AttributeVector {
    /// Number of scored traits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True if the token had no scoreable traits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            scores: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, score: f64, weight: f64) {
        self.scores.push(score);
        self.weights.push(weight);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference path
// ─────────────────────────────────────────────────────────────────────────────

/// Probability that a token of `collection` has `trait_type = trait_value`.
///
/// # Errors
///
/// - [`RarityError::EmptyCollection`] if the collection has no tokens.
/// - [`RarityError::InvalidAttribute`] if the pair is not in the distribution.
pub fn probability(collection: &Collection, trait_type: &str, trait_value: &str) -> Result<f64> {
    let supply = collection.token_total_supply();
    if supply == 0 {
        return Err(RarityError::EmptyCollection);
    }
    let count = collection
        .value_count(trait_type, trait_value)
        .ok_or_else(|| invalid_attribute(trait_type, trait_value))?;
    Ok(ratio(count, supply))
}

/// Normalized weight of `trait_type`.
///
/// # Errors
///
/// Returns [`RarityError::InvalidAttribute`] if the trait type is unknown.
pub fn normalized_weight(collection: &Collection, trait_type: &str) -> Result<f64> {
    let distinct = collection
        .distinct_value_count(trait_type)
        .ok_or_else(|| invalid_attribute(trait_type, ""))?;
    Ok(ratio(
        distinct as u64,
        collection.total_distinct_values() as u64,
    ))
}

/// Attribute scores and weights for one token, read straight from the collection.
///
/// # Errors
///
/// Returns [`RarityError::InvalidAttribute`] if the token holds a pair the
/// collection does not know.
pub fn token_scores_and_weights(
    collection: &Collection,
    token: &Token,
    mode: WeightMode,
) -> Result<AttributeVector> {
    let mut vector = AttributeVector::with_capacity(token.trait_count());
    for (trait_type, trait_value) in token.attributes() {
        let score = attribute_score(probability(collection, trait_type, trait_value)?);
        let weight = match mode {
            WeightMode::Normalized => normalized_weight(collection, trait_type)?,
            WeightMode::Uniform => 1.0,
        };
        vector.push(score, weight);
    }
    Ok(vector)
}

#[inline]
fn attribute_score(probability: f64) -> f64 {
    1.0 / probability
}

#[inline]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator as f64
}

fn invalid_attribute(trait_type: &str, trait_value: &str) -> RarityError {
    RarityError::InvalidAttribute {
        trait_type: trait_type.to_owned(),
        trait_value: trait_value.to_owned(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Precomputed statistics
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct TraitStats<'a> {
    weight: f64,
    scores: HashMap<&'a str, f64>,
}

/// Collection-scoped statistics, computed once and shared by reference.
///
/// Holds the attribute score of every (trait type, trait value) pair, the
/// normalized weight of every trait type, and the collection entropy. Entropy
/// is computed on first use and read-only afterwards, so a single instance can
/// be shared across threads while scoring a batch.
#[derive(Debug)]
pub struct AttributeStatistics<'a> {
    collection: &'a Collection,
    traits: HashMap<&'a str, TraitStats<'a>>,
    entropy: OnceLock<f64>,
}

impl<'a> AttributeStatistics<'a> {
    /// Precompute statistics for `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`RarityError::EmptyCollection`] if the collection has no tokens.
    pub fn new(collection: &'a Collection) -> Result<Self> {
        let supply = collection.token_total_supply();
        if supply == 0 {
            return Err(RarityError::EmptyCollection);
        }
        let total_distinct = collection.total_distinct_values() as u64;

        let traits = collection
            .attributes_distribution()
            .iter()
            .map(|(trait_type, values)| {
                let scores = values
                    .iter()
                    .map(|(value, &count)| (value.as_str(), attribute_score(ratio(count, supply))))
                    .collect();
                let stats = TraitStats {
                    weight: ratio(values.len() as u64, total_distinct),
                    scores,
                };
                (trait_type.as_str(), stats)
            })
            .collect::<HashMap<_, _>>();

        debug!(
            slug = collection.slug(),
            supply,
            trait_types = traits.len(),
            distinct_values = total_distinct,
            "computed attribute statistics"
        );

        Ok(Self {
            collection,
            traits,
            entropy: OnceLock::new(),
        })
    }

    /// The collection these statistics describe.
    #[must_use]
    pub const fn collection(&self) -> &'a Collection {
        self.collection
    }

    /// Attribute score (`1 / probability`) of a pair.
    ///
    /// # Errors
    ///
    /// Returns [`RarityError::InvalidAttribute`] if the pair is unknown.
    pub fn attribute_score(&self, trait_type: &str, trait_value: &str) -> Result<f64> {
        self.traits
            .get(trait_type)
            .and_then(|t| t.scores.get(trait_value))
            .copied()
            .ok_or_else(|| invalid_attribute(trait_type, trait_value))
    }

    /// Normalized weight of a trait type.
    ///
    /// # Errors
    ///
    /// Returns [`RarityError::InvalidAttribute`] if the trait type is unknown.
    pub fn weight(&self, trait_type: &str) -> Result<f64> {
        self.traits
            .get(trait_type)
            .map(|t| t.weight)
            .ok_or_else(|| invalid_attribute(trait_type, ""))
    }

    /// Same result as [`token_scores_and_weights`], from the precomputed table.
    ///
    /// # Errors
    ///
    /// Returns [`RarityError::InvalidAttribute`] if the token holds an unknown pair.
    pub fn scores_and_weights(&self, token: &Token, mode: WeightMode) -> Result<AttributeVector> {
        let mut vector = AttributeVector::with_capacity(token.trait_count());
        for (trait_type, trait_value) in token.attributes() {
            let stats = self
                .traits
                .get(trait_type.as_str())
                .ok_or_else(|| invalid_attribute(trait_type, trait_value))?;
            let score = stats
                .scores
                .get(trait_value.as_str())
                .copied()
                .ok_or_else(|| invalid_attribute(trait_type, trait_value))?;
            let weight = match mode {
                WeightMode::Normalized => stats.weight,
                WeightMode::Uniform => 1.0,
            };
            vector.push(score, weight);
        }
        Ok(vector)
    }

    /// Collection entropy, computed once.
    pub fn entropy(&self) -> f64 {
        *self.entropy.get_or_init(|| {
            let entropy = information::distribution_entropy(
                self.collection.attributes_distribution(),
                self.collection.token_total_supply(),
            );
            debug!(slug = self.collection.slug(), entropy, "computed collection entropy");
            entropy
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
