//! Error types for rarity scoring.

use thiserror::Error;

use crate::model::TokenId;

/// Errors surfaced by the scoring engine.
///
/// None of these are recoverable inside the engine: they indicate either a
/// mismatch between a token and its collection or a broken invariant.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RarityError {
    /// The (trait type, trait value) pair is not part of the collection's distribution.
    #[error("attribute {trait_type}={trait_value:?} is not part of the collection distribution")]
    InvalidAttribute {
        /// Requested trait type.
        trait_type: String,
        /// Requested trait value.
        trait_value: String,
    },

    /// Token has no scoreable attributes.
    #[error("token {token_id} has no scoreable attributes")]
    EmptyToken {
        /// Offending token.
        token_id: TokenId,
    },

    /// A handler produced a score that is not a finite positive number.
    #[error("{handler} produced non-finite score {value} for token {token_id}")]
    NonFinite {
        /// Handler column name.
        handler: &'static str,
        /// Offending token.
        token_id: TokenId,
        /// The rejected value.
        value: f64,
    },

    /// Value counts for one trait type add up to more than the supply.
    #[error("trait type {trait_type:?} counts {total} tokens but supply is {supply}")]
    InvalidDistribution {
        /// Trait type whose counts overflow.
        trait_type: String,
        /// Sum of its value counts, `u64::MAX` if the sum overflows.
        total: u64,
        /// Collection supply.
        supply: u64,
    },

    /// Score and weight vectors have different lengths.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Operation needs at least one token.
    #[error("collection has no tokens")]
    EmptyCollection,
}

/// Result alias for rarity operations.
pub type Result<T> = std::result::Result<T, RarityError>;
