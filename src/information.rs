//! Collection entropy.
//!
//! Every (trait type, trait value) pair of the distribution is treated as one
//! outcome of a single categorical variable over the whole collection, with
//! probability `count / supply`:
//!
//! ```text
//! H(collection) = -Σ p · log₂(p)      over every pair
//! ```
//!
//! Information-content scores divide a token's total information by `H`, so a
//! token whose values are collectively as improbable as the collection's whole
//! value space scores `1.0`.

use crate::model::{Collection, Distribution};
use crate::{RarityError, Result};

/// Shannon entropy (bits) of the flattened trait distribution.
///
/// # Errors
///
/// Returns [`RarityError::EmptyCollection`] if the collection has no tokens.
///
/// # Example
///
/// ```rust
/// use rank_rarity::{information::collection_entropy, Collection, NullPolicy};
///
/// let c = Collection::from_traits(
///     "coins",
///     [[("side", "heads")], [("side", "tails")]],
///     &NullPolicy::default(),
/// );
/// assert!((collection_entropy(&c).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn collection_entropy(collection: &Collection) -> Result<f64> {
    let supply = collection.token_total_supply();
    if supply == 0 {
        return Err(RarityError::EmptyCollection);
    }
    Ok(distribution_entropy(
        collection.attributes_distribution(),
        supply,
    ))
}

/// Entropy over `distribution` for a collection of `supply` tokens.
///
/// Walks pairs in ascending (trait type, trait value) order so the sum is
/// reproducible. `supply` must be non-zero.
pub(crate) fn distribution_entropy(distribution: &Distribution, supply: u64) -> f64 {
    let supply = supply as f64;
    -distribution
        .values()
        .flat_map(|values| values.values())
        .map(|&count| {
            let p = count as f64 / supply;
            p * p.log2()
        })
        .sum::<f64>()
}
