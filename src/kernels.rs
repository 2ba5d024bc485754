//! Aggregation kernels over attribute vectors.
//!
//! These are the reference implementations every handler funnels through, on
//! both the single-token and the batch path. Keeping one kernel per
//! aggregation is what guarantees `score_tokens(..)[i] == score_token(..)`.
//!
//! Kernels sum left to right in trait-type order and never reorder terms, so
//! identical inputs give identical bits.
//!
//! All kernels expect a non-empty input with a positive weight sum; handlers
//! check that before calling (see [`ensure_scoreable`]).

use crate::{RarityError, Result};

/// Check that `scores` and `weights` line up and carry positive total weight.
///
/// Returns the weight sum. An empty or zero-weight input yields `Ok(0.0)`,
/// which callers map to [`RarityError::EmptyToken`].
///
/// # Errors
///
/// Returns [`RarityError::DimensionMismatch`] if the lengths differ.
pub fn ensure_scoreable(scores: &[f64], weights: &[f64]) -> Result<f64> {
    if scores.len() != weights.len() {
        return Err(RarityError::DimensionMismatch {
            expected: scores.len(),
            got: weights.len(),
        });
    }
    Ok(weights.iter().sum())
}

/// Weighted arithmetic mean: `Σ(sᵢ·wᵢ) / Σwᵢ`.
#[inline]
#[must_use]
pub fn weighted_arithmetic_mean(scores: &[f64], weights: &[f64]) -> f64 {
    let (weighted, total) = scores
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(num, den), (&s, &w)| (num + s * w, den + w));
    weighted / total
}

/// Weighted geometric mean: `exp(Σ(wᵢ·ln sᵢ) / Σwᵢ)`.
///
/// Scores are `>= 1` by construction, so `ln` never sees a non-positive input.
#[inline]
#[must_use]
pub fn weighted_geometric_mean(scores: &[f64], weights: &[f64]) -> f64 {
    let (log_sum, total) = scores
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(num, den), (&s, &w)| (num + w * s.ln(), den + w));
    (log_sum / total).exp()
}

/// Weighted harmonic mean: `Σwᵢ / Σ(wᵢ / sᵢ)`.
#[inline]
#[must_use]
pub fn weighted_harmonic_mean(scores: &[f64], weights: &[f64]) -> f64 {
    let (total, inverse) = scores
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(den, inv), (&s, &w)| (den + w, inv + w / s));
    total / inverse
}

/// Plain sum of attribute scores.
#[inline]
#[must_use]
pub fn score_sum(scores: &[f64]) -> f64 {
    scores.iter().sum()
}

/// Information carried by a token, in bits: `Σ log₂(sᵢ)`.
///
/// Equivalent to `-Σ log₂(pᵢ)` since every score is an inverse probability.
#[inline]
#[must_use]
pub fn information_bits(scores: &[f64]) -> f64 {
    scores.iter().map(|s| s.log2()).sum()
}
