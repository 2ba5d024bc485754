//! Scoring handlers.
//!
//! # Overview
//!
//! A handler turns a token's attribute vector into one collection-relative
//! rarity score. Higher always means rarer.
//!
//! | Handler | Formula | Weights |
//! |---------|---------|---------|
//! | **Arithmetic** | `Σ(sᵢ·wᵢ) / Σwᵢ` | normalized |
//! | **Geometric** | `exp(Σ(wᵢ·ln sᵢ) / Σwᵢ)` | normalized |
//! | **Harmonic** | `Σwᵢ / Σ(wᵢ / sᵢ)` | normalized |
//! | **Sum** | `Σsᵢ` | uniform |
//! | **InformationContent** | `Σ log₂ sᵢ / H(collection)` | uniform |
//!
//! `sᵢ` is the attribute score `1 / p(trait_type, trait_value)` and `H` the
//! collection entropy (see [`information`](crate::information)).
//!
//! # Single token vs batch
//!
//! [`ScoringHandler::score_token`] reads the collection directly and is the
//! reference path. [`ScoringHandler::score_tokens`] builds one
//! [`AttributeStatistics`] up front and reuses it for every token, optionally
//! across threads. Both feed the same kernels in the same order, so
//! `score_tokens(c, ts)[i] == score_token(c, &ts[i])` holds exactly.
//!
//! # Example
//!
//! ```rust
//! use rank_rarity::{Collection, Handler, NullPolicy, ScoringHandler};
//!
//! let collection = Collection::from_traits(
//!     "demo",
//!     [
//!         vec![("hat", "cap"), ("eyes", "laser")],
//!         vec![("hat", "cap"), ("eyes", "sleepy")],
//!         vec![("hat", "crown"), ("eyes", "sleepy")],
//!     ],
//!     &NullPolicy::default(),
//! );
//!
//! let scores = Handler::Geometric
//!     .score_tokens(&collection, collection.tokens())
//!     .unwrap();
//! assert_eq!(scores.len(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::RarityConfig;
use crate::information;
use crate::kernels;
use crate::model::{Collection, Token, TokenId};
use crate::rank::sort_scored_desc;
use crate::stats::{self, AttributeStatistics, AttributeVector, WeightMode};
use crate::{RarityError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Handler trait
// ─────────────────────────────────────────────────────────────────────────────

/// A rarity aggregation over a collection.
///
/// ## Invariants
///
/// - `score_tokens(c, ts)[i] == score_token(c, &ts[i])` bit for bit.
/// - Every successful score is finite and positive; the mean handlers are
///   always `>= 1`. Information content alone may be `0`.
/// - A token with no traits fails with [`RarityError::EmptyToken`].
pub trait ScoringHandler {
    /// Score one token.
    ///
    /// # Errors
    ///
    /// See [`RarityError`]; a token from another collection yields
    /// [`RarityError::InvalidAttribute`].
    fn score_token(&self, collection: &Collection, token: &Token) -> Result<f64>;

    /// Score many tokens; output is aligned with `tokens`.
    ///
    /// # Errors
    ///
    /// Fails on the first token that [`score_token`](Self::score_token) would
    /// reject.
    fn score_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<Vec<f64>>;

    /// Score one token against precomputed statistics.
    ///
    /// Same result as [`score_token`](Self::score_token) on
    /// `stats.collection()`.
    ///
    /// # Errors
    ///
    /// Same as [`score_token`](Self::score_token).
    fn score_token_with(&self, stats: &AttributeStatistics<'_>, token: &Token) -> Result<f64>;

    /// Score tokens and sort them rarest first.
    ///
    /// Equal scores keep the order of `tokens`.
    ///
    /// # Errors
    ///
    /// Same as [`score_tokens`](Self::score_tokens).
    fn rank_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<Vec<(TokenId, f64)>> {
        let scores = self.score_tokens(collection, tokens)?;
        let mut results: Vec<(TokenId, f64)> = tokens
            .iter()
            .map(Token::id)
            .zip(scores)
            .collect();
        sort_scored_desc(&mut results);
        Ok(results)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handler enum
// ─────────────────────────────────────────────────────────────────────────────

/// The built-in aggregation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handler {
    /// Weighted arithmetic mean of attribute scores.
    Arithmetic,
    /// Weighted geometric mean of attribute scores.
    Geometric,
    /// Weighted harmonic mean of attribute scores.
    Harmonic,
    /// Unweighted sum of attribute scores.
    Sum,
    /// Information content normalized by collection entropy.
    InformationContent,
}

impl Handler {
    /// Every handler, in report column order.
    pub const ALL: [Self; 5] = [
        Self::Arithmetic,
        Self::Geometric,
        Self::Harmonic,
        Self::Sum,
        Self::InformationContent,
    ];

    /// Column name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Geometric => "geometric",
            Self::Harmonic => "harmonic",
            Self::Sum => "sum",
            Self::InformationContent => "information_content",
        }
    }

    /// Weighting this handler aggregates with.
    #[must_use]
    pub const fn weight_mode(self) -> WeightMode {
        match self {
            Self::Arithmetic | Self::Geometric | Self::Harmonic => WeightMode::Normalized,
            Self::Sum | Self::InformationContent => WeightMode::Uniform,
        }
    }

    /// Score a batch against precomputed statistics.
    ///
    /// With the `parallel` feature, batches of at least
    /// `config.parallel_threshold` tokens are scored across threads. Output
    /// order always matches `tokens`.
    ///
    /// # Errors
    ///
    /// See [`ScoringHandler::score_tokens`].
    pub fn score_tokens_with(
        self,
        stats: &AttributeStatistics<'_>,
        tokens: &[Token],
        config: &RarityConfig,
    ) -> Result<Vec<f64>> {
        if self == Self::InformationContent {
            // Entropy is written once here, then only read by every token.
            stats.entropy();
        }
        debug!(
            handler = self.name(),
            slug = stats.collection().slug(),
            tokens = tokens.len(),
            "scoring batch"
        );

        #[cfg(feature = "parallel")]
        if tokens.len() >= config.parallel_threshold {
            use rayon::prelude::*;
            return tokens
                .par_iter()
                .map(|token| self.score_token_with(stats, token))
                .collect();
        }
        #[cfg(not(feature = "parallel"))]
        let _ = config;

        tokens
            .iter()
            .map(|token| self.score_token_with(stats, token))
            .collect()
    }

    /// Score a batch with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`ScoringHandler::score_tokens`].
    pub fn score_tokens_with_config(
        self,
        collection: &Collection,
        tokens: &[Token],
        config: &RarityConfig,
    ) -> Result<Vec<f64>> {
        let stats = AttributeStatistics::new(collection)?;
        self.score_tokens_with(&stats, tokens, config)
    }

    /// Apply this handler's kernel to an attribute vector.
    ///
    /// `entropy` is only evaluated by [`Handler::InformationContent`].
    fn aggregate<F>(self, token_id: TokenId, vector: &AttributeVector, entropy: F) -> Result<f64>
    where
        F: FnOnce() -> Result<f64>,
    {
        let AttributeVector { scores, weights } = vector;
        let weight_sum = kernels::ensure_scoreable(scores, weights)?;
        if scores.is_empty() || weight_sum <= 0.0 {
            return Err(RarityError::EmptyToken { token_id });
        }

        let score = match self {
            Self::Arithmetic => kernels::weighted_arithmetic_mean(scores, weights),
            Self::Geometric => kernels::weighted_geometric_mean(scores, weights),
            Self::Harmonic => kernels::weighted_harmonic_mean(scores, weights),
            Self::Sum => kernels::score_sum(scores),
            Self::InformationContent => kernels::information_bits(scores) / entropy()?,
        };
        trace!(handler = self.name(), %token_id, score, "scored token");
        self.check_finite(token_id, score)
    }

    /// Information content is zero for a token holding only traits every
    /// token shares; every other handler must stay strictly positive.
    fn check_finite(self, token_id: TokenId, value: f64) -> Result<f64> {
        let in_range = match self {
            Self::InformationContent => value >= 0.0,
            _ => value > 0.0,
        };
        if value.is_finite() && in_range {
            Ok(value)
        } else {
            warn!(handler = self.name(), %token_id, value, "rejected non-finite score");
            Err(RarityError::NonFinite {
                handler: self.name(),
                token_id,
                value,
            })
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ScoringHandler for Handler {
    fn score_token(&self, collection: &Collection, token: &Token) -> Result<f64> {
        let vector = stats::token_scores_and_weights(collection, token, self.weight_mode())?;
        self.aggregate(token.id(), &vector, || information::collection_entropy(collection))
    }

    fn score_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<Vec<f64>> {
        self.score_tokens_with_config(collection, tokens, &RarityConfig::default())
    }

    fn score_token_with(&self, stats: &AttributeStatistics<'_>, token: &Token) -> Result<f64> {
        let vector = stats.scores_and_weights(token, self.weight_mode())?;
        self.aggregate(token.id(), &vector, || Ok(stats.entropy()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
