//! Explainability for rarity scores.
//!
//! Shows which traits made a token rare: the count, probability, attribute
//! score, weight and information of every trait, next to the token's score
//! under each handler. Useful for debugging rankings and for user-facing
//! "why is this rare" views.

use serde::Serialize;

use crate::model::{Collection, Token, TokenId};
use crate::scoring::{Handler, ScoringHandler};
use crate::stats;
use crate::{RarityError, Result};

/// Detailed breakdown of a token's rarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreExplanation {
    /// Explained token.
    pub token_id: TokenId,
    /// One entry per trait the token has, ascending trait-type order.
    pub contributions: Vec<TraitContribution>,
    /// Score under every handler, in [`Handler::ALL`] order.
    pub scores: Vec<(Handler, f64)>,
}

/// How one trait contributes to a token's rarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitContribution {
    /// Trait type.
    pub trait_type: String,
    /// The token's value for it.
    pub trait_value: String,
    /// Tokens sharing this value.
    pub count: u64,
    /// `count / supply`.
    pub probability: f64,
    /// Attribute score, `1 / probability`.
    pub score: f64,
    /// Normalized weight of the trait type.
    pub weight: f64,
    /// Information in bits, `log₂(score)`.
    pub information_bits: f64,
}

impl ScoreExplanation {
    /// Score under `handler`.
    #[must_use]
    pub fn score(&self, handler: Handler) -> Option<f64> {
        self.scores
            .iter()
            .find(|(h, _)| *h == handler)
            .map(|&(_, s)| s)
    }

    /// The trait with the highest attribute score. Earlier trait types win ties.
    #[must_use]
    pub fn rarest_trait(&self) -> Option<&TraitContribution> {
        self.contributions
            .iter()
            .reduce(|best, c| if c.score > best.score { c } else { best })
    }

    /// Total information over all traits, in bits.
    #[must_use]
    pub fn total_information_bits(&self) -> f64 {
        self.contributions.iter().map(|c| c.information_bits).sum()
    }
}

/// Explain `token`'s rarity within `collection`.
///
/// # Errors
///
/// Fails like [`ScoringHandler::score_token`]: unknown pairs yield
/// [`RarityError::InvalidAttribute`] and a token without traits yields
/// [`RarityError::EmptyToken`].
///
/// # Example
///
/// ```rust
/// use rank_rarity::explain::explain_token;
/// use rank_rarity::{Collection, Handler, NullPolicy};
///
/// let c = Collection::from_traits(
///     "demo",
///     [
///         vec![("hat", "crown"), ("eyes", "sleepy")],
///         vec![("hat", "cap"), ("eyes", "sleepy")],
///     ],
///     &NullPolicy::default(),
/// );
///
/// let why = explain_token(&c, &c.tokens()[0]).unwrap();
/// assert_eq!(why.rarest_trait().unwrap().trait_value, "crown");
/// assert!(why.score(Handler::Sum).unwrap() > 2.0);
/// ```
pub fn explain_token(collection: &Collection, token: &Token) -> Result<ScoreExplanation> {
    let contributions = token
        .attributes()
        .iter()
        .map(|(trait_type, trait_value)| {
            let probability = stats::probability(collection, trait_type, trait_value)?;
            let count = collection
                .value_count(trait_type, trait_value)
                .ok_or_else(|| RarityError::InvalidAttribute {
                    trait_type: trait_type.clone(),
                    trait_value: trait_value.clone(),
                })?;
            let score = 1.0 / probability;
            Ok(TraitContribution {
                trait_type: trait_type.clone(),
                trait_value: trait_value.clone(),
                count,
                probability,
                score,
                weight: stats::normalized_weight(collection, trait_type)?,
                information_bits: score.log2(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let scores = Handler::ALL
        .iter()
        .map(|&handler| Ok((handler, handler.score_token(collection, token)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ScoreExplanation {
        token_id: token.id(),
        contributions,
        scores,
    })
}
