//! Rank transformation.
//!
//! Reports compare this engine against third-party rank providers, which
//! publish integer ranks rather than scores. Rank 1 is the rarest token.
//!
//! Ties are resolved deterministically: the sort is stable and descending, so
//! tokens with equal scores keep ascending token-index order.
//!
//! | Mode | Scores `[9, 7, 7, 3]` |
//! |------|-----------------------|
//! | [`RankTieMode::Ordinal`] | `[1, 2, 3, 4]` |
//! | [`RankTieMode::Competition`] | `[1, 2, 2, 4]` |

use serde::{Deserialize, Serialize};

use crate::config::RarityConfig;
use crate::model::{Collection, TokenId};
use crate::scoring::Handler;
use crate::stats::AttributeStatistics;
use crate::Result;

/// How tokens with equal scores are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTieMode {
    /// Distinct ranks; the lower token index wins a tie.
    #[default]
    Ordinal,
    /// Equal scores share the best rank and the following rank is skipped.
    Competition,
}

/// A token with its score and rank under one handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedToken {
    /// Token identifier.
    pub token_id: TokenId,
    /// Handler score.
    pub score: f64,
    /// 1-based rank, 1 = rarest.
    pub rank: usize,
}

/// Sort `(id, score)` pairs by descending score, keeping input order on ties.
pub fn sort_scored_desc<I>(results: &mut [(I, f64)]) {
    results.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// 1-based ranks aligned with `scores`.
///
/// ```rust
/// use rank_rarity::rank::{rank_scores, RankTieMode};
///
/// let ranks = rank_scores(&[3.0, 9.0, 7.0, 7.0], RankTieMode::Competition);
/// assert_eq!(ranks, vec![4, 1, 2, 2]);
/// ```
#[must_use]
pub fn rank_scores(scores: &[f64], mode: RankTieMode) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks = vec![0; scores.len()];
    for (pos, &idx) in order.iter().enumerate() {
        let rank = match mode {
            RankTieMode::Ordinal => pos + 1,
            RankTieMode::Competition if pos > 0 && scores[order[pos - 1]] == scores[idx] => {
                ranks[order[pos - 1]]
            }
            RankTieMode::Competition => pos + 1,
        };
        ranks[idx] = rank;
    }
    ranks
}

/// Score every token of `collection` with `handler` and rank them, rarest first.
///
/// # Errors
///
/// Propagates scoring errors (see [`RarityError`](crate::RarityError)).
pub fn ranked_tokens(
    collection: &Collection,
    handler: Handler,
    config: &RarityConfig,
) -> Result<Vec<RankedToken>> {
    let stats = AttributeStatistics::new(collection)?;
    let scores = handler.score_tokens_with(&stats, collection.tokens(), config)?;
    let ranks = rank_scores(&scores, config.tie_mode);

    let mut ranked: Vec<RankedToken> = collection
        .tokens()
        .iter()
        .zip(scores.into_iter().zip(ranks))
        .map(|(token, (score, rank))| RankedToken {
            token_id: token.id(),
            score,
            rank,
        })
        .collect();
    ranked.sort_by_key(|r| r.rank);
    Ok(ranked)
}
