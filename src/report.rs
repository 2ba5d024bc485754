//! Per-token rank report.
//!
//! One row per token with the rank of that token under every handler, laid
//! out with the column names the comparison tooling expects. Provider ranks
//! from third parties are joined in by that tooling; this module only fills
//! the engine's own columns.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RarityConfig;
use crate::model::{Collection, TokenId};
use crate::rank::rank_scores;
use crate::scoring::Handler;
use crate::stats::AttributeStatistics;
use crate::Result;

/// Ranks of one token under every handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Collection identifier.
    pub slug: String,
    /// Token identifier.
    pub token_id: TokenId,
    /// Rank under [`Handler::Arithmetic`].
    pub arithmetic: usize,
    /// Rank under [`Handler::Geometric`].
    pub geometric: usize,
    /// Rank under [`Handler::Harmonic`].
    pub harmonic: usize,
    /// Rank under [`Handler::Sum`].
    pub sum: usize,
    /// Rank under [`Handler::InformationContent`].
    pub information_content: usize,
}

impl ReportRow {
    /// Rank under `handler`.
    #[must_use]
    pub const fn rank(&self, handler: Handler) -> usize {
        match handler {
            Handler::Arithmetic => self.arithmetic,
            Handler::Geometric => self.geometric,
            Handler::Harmonic => self.harmonic,
            Handler::Sum => self.sum,
            Handler::InformationContent => self.information_content,
        }
    }
}

/// Rank table for a whole collection, rows in token order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RarityReport {
    rows: Vec<ReportRow>,
}

impl RarityReport {
    /// Column names, in row field order.
    pub const COLUMNS: [&'static str; 7] = [
        "slug",
        "token_id",
        "arithmetic",
        "geometric",
        "harmonic",
        "sum",
        "information_content",
    ];

    /// Score and rank every token of `collection` under every handler.
    ///
    /// Statistics are computed once and shared by all five handlers.
    ///
    /// # Errors
    ///
    /// Fails if any token cannot be scored by any handler.
    pub fn build(collection: &Collection, config: &RarityConfig) -> Result<Self> {
        let stats = AttributeStatistics::new(collection)?;
        let tokens = collection.tokens();

        let mut columns: Vec<Vec<usize>> = Vec::with_capacity(Handler::ALL.len());
        for handler in Handler::ALL {
            let scores = handler.score_tokens_with(&stats, tokens, config)?;
            columns.push(rank_scores(&scores, config.tie_mode));
        }

        let rows = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| ReportRow {
                slug: collection.slug().to_owned(),
                token_id: token.id(),
                arithmetic: columns[0][i],
                geometric: columns[1][i],
                harmonic: columns[2][i],
                sum: columns[3][i],
                information_content: columns[4][i],
            })
            .collect::<Vec<_>>();

        info!(slug = collection.slug(), tokens = rows.len(), "built rarity report");
        Ok(Self { rows })
    }

    /// Rows in token order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `token_id`, if present.
    #[must_use]
    pub fn row(&self, token_id: TokenId) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.token_id == token_id)
    }
}
