//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::model::Collection;
use crate::normalize::NullPolicy;
use crate::rank::RankTieMode;

/// Batches at least this large are scored across threads by default.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Configuration for batch scoring and ranking.
///
/// Deserializable so it can live next to the rest of an application's
/// settings; missing fields fall back to [`Default`].
///
/// ```rust
/// use rank_rarity::{RarityConfig, RankTieMode};
///
/// let config = RarityConfig::default()
///     .with_tie_mode(RankTieMode::Competition)
///     .with_parallel_threshold(4096);
/// assert_eq!(config.parallel_threshold, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityConfig {
    /// Sentinels stripped when building collections from raw traits.
    pub null_policy: NullPolicy,
    /// How equal scores are ranked.
    pub tie_mode: RankTieMode,
    /// Minimum batch size scored in parallel (only with the `parallel` feature).
    pub parallel_threshold: usize,
}

impl Default for RarityConfig {
    fn default() -> Self {
        Self {
            null_policy: NullPolicy::default(),
            tie_mode: RankTieMode::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl RarityConfig {
    /// Never score in parallel.
    #[must_use]
    pub fn sequential() -> Self {
        Self::default().with_parallel_threshold(usize::MAX)
    }

    /// Build a collection from raw trait maps, stripping sentinels with
    /// [`RarityConfig::null_policy`].
    #[must_use]
    pub fn collection_from_traits<I, A, K, V>(&self, slug: impl Into<String>, traits: I) -> Collection
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Collection::from_traits(slug, traits, &self.null_policy)
    }

    /// Set the null policy.
    #[must_use]
    pub fn with_null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }

    /// Set the rank tie mode.
    #[must_use]
    pub fn with_tie_mode(mut self, tie_mode: RankTieMode) -> Self {
        self.tie_mode = tie_mode;
        self
    }

    /// Set the parallel batch threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }
}
