//! # rank-rarity
//!
//! Collection-relative rarity scoring for trait-based token collections.
//!
//! ## Modules
//!
//! | Module | Purpose | Notes |
//! |--------|---------|-------|
//! | [`model`] | `Collection`, `Token`, trait distribution | Immutable after construction |
//! | [`stats`] | Probabilities, score/weight vectors | Reference + precomputed paths |
//! | [`scoring`] | Arithmetic, geometric, harmonic, sum, information content | One enum, one trait |
//! | [`information`] | Collection entropy | Normalizes information content |
//! | [`rank`] | Scores → integer ranks | Deterministic tie-break |
//! | [`explain`] | Per-trait breakdown | Debugging, UI |
//! | [`report`] | Rank table for every handler | Serde rows |
//! | [`normalize`] | Null sentinel stripping | Ingestion boundary |
//! | [`synthetic`] | Collections with known scores | Calibration, benches |
//!
//! ## Pipeline
//!
//! ```text
//! Collection → AttributeStatistics → Handler → scores → ranks → report
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use rank_rarity::{Collection, Handler, NullPolicy, ScoringHandler};
//!
//! let collection = Collection::from_traits(
//!     "apes",
//!     [
//!         vec![("hat", "crown"), ("fur", "gold")],
//!         vec![("hat", "cap"), ("fur", "brown")],
//!         vec![("hat", "cap"), ("fur", "brown")],
//!         vec![("hat", "none"), ("fur", "brown")],
//!     ],
//!     &NullPolicy::default(),
//! );
//!
//! let scores = Handler::InformationContent
//!     .score_tokens(&collection, collection.tokens())
//!     .unwrap();
//! assert!(scores[0] > scores[1]);
//! ```

pub mod config;
mod error;
pub mod explain;
pub mod information;
pub mod kernels;
pub mod model;
pub mod normalize;
pub mod rank;
pub mod report;
pub mod scoring;
pub mod stats;
pub mod synthetic;

pub use config::RarityConfig;
pub use error::{RarityError, Result};
pub use model::{Collection, Distribution, Token, TokenId};
pub use normalize::NullPolicy;
pub use rank::{RankTieMode, RankedToken};
pub use report::{RarityReport, ReportRow};
pub use scoring::{Handler, ScoringHandler};
pub use stats::{AttributeStatistics, AttributeVector, WeightMode};
