//! Conformance tests for the scoring handlers.
//!
//! Uses the synthetic collections whose scores can be derived by hand:
//! uniform, one-rare and the 10,000-token mixed collection.

use std::sync::LazyLock;
use std::time::Instant;

use proptest::prelude::*;
use rank_rarity::{
    information::collection_entropy,
    stats::token_scores_and_weights,
    synthetic::{self, mixed_trait_spread, MIXED_SUPPLY},
    Collection, Handler, NullPolicy, RarityError, ScoringHandler, WeightMode,
};

static UNIFORM: LazyLock<Collection> =
    LazyLock::new(|| synthetic::uniform_collection(5, 10, 10_000));

// Token #9999 has a unique value on all 5 attribute types.
static ONE_RARE: LazyLock<Collection> =
    LazyLock::new(|| synthetic::one_rare_collection(5, 10, 10_000));

static MIXED: LazyLock<Collection> = LazyLock::new(synthetic::mixed_collection);

static MIXED_ARITHMETIC: LazyLock<Vec<f64>> = LazyLock::new(|| {
    Handler::Arithmetic
        .score_tokens(&MIXED, MIXED.tokens())
        .unwrap()
});

static MIXED_INFORMATION: LazyLock<Vec<f64>> = LazyLock::new(|| {
    Handler::InformationContent
        .score_tokens(&MIXED, MIXED.tokens())
        .unwrap()
});

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Uniform collection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn geometric_mean_uniform() {
    for idx in [0, 1405, 9999] {
        let score = Handler::Geometric
            .score_token(&UNIFORM, &UNIFORM.tokens()[idx])
            .unwrap();
        assert_close(score, 10.0, 1e-12);
    }
}

#[test]
fn arithmetic_mean_uniform() {
    for idx in [0, 1, 4050, 9998] {
        let score = Handler::Arithmetic
            .score_token(&UNIFORM, &UNIFORM.tokens()[idx])
            .unwrap();
        assert_close(score, 10.0, 1e-12);
    }
}

#[test]
fn harmonic_mean_uniform() {
    let score = Handler::Harmonic
        .score_token(&UNIFORM, &UNIFORM.tokens()[0])
        .unwrap();
    assert_close(score, 10.0, 1e-12);
}

#[test]
fn information_content_uniform() {
    let score = Handler::InformationContent
        .score_token(&UNIFORM, &UNIFORM.tokens()[0])
        .unwrap();
    assert_close(score, 1.0, 1e-12);
}

#[test]
fn uniform_every_token_scores_alike() {
    for (handler, expected) in [
        (Handler::Arithmetic, 10.0),
        (Handler::Geometric, 10.0),
        (Handler::Harmonic, 10.0),
        (Handler::InformationContent, 1.0),
    ] {
        let scores = handler.score_tokens(&UNIFORM, UNIFORM.tokens()).unwrap();
        assert_eq!(scores.len(), 10_000);
        for score in scores {
            assert_close(score, expected, 1e-12);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-rare collection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn geometric_mean_one_rare() {
    // Weights and scores are equal across traits, so the mean is one trait score.
    let common = Handler::Geometric
        .score_token(&ONE_RARE, &ONE_RARE.tokens()[0])
        .unwrap();
    assert_close(common, 10_000.0 / 1_111.0, 1e-12);

    let rare = Handler::Geometric
        .score_token(&ONE_RARE, &ONE_RARE.tokens()[9_999])
        .unwrap();
    assert_close(rare, 10_000.0, 1e-12);
}

#[test]
fn one_rare_token_is_rarest_under_every_handler() {
    for handler in Handler::ALL {
        let ranked = handler.rank_tokens(&ONE_RARE, ONE_RARE.tokens()).unwrap();
        assert_eq!(ranked[0].0 .0, 9_999, "{handler}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mixed collection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn batch_equals_single_for_every_handler() {
    for handler in Handler::ALL {
        let batch = handler.score_tokens(&MIXED, MIXED.tokens()).unwrap();
        assert_eq!(batch.len(), MIXED_SUPPLY as usize);
        for (token, &score) in MIXED.tokens().iter().zip(&batch) {
            assert_eq!(score, handler.score_token(&MIXED, token).unwrap(), "{handler}");
        }
    }
}

#[test]
fn collection_entropy_mixed() {
    let entropy = collection_entropy(&MIXED).unwrap();

    let literal = [0.20f64, 0.30, 0.45, 0.05, 0.80, 0.20, 0.01];
    let expected: f64 = -literal.iter().map(|p| p * p.log2()).sum::<f64>();
    assert_close(entropy, expected, 1e-10);

    let from_spread: f64 = -mixed_trait_spread()
        .values()
        .flat_map(|values| values.values())
        .map(|&count| {
            let p = count as f64 / MIXED_SUPPLY as f64;
            p * p.log2()
        })
        .sum::<f64>();
    assert_close(entropy, from_spread, 1e-12);
}

#[test]
fn every_mixed_score_is_finite_and_positive() {
    for handler in Handler::ALL {
        for score in handler.score_tokens(&MIXED, MIXED.tokens()).unwrap() {
            assert!(score.is_finite() && score > 0.0, "{handler}: {score}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Arithmetic score equals the weighted average of the token's normalized vector.
    #[test]
    fn arithmetic_mean_is_weighted_average(idx in 0usize..10_000) {
        let token = &MIXED.tokens()[idx];
        let score = MIXED_ARITHMETIC[idx];
        prop_assert_eq!(score, Handler::Arithmetic.score_token(&MIXED, token).unwrap());

        let v = token_scores_and_weights(&MIXED, token, WeightMode::Normalized).unwrap();
        let weighted: f64 = v.scores.iter().zip(&v.weights).map(|(s, w)| s * w).sum();
        let total: f64 = v.weights.iter().sum();
        prop_assert!((score - weighted / total).abs() <= 1e-12 * score);
    }

    /// Information content equals total bits over collection entropy.
    #[test]
    fn information_content_is_bits_over_entropy(idx in 0usize..10_000) {
        let token = &MIXED.tokens()[idx];
        let score = MIXED_INFORMATION[idx];
        prop_assert_eq!(score, Handler::InformationContent.score_token(&MIXED, token).unwrap());

        let v = token_scores_and_weights(&MIXED, token, WeightMode::Normalized).unwrap();
        let bits: f64 = -v.scores.iter().map(|s| (1.0 / s).log2()).sum::<f64>();
        let expected = bits / collection_entropy(&MIXED).unwrap();
        prop_assert!((score - expected).abs() <= 1e-12 * expected.max(1.0));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Null attributes
// ─────────────────────────────────────────────────────────────────────────────

fn null_pair(policy: &NullPolicy) -> (Collection, Collection) {
    let with_null = synthetic::collection_with_traits(
        [
            vec![("bottom", "1"), ("hat", "1"), ("special", "true")],
            vec![("bottom", "1"), ("hat", "1")],
            vec![("bottom", "2"), ("hat", "2")],
            vec![("bottom", "2"), ("hat", "2")],
            vec![("bottom", "3"), ("hat", "2")],
        ],
        policy,
    );
    let without_null = synthetic::collection_with_traits(
        [
            vec![("bottom", "1"), ("hat", "1"), ("special", "true")],
            vec![("bottom", "1"), ("hat", "1"), ("special", "false")],
            vec![("bottom", "2"), ("hat", "2"), ("special", "false")],
            vec![("bottom", "2"), ("hat", "2"), ("special", "false")],
            vec![("bottom", "3"), ("hat", "2"), ("special", "false")],
        ],
        policy,
    );
    (with_null, without_null)
}

#[test]
fn information_content_null_attribute() {
    let (with_null, without_null) = null_pair(&NullPolicy::default());

    assert_eq!(
        collection_entropy(&with_null).unwrap(),
        collection_entropy(&without_null).unwrap()
    );
    assert_eq!(
        Handler::InformationContent
            .score_tokens(&with_null, with_null.tokens())
            .unwrap(),
        Handler::InformationContent
            .score_tokens(&without_null, without_null.tokens())
            .unwrap()
    );
}

#[test]
fn every_handler_null_attribute() {
    let (with_null, without_null) = null_pair(&NullPolicy::default());
    for handler in Handler::ALL {
        assert_eq!(
            handler.score_tokens(&with_null, with_null.tokens()).unwrap(),
            handler.score_tokens(&without_null, without_null.tokens()).unwrap(),
            "{handler}"
        );
    }
}

#[test]
fn sentinel_kept_as_value_changes_scores() {
    let (with_null, without_null) = null_pair(&NullPolicy::keep_all());
    assert_ne!(
        collection_entropy(&with_null).unwrap(),
        collection_entropy(&without_null).unwrap()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors and ingestion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn token_without_traits_is_rejected() {
    let c = synthetic::collection_with_traits(
        [vec![("hat", "cap")], vec![("hat", "none")]],
        &NullPolicy::default(),
    );
    for handler in Handler::ALL {
        assert!(matches!(
            handler.score_token(&c, &c.tokens()[1]),
            Err(RarityError::EmptyToken { .. })
        ));
    }
}

#[test]
fn collection_from_json() {
    let json = r#"{
        "slug": "json",
        "tokens": [
            {"id": 10, "attributes": {"hat": "cap", "eyes": "laser"}},
            {"id": 11, "attributes": {"hat": "cap", "eyes": "sleepy"}},
            {"id": 12, "attributes": {"hat": "crown", "eyes": "sleepy"}}
        ]
    }"#;
    let c: Collection = serde_json::from_str(json).unwrap();
    let ranked = Handler::Sum.rank_tokens(&c, c.tokens()).unwrap();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[2].0 .0, 11);
}

#[test]
fn json_sentinel_and_omitted_trait_score_alike() {
    let omitted = r#"{
        "slug": "json",
        "tokens": [
            {"id": 0, "attributes": {"hat": "1", "special": "true"}},
            {"id": 1, "attributes": {"hat": "1"}},
            {"id": 2, "attributes": {"hat": "2"}}
        ]
    }"#;
    let sentinel = r#"{
        "slug": "json",
        "tokens": [
            {"id": 0, "attributes": {"hat": "1", "special": "true"}},
            {"id": 1, "attributes": {"hat": "1", "special": "false"}},
            {"id": 2, "attributes": {"hat": "2", "special": "false"}}
        ]
    }"#;
    let omitted: Collection = serde_json::from_str(omitted).unwrap();
    let sentinel: Collection = serde_json::from_str(sentinel).unwrap();
    for handler in Handler::ALL {
        assert_eq!(
            handler.score_tokens(&omitted, omitted.tokens()).unwrap(),
            handler.score_tokens(&sentinel, sentinel.tokens()).unwrap(),
            "{handler}"
        );
    }
}

#[test]
fn json_distribution_overflow_is_rejected() {
    let json = r#"{
        "slug": "json",
        "tokens": [
            {"id": 0, "attributes": {"hat": "cap"}},
            {"id": 1, "attributes": {"hat": "visor"}}
        ],
        "attributes_distribution": {"hat": {"cap": 18446744073709551615, "visor": 2}}
    }"#;
    let err = serde_json::from_str::<Collection>(json).unwrap_err();
    assert!(err.to_string().contains("hat"), "{err}");
}

#[test]
#[ignore = "timing depends on the host; run with --ignored"]
fn scoring_10k_tokens_is_fast() {
    for handler in [Handler::Arithmetic, Handler::InformationContent] {
        let start = Instant::now();
        handler.score_tokens(&MIXED, MIXED.tokens()).unwrap();
        assert!(start.elapsed().as_secs_f64() < 2.0, "{handler} too slow");
    }
}
