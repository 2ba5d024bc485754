#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rank_rarity::{Collection, Handler, NullPolicy, RarityError, ScoringHandler};

#[derive(Arbitrary, Debug)]
struct CollectionInput {
    tokens: Vec<Vec<(u8, u8)>>,
    probe: Vec<(u8, u8)>,
}

fuzz_target!(|input: CollectionInput| {
    // Keep trait spaces small so values repeat.
    let traits = input.tokens.iter().take(256).map(|attrs| {
        attrs
            .iter()
            .take(8)
            .map(|&(k, v)| (format!("t{}", k % 6), format!("v{}", v % 5)))
            .collect::<Vec<_>>()
    });
    let collection = Collection::from_traits("fuzz", traits, &NullPolicy::default());

    for handler in Handler::ALL {
        let batch = handler.score_tokens(&collection, collection.tokens());
        match &batch {
            Ok(scores) => {
                assert_eq!(scores.len(), collection.tokens().len());
                for (token, &score) in collection.tokens().iter().zip(scores) {
                    assert!(score.is_finite() && score >= 0.0);
                    assert_eq!(Ok(score), handler.score_token(&collection, token));
                }
            }
            // Empty tokens, empty collections and zero-entropy collections are data errors.
            Err(RarityError::EmptyToken { .. })
            | Err(RarityError::EmptyCollection)
            | Err(RarityError::NonFinite { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    // Tokens from outside the collection must be rejected, never scored as NaN.
    let probe = rank_rarity::Token::from_pairs(
        u64::MAX,
        input
            .probe
            .iter()
            .map(|&(k, v)| (format!("t{}", k % 8), format!("v{}", v % 7))),
    );
    for handler in Handler::ALL {
        if let Ok(score) = handler.score_token(&collection, &probe) {
            assert!(score.is_finite());
        }
    }
});
