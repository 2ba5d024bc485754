#![no_main]

use libfuzzer_sys::fuzz_target;
use rank_rarity::rank::{rank_scores, RankTieMode};

fuzz_target!(|data: &[u8]| {
    let scores: Vec<f64> = data
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .filter(|s| s.is_finite())
        .collect();

    // Should not panic on any input
    let ordinal = rank_scores(&scores, RankTieMode::Ordinal);
    let competition = rank_scores(&scores, RankTieMode::Competition);

    assert_eq!(ordinal.len(), scores.len());
    for (o, c) in ordinal.iter().zip(&competition) {
        assert!(c <= o);
        assert!(*o >= 1 && *o <= scores.len());
    }
});
