use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rank_rarity::{
    information, rank, report::RarityReport, stats, synthetic, AttributeStatistics, Handler,
    RankTieMode, RarityConfig, ScoringHandler, WeightMode,
};

fn bench_statistics(c: &mut Criterion) {
    let mut g = c.benchmark_group("statistics");

    let mixed = synthetic::mixed_collection();
    let token = &mixed.tokens()[1234];

    g.bench_function("precompute_mixed", |bench| {
        bench.iter(|| black_box(AttributeStatistics::new(&mixed)));
    });

    g.bench_function("vector_reference", |bench| {
        bench.iter(|| black_box(stats::token_scores_and_weights(&mixed, token, WeightMode::Normalized)));
    });

    let table = AttributeStatistics::new(&mixed).unwrap();
    g.bench_function("vector_precomputed", |bench| {
        bench.iter(|| black_box(table.scores_and_weights(token, WeightMode::Normalized)));
    });

    g.bench_function("entropy_mixed", |bench| {
        bench.iter(|| black_box(information::collection_entropy(&mixed)));
    });

    g.finish();
}

fn bench_handlers(c: &mut Criterion) {
    let mut g = c.benchmark_group("score_tokens_10k");
    g.sample_size(20);

    let mixed = synthetic::mixed_collection();
    let sequential = RarityConfig::sequential();
    let parallel = RarityConfig::default();

    for handler in Handler::ALL {
        g.bench_with_input(
            BenchmarkId::new("sequential", handler.name()),
            &handler,
            |bench, &h| {
                bench.iter(|| black_box(h.score_tokens_with_config(&mixed, mixed.tokens(), &sequential)));
            },
        );

        g.bench_with_input(
            BenchmarkId::new("default", handler.name()),
            &handler,
            |bench, &h| {
                bench.iter(|| black_box(h.score_tokens_with_config(&mixed, mixed.tokens(), &parallel)));
            },
        );
    }

    g.finish();
}

fn bench_single_token(c: &mut Criterion) {
    let mut g = c.benchmark_group("score_token");

    // 8 traits x 16 values: wider tokens than the mixed collection
    let wide = synthetic::uniform_collection(8, 16, 4096);
    let token = &wide.tokens()[17];

    for handler in Handler::ALL {
        g.bench_function(handler.name(), |bench| {
            bench.iter(|| black_box(handler.score_token(&wide, token)));
        });
    }

    g.finish();
}

fn bench_rank_and_report(c: &mut Criterion) {
    let mut g = c.benchmark_group("rank");
    g.sample_size(20);

    let mixed = synthetic::mixed_collection();
    let scores = Handler::Geometric
        .score_tokens(&mixed, mixed.tokens())
        .unwrap();

    for mode in [RankTieMode::Ordinal, RankTieMode::Competition] {
        g.bench_with_input(
            BenchmarkId::new("rank_scores", format!("{mode:?}")),
            &mode,
            |bench, &m| {
                bench.iter(|| black_box(rank::rank_scores(&scores, m)));
            },
        );
    }

    let config = RarityConfig::default();
    g.bench_function("report_mixed", |bench| {
        bench.iter(|| black_box(RarityReport::build(&mixed, &config)));
    });

    g.finish();
}

criterion_group!(
    benches,
    bench_statistics,
    bench_handlers,
    bench_single_token,
    bench_rank_and_report
);
criterion_main!(benches);
