//! Strategy comparison benchmarks
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lineq::search::{MatchMode, Strategy};

fn build_corpus(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| format!("corpus line number {i} with a stable payload"))
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let lines = build_corpus(10_000);
    // Worst case for the scan-based strategies: the hit is the last line
    let hit = "corpus line number 9999 with a stable payload";
    let miss = "this line appears nowhere in the corpus";

    let mut group = c.benchmark_group("strategies");
    for strategy in Strategy::ALL {
        group.bench_with_input(
            BenchmarkId::new("hit", strategy.name()),
            &strategy,
            |b, strategy| {
                b.iter(|| {
                    strategy.is_match(black_box(&lines), black_box(hit), MatchMode::Substring)
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("miss", strategy.name()),
            &strategy,
            |b, strategy| {
                b.iter(|| {
                    strategy.is_match(black_box(&lines), black_box(miss), MatchMode::Substring)
                })
            },
        );
    }
    group.finish();
}

fn bench_match_modes(c: &mut Criterion) {
    let lines = build_corpus(10_000);
    let query = "corpus line number 5000 with a stable payload";

    let mut group = c.benchmark_group("match_modes");
    for mode in [MatchMode::Substring, MatchMode::WholeLine] {
        group.bench_with_input(
            BenchmarkId::new("kmp", format!("{mode:?}")),
            &mode,
            |b, &mode| b.iter(|| Strategy::Kmp.is_match(black_box(&lines), black_box(query), mode)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_match_modes);
criterion_main!(benches);
