mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use path_scatter::prelude::*;

const COUNTS: [usize; 3] = [5, 25, 100];

fn layout_benches(c: &mut Criterion) {
    let guide = common::diagonal_guide(512, 2);
    let pool = common::swatch_pool(5, 32);

    for mode in PlacementMode::ALL {
        let mut group = c.benchmark_group(format!("layout/{mode}"));

        for &count in &COUNTS {
            let config = LayoutConfig::new()
                .with_mode(mode)
                .with_count(count)
                .with_seed(42);
            group.throughput(common::elements_throughput(count));

            group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
                b.iter(|| {
                    let result = run_layout(&guide, &pool, &config);
                    black_box(result.map(|r| r.plan.len()).unwrap_or(0))
                });
            });
        }
        group.finish();
    }
}

fn jitter_benches(c: &mut Criterion) {
    let guide = common::diagonal_guide(512, 2);
    let pool = common::swatch_pool(3, 64);
    let mut group = c.benchmark_group("layout/jitter");

    let cases = [
        ("none", LayoutConfig::new().without_jitter()),
        ("default", LayoutConfig::new()),
        ("rotation_only", LayoutConfig::new().without_jitter().with_max_rotation(180.0)),
    ];
    for (name, config) in cases {
        let config = config.with_count(20).with_seed(7);
        group.bench_function(name, |b| {
            b.iter(|| black_box(run_layout(&guide, &pool, &config).is_ok()));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = layout_benches, jitter_benches
}
criterion_main!(benches);
