mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use path_scatter::path::{PathExtractor, PathOrder};

const SIZES: [u32; 3] = [128, 256, 512];
const THICKNESS: [u32; 3] = [2, 8, 24];
const DOTTED_SIZES: [u32; 3] = [300, 600, 1200];

fn extraction_benches(c: &mut Criterion) {
    for order in [PathOrder::ScanOrder, PathOrder::Traced] {
        let extractor = PathExtractor::new().with_order(order);
        let mut group = c.benchmark_group(format!("extraction/{order:?}"));

        for &size in &SIZES {
            let guide = common::diagonal_guide(size, 8);
            let expected = extractor.extract(&guide).path().len();
            group.throughput(common::elements_throughput(expected));

            group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
                b.iter(|| black_box(extractor.extract(&guide).path().len()));
            });
        }
        group.finish();
    }
}

fn thinning_benches(c: &mut Criterion) {
    let extractor = PathExtractor::new();
    let mut group = c.benchmark_group("extraction/thickness");

    for &thickness in &THICKNESS {
        let guide = common::diagonal_guide(256, thickness);
        group.bench_with_input(
            BenchmarkId::from_parameter(thickness),
            &thickness,
            |b, _| {
                b.iter(|| black_box(extractor.extract(&guide).is_fallback()));
            },
        );
    }
    group.finish();
}

fn dotted_benches(c: &mut Criterion) {
    let extractor = PathExtractor::new().with_order(PathOrder::Traced);
    let mut group = c.benchmark_group("extraction/dotted");

    for &size in &DOTTED_SIZES {
        let guide = common::dotted_guide(size, 3);
        let dots = (size as usize).div_ceil(3).pow(2);
        group.throughput(common::elements_throughput(dots));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(extractor.extract(&guide).path().len()));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = extraction_benches, thinning_benches, dotted_benches
}
criterion_main!(benches);
