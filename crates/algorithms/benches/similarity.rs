//! Benchmarks for normalization and niche overlap

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nicheoverlap_algorithms::normalize::normalize_grid;
use nicheoverlap_algorithms::similarity::overlap;
use nicheoverlap_core::raster::{AsciiGrid, AsciiHeader};

fn create_test_grid(size: usize, shift: usize) -> AsciiGrid {
    let header = AsciiHeader::new(size, size, 0.0, 0.0, 1.0, "-9999").unwrap();
    // Suitability surface with an ocean of no-data along one edge
    let values: Vec<Option<f64>> = (0..size * size)
        .map(|i| {
            let (row, col) = (i / size, i % size);
            if col < size / 8 {
                None
            } else {
                Some((((row + shift) * 7 + col * 13) % 256) as f64 / 255.0)
            }
        })
        .collect();
    AsciiGrid::from_values(header, &values)
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for size in [256, 512, 1024, 2048] {
        let grid = create_test_grid(size, 0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| normalize_grid(black_box(&grid)).unwrap())
        });
    }
    group.finish();
}

fn bench_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity/overlap");
    for size in [256, 512, 1024, 2048] {
        let x = normalize_grid(&create_test_grid(size, 0)).unwrap();
        let y = normalize_grid(&create_test_grid(size, 3)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| overlap(black_box(&x), black_box(&y)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_overlap);
criterion_main!(benches);
