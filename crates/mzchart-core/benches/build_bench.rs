use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mzchart_core::{
    build_series, BuildOptions, Palette, Point, SeriesDescriptor, SeriesId, SeriesProto,
};

fn gen_points(series: usize, per_series: usize) -> (BTreeMap<SeriesId, SeriesDescriptor>, Vec<Point>) {
    let mut descriptors = BTreeMap::new();
    let mut points = Vec::with_capacity(series * per_series);
    for s in 0..series {
        let id = SeriesId::feature(s as u64, 1);
        descriptors.insert(
            id.clone(),
            SeriesDescriptor::new("rt", "intensity").with_sample(format!("sample_{s}")),
        );
        for i in 0..per_series {
            let rt = i as f64 * 0.5;
            // gaussian-ish elution peak
            let y = (-((rt - 60.0) * (rt - 60.0)) / 400.0).exp() * 1e6;
            points.push(Point::with_xy(id.clone(), "rt", rt, "intensity", y));
        }
    }
    (descriptors, points)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_series");
    for &(series, per_series) in &[(5usize, 10_000usize), (20usize, 10_000usize)] {
        let (descriptors, points) = gen_points(series, per_series);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("line_s{series}_n{per_series}")),
            &(),
            |b, _| {
                b.iter_batched(
                    Palette::new,
                    |mut palette| {
                        let opts = BuildOptions::default();
                        let _ = black_box(build_series(&descriptors, &points, &mut palette, &opts));
                    },
                    BatchSize::SmallInput,
                );
            },
        );
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("stick_s{series}_n{per_series}")),
            &(),
            |b, _| {
                b.iter_batched(
                    Palette::new,
                    |mut palette| {
                        let opts = BuildOptions {
                            stick_plot: true,
                            horizontal_offset: 0.5,
                            proto: SeriesProto::mass_peaks(),
                            ..BuildOptions::default()
                        };
                        let _ = black_box(build_series(&descriptors, &points, &mut palette, &opts));
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
