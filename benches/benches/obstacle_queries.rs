// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_route::ObstacleMap;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, size: f64) -> Vec<Rect> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * (extent - size);
            let y0 = rng.next_f64() * (extent - size);
            Rect::new(x0, y0, x0 + size, y0 + size)
        })
        .collect()
}

fn gen_probe_points(count: usize, extent: f64) -> Vec<Point> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * extent, rng.next_f64() * extent))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("obstacle_build");
    for &n in &[100usize, 1_000, 10_000] {
        let rects = gen_random_rects(n, 5_000.0, 60.0);
        group.throughput(Throughput::Elements(n as u64));
        for &cell in &[50.0, 100.0, 400.0] {
            group.bench_function(format!("n{n}_cell{cell}"), |b| {
                b.iter_batched(
                    || rects.clone(),
                    |rects| black_box(ObstacleMap::build(&rects, cell).unwrap()),
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_point_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("obstacle_point");
    let probes = gen_probe_points(4_096, 5_000.0);
    for &n in &[100usize, 1_000, 10_000] {
        let map = ObstacleMap::build(&gen_random_rects(n, 5_000.0, 60.0), 100.0).unwrap();
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("is_blocked_n{n}"), |b| {
            b.iter(|| {
                let hits = probes.iter().filter(|p| map.is_blocked(**p)).count();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_segment_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("obstacle_segment");
    let map = ObstacleMap::build(&gen_random_rects(1_000, 5_000.0, 60.0), 100.0).unwrap();
    let probes = gen_probe_points(1_024, 5_000.0);
    for &len in &[10.0, 100.0, 1_000.0] {
        group.bench_function(format!("exact_len{len}"), |b| {
            b.iter(|| {
                let hits = probes
                    .iter()
                    .filter(|p| map.is_segment_blocked(**p, Point::new(p.x + len, p.y)))
                    .count();
                black_box(hits);
            })
        });
        group.bench_function(format!("sampled_len{len}"), |b| {
            b.iter(|| {
                let clear = probes
                    .iter()
                    .filter(|p| map.is_segment_clear(**p, Point::new(p.x + len, p.y), 10.0))
                    .count();
                black_box(clear);
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_point_queries,
    bench_segment_queries
);
criterion_main!(benches);
