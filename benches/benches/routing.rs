// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Line, Point, Rect};
use understory_connector::{ConnectorArgs, ConnectorKind, generate_curve};
use understory_route::{ObstacleMap, RouteConfig, RouterKind, route};

/// A row of walls with alternating openings at the top and bottom.
fn gen_slalom(walls: usize) -> Vec<Rect> {
    (0..walls)
        .map(|i| {
            let x0 = 100.0 + i as f64 * 100.0;
            if i % 2 == 0 {
                Rect::new(x0, -200.0, x0 + 20.0, 60.0)
            } else {
                Rect::new(x0, -20.0, x0 + 20.0, 240.0)
            }
        })
        .collect()
}

fn bench_routers(c: &mut Criterion) {
    let mut group = c.benchmark_group("route");
    let config = RouteConfig::default().with_max_iterations(100_000);
    for &walls in &[0usize, 2, 6] {
        let obstacles = gen_slalom(walls);
        let source = Rect::new(0.0, 0.0, 40.0, 40.0);
        let x = 140.0 + walls as f64 * 100.0;
        let target = Rect::new(x, 0.0, x + 40.0, 40.0);
        for kind in [
            RouterKind::Orthogonal,
            RouterKind::RightAngle,
            RouterKind::Manhattan,
            RouterKind::Metro,
        ] {
            group.bench_function(format!("{kind:?}_walls{walls}"), |b| {
                b.iter(|| {
                    let r = route(kind, source, target, &[], &obstacles, &config).unwrap();
                    black_box(r);
                })
            });
        }
    }
    group.finish();
}

fn bench_shared_obstacles(c: &mut Criterion) {
    use understory_route::{Anchor, Manhattan, RouteRequest, Router};

    let mut group = c.benchmark_group("route_shared");
    let config = RouteConfig::default().with_max_iterations(100_000);
    let map = ObstacleMap::build(&gen_slalom(4), config.cell_size).unwrap();
    group.bench_function("manhattan_prebuilt_map", |b| {
        b.iter(|| {
            let request = RouteRequest {
                source: Anchor::Point(Point::new(0.0, 20.0)),
                target: Anchor::Point(Point::new(560.0, 20.0)),
                vertices: &[],
                obstacles: &map,
                config: &config,
            };
            black_box(Manhattan.route(&request).unwrap());
        })
    });
    group.finish();
}

fn bench_connectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect");
    let points: Vec<Point> = (1..64)
        .map(|i| Point::new(i as f64 * 20.0, if i % 2 == 0 { 0.0 } else { 40.0 }))
        .collect();
    let crossings: Vec<Line> = (0..64)
        .map(|i| {
            let x = 5.0 + i as f64 * 20.0;
            Line::new((x, -100.0), (x, 100.0))
        })
        .collect();
    let args = ConnectorArgs {
        crossings: &crossings,
        ..ConnectorArgs::default()
    };
    let source = Point::new(0.0, 0.0);
    let target = Point::new(1_300.0, 0.0);
    for kind in [
        ConnectorKind::Polyline,
        ConnectorKind::Rounded,
        ConnectorKind::Smooth,
        ConnectorKind::JumpOver,
        ConnectorKind::Curve,
    ] {
        group.bench_function(format!("{kind:?}"), |b| {
            b.iter(|| black_box(generate_curve(kind, source, target, &points, &args)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_routers,
    bench_shared_obstacles,
    bench_connectors
);
criterion_main!(benches);
