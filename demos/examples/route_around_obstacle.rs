// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route around an obstacle.
//!
//! Route the same pair of elements with every router, then drag the target
//! across a wall and carry the last direction between calls.
//!
//! Run:
//! - `cargo run -p understory_demos --example route_around_obstacle`

use kurbo::{Point, Rect};
use understory_route::{RouteConfig, RouterKind, Sides, route};

fn main() {
    let a = Rect::new(0.0, 0.0, 40.0, 40.0);
    let b = Rect::new(200.0, 100.0, 240.0, 140.0);
    let wall = Rect::new(100.0, -40.0, 120.0, 200.0);
    let config = RouteConfig::default();

    for kind in [
        RouterKind::Orthogonal,
        RouterKind::RightAngle,
        RouterKind::Manhattan,
        RouterKind::Metro,
    ] {
        let r = route(kind, a, b, &[], &[wall], &config).unwrap();
        println!(
            "{kind:?}: {} points, length {:.1}, degraded {}",
            r.points.len(),
            r.length(),
            r.degraded
        );
        for p in &r.points {
            println!("  ({:.1}, {:.1})", p.x, p.y);
        }
    }

    // Force the route to leave from the bottom of A and pass a vertex.
    let config = RouteConfig::default().with_sides(Sides::BOTTOM, Sides::all());
    let r = route(
        RouterKind::Manhattan,
        a,
        b,
        &[Point::new(60.0, 240.0)],
        &[wall],
        &config,
    )
    .unwrap();
    println!("bottom exit via vertex: {:?}", r.points);

    // Drag the target to a spot enclosed by obstacles: the route degrades to a
    // fallback bend, and the previous direction keeps that bend stable.
    let cage = [
        Rect::new(280.0, 80.0, 380.0, 90.0),
        Rect::new(280.0, 150.0, 380.0, 160.0),
        Rect::new(280.0, 80.0, 290.0, 160.0),
        Rect::new(370.0, 80.0, 380.0, 160.0),
    ];
    let mut previous = None;
    for dx in [0.0, 10.0, 20.0] {
        let target = Point::new(320.0 + dx, 120.0);
        let config = RouteConfig::default().with_previous_direction(previous);
        let r = route(RouterKind::Manhattan, a, target, &[], &cage, &config).unwrap();
        println!("drag {dx}: degraded {} {:?}", r.degraded, r.points);
        previous = r.last_direction;
    }
}
