// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector styles.
//!
//! Route one link, then draw it with every connector and print SVG path data.
//! A second link crossing the first shows the jump-over styles, and the curve
//! connector is drawn with the element boxes it leaves and enters.
//!
//! Run:
//! - `cargo run -p understory_demos --example connector_styles`

use kurbo::{Line, Rect};
use understory_connector::{
    ConnectorArgs, ConnectorKind, CurveDirection, JumpStyle, generate_curve,
};
use understory_route::{RouteConfig, RouterKind, route};

fn main() {
    let a = Rect::new(0.0, 0.0, 40.0, 40.0);
    let b = Rect::new(200.0, 160.0, 240.0, 200.0);
    let r = route(RouterKind::Manhattan, a, b, &[], &[], &RouteConfig::default()).unwrap();
    let (source, target) = (r.points[0], r.points[r.points.len() - 1]);
    let waypoints = &r.points[1..r.points.len() - 1];

    // Another link's segments, running straight through the first one.
    let crossings = [
        Line::new((120.0, -40.0), (120.0, 240.0)),
        Line::new((-40.0, 100.0), (280.0, 100.0)),
    ];

    for kind in [
        ConnectorKind::Polyline,
        ConnectorKind::Rounded,
        ConnectorKind::Smooth,
    ] {
        let path = generate_curve(kind, source, target, waypoints, &ConnectorArgs::default());
        println!("{kind:?}: {}", path.to_svg());
    }

    // Curve ends leave through the side of the element they sit on.
    for direction in [CurveDirection::Auto, CurveDirection::Outwards] {
        let args = ConnectorArgs {
            curve_direction: direction,
            source_bbox: Some(a),
            target_bbox: Some(b),
            ..ConnectorArgs::default()
        };
        let path = generate_curve(ConnectorKind::Curve, source, target, waypoints, &args);
        println!("Curve {direction:?}: {}", path.to_svg());
    }

    for style in [JumpStyle::Arc, JumpStyle::Gap, JumpStyle::Cubic] {
        let args = ConnectorArgs {
            jump_style: style,
            jump_radius: 6.0,
            crossings: &crossings,
            ..ConnectorArgs::default()
        };
        let path = generate_curve(ConnectorKind::JumpOver, source, target, waypoints, &args);
        println!("JumpOver {style:?}: {}", path.to_svg());
    }
}
