// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight segments between consecutive points.

use kurbo::{BezPath, Point};

use crate::connector::Connector;

/// Straight line segments through every waypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Polyline;

impl Connector for Polyline {
    fn connect(&self, source: Point, target: Point, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(source);
        for p in points {
            path.line_to(*p);
        }
        path.line_to(target);
        path
    }
}
