// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline with rounded corners.

use kurbo::{BezPath, Point};
use understory_route::geometry::move_toward;

use crate::connector::Connector;

/// Polyline whose corners are replaced by cubic curves.
///
/// Each corner is cut back toward its neighbours by `radius`, clamped to half
/// the distance to that neighbour so adjacent corners never overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rounded {
    /// Distance from a corner at which the curve starts and ends.
    pub radius: f64,
}

impl Rounded {
    /// Radius used when none is given.
    pub const DEFAULT_RADIUS: f64 = 10.0;
}

impl Default for Rounded {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
        }
    }
}

impl Connector for Rounded {
    fn connect(&self, source: Point, target: Point, points: &[Point]) -> BezPath {
        let radius = self.radius.max(0.0);
        let mut path = BezPath::new();
        path.move_to(source);
        for (i, &corner) in points.iter().enumerate() {
            let prev = if i == 0 { source } else { points[i - 1] };
            let next = points.get(i + 1).copied().unwrap_or(target);
            let before = radius.min(corner.distance(prev) / 2.0);
            let after = radius.min(corner.distance(next) / 2.0);
            let c1 = move_toward(corner, prev, before);
            let c2 = move_toward(corner, next, after);
            path.line_to(c1);
            path.curve_to(c1, corner, c2);
        }
        path.line_to(target);
        path
    }
}
