// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth cubic spline through all waypoints.
//!
//! With at least one waypoint, the knots `[source, points.., target]` are joined
//! by a C¹-continuous cubic Bézier spline with natural end conditions. The
//! first control point of every segment comes from a tridiagonal system solved
//! per axis by forward elimination and back substitution. The second control
//! point mirrors the next segment's first one through the shared knot.
//!
//! Without waypoints a single cubic is emitted whose control points sit halfway
//! between the ends along the configured axis.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{BezPath, Point};

use crate::connector::Connector;

/// Axis along which a waypoint-free smooth curve bends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Leave and arrive horizontally.
    #[default]
    Horizontal,
    /// Leave and arrive vertically.
    Vertical,
}

/// Global cubic spline through every knot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Smooth {
    /// Bend axis used when there are no waypoints.
    pub axis: Axis,
}

impl Connector for Smooth {
    fn connect(&self, source: Point, target: Point, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(source);
        if points.is_empty() {
            let (c1, c2) = match self.axis {
                Axis::Horizontal => {
                    let x = (source.x + target.x) / 2.0;
                    (Point::new(x, source.y), Point::new(x, target.y))
                }
                Axis::Vertical => {
                    let y = (source.y + target.y) / 2.0;
                    (Point::new(source.x, y), Point::new(target.x, y))
                }
            };
            path.curve_to(c1, c2, target);
            return path;
        }

        let mut knots = Vec::with_capacity(points.len() + 2);
        knots.push(source);
        knots.extend_from_slice(points);
        knots.push(target);
        let (first, second) = control_points(&knots);
        for (i, knot) in knots.iter().skip(1).enumerate() {
            path.curve_to(first[i], second[i], *knot);
        }
        path
    }
}

/// Bézier control points for the spline through `knots`.
///
/// Returns `(first, second)` with one entry per segment. Fewer than two knots
/// yield no segments.
pub fn control_points(knots: &[Point]) -> (Vec<Point>, Vec<Point>) {
    let n = knots.len().saturating_sub(1);
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    if n == 1 {
        // A single segment is a straight line: controls at its thirds.
        let a = knots[0];
        let b = knots[1];
        let c1 = Point::new((2.0 * a.x + b.x) / 3.0, (2.0 * a.y + b.y) / 3.0);
        let c2 = Point::new(2.0 * c1.x - a.x, 2.0 * c1.y - a.y);
        return (vec![c1], vec![c2]);
    }

    let xs = solve_first_controls(&rhs(knots, |p| p.x));
    let ys = solve_first_controls(&rhs(knots, |p| p.y));
    let first: Vec<Point> = xs.iter().zip(&ys).map(|(&x, &y)| Point::new(x, y)).collect();
    let second = (0..n)
        .map(|i| {
            if i + 1 < n {
                let k = knots[i + 1];
                Point::new(2.0 * k.x - first[i + 1].x, 2.0 * k.y - first[i + 1].y)
            } else {
                Point::new(
                    (knots[n].x + first[n - 1].x) / 2.0,
                    (knots[n].y + first[n - 1].y) / 2.0,
                )
            }
        })
        .collect();
    (first, second)
}

fn rhs(knots: &[Point], axis: impl Fn(&Point) -> f64) -> Vec<f64> {
    let n = knots.len() - 1;
    let k: Vec<f64> = knots.iter().map(axis).collect();
    let mut out = Vec::with_capacity(n);
    out.push(k[0] + 2.0 * k[1]);
    for i in 1..n - 1 {
        out.push(4.0 * k[i] + 2.0 * k[i + 1]);
    }
    out.push((8.0 * k[n - 1] + k[n]) / 2.0);
    out
}

/// Solve the tridiagonal system with diagonal `2, 4, .., 4, 3.5` and unit
/// off-diagonals.
fn solve_first_controls(rhs: &[f64]) -> Vec<f64> {
    let n = rhs.len();
    let mut x = vec![0.0; n];
    let mut tmp = vec![0.0; n];
    let mut b = 2.0;
    x[0] = rhs[0] / b;
    for i in 1..n {
        tmp[i] = 1.0 / b;
        b = if i < n - 1 { 4.0 } else { 3.5 } - tmp[i];
        x[i] = (rhs[i] - x[i - 1]) / b;
    }
    for i in 1..n {
        x[n - i - 1] -= tmp[n - i] * x[n - i];
    }
    x
}
