// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catmull-Rom curve with steerable end tangents.
//!
//! Each interior knot gets a tangent perpendicular to the bisector of its two
//! neighbours, scaled by the length of the adjoining segment. The end tangents
//! follow [`CurveDirection`] (or an explicit override) and grow when the curve
//! has to turn more than 45 degrees to reach the next knot. Every Catmull-Rom
//! segment is then converted to a cubic Bézier using the tension.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Point, Rect, Vec2};
use understory_route::geometry::{Bearing, nearest_side, point_box};

use crate::connector::Connector;

/// How a [`Curve`] orients its end tangents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CurveDirection {
    /// Out of the side of the end's box nearest the end point. A bare point
    /// leaves through the side facing its neighbouring knot.
    #[default]
    Auto,
    /// Left or right, whichever side of the box is nearer (or faces the
    /// neighbouring knot for a bare point).
    Horizontal,
    /// Up or down, chosen the same way as [`CurveDirection::Horizontal`].
    Vertical,
    /// Straight at the neighbouring knot.
    ClosestPoint,
    /// Away from the centre of the end's box.
    Outwards,
}

/// Catmull-Rom spline through every knot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
    /// Orientation of the end tangents without an explicit override.
    pub direction: CurveDirection,
    /// Box of the source element; `None` for a bare point.
    pub source_bbox: Option<Rect>,
    /// Box of the target element; `None` for a bare point.
    pub target_bbox: Option<Rect>,
    /// Direction of the source tangent, replacing [`Curve::direction`].
    pub source_direction: Option<Vec2>,
    /// Direction of the target tangent, pointing away from the target.
    pub target_direction: Option<Vec2>,
    /// Full source tangent, used as is.
    pub source_tangent: Option<Vec2>,
    /// Full target tangent, used as is.
    pub target_tangent: Option<Vec2>,
    /// Tangent length relative to the adjoining segment.
    pub distance_coefficient: f64,
    /// Extra end tangent length per radian turned beyond 45 degrees.
    pub angle_tangent_coefficient: f64,
    /// Catmull-Rom tension; non-positive values use the default.
    pub tension: f64,
}

impl Curve {
    /// Default for [`Curve::distance_coefficient`].
    pub const DEFAULT_DISTANCE_COEFFICIENT: f64 = 0.6;
    /// Default for [`Curve::angle_tangent_coefficient`].
    pub const DEFAULT_ANGLE_TANGENT_COEFFICIENT: f64 = 80.0;
    /// Default for [`Curve::tension`].
    pub const DEFAULT_TENSION: f64 = 0.5;

    /// Unit direction the curve takes at `end`, whose neighbouring knot is `next`.
    fn end_direction(&self, end: Point, next: Point, bbox: Option<Rect>) -> Vec2 {
        let bbox = bbox.map(|b| b.abs());
        match self.direction {
            CurveDirection::Auto => {
                let side = match bbox {
                    Some(b) => nearest_side(&b, end),
                    None => nearest_side(&point_box(end), next),
                };
                side.unit()
            }
            CurveDirection::Horizontal => {
                let west = match bbox {
                    Some(b) => end.x - b.x0 < b.x1 - end.x,
                    None => next.x < end.x,
                };
                (if west { Bearing::West } else { Bearing::East }).unit()
            }
            CurveDirection::Vertical => {
                let north = match bbox {
                    Some(b) => end.y - b.y0 < b.y1 - end.y,
                    None => next.y < end.y,
                };
                (if north { Bearing::North } else { Bearing::South }).unit()
            }
            CurveDirection::ClosestPoint => normalize(next - end),
            CurveDirection::Outwards => match bbox {
                Some(b) => normalize(end - b.center()),
                None => normalize(next - end),
            },
        }
    }

    fn end_tangent(
        &self,
        end: Point,
        next: Point,
        bbox: Option<Rect>,
        direction: Option<Vec2>,
        tangent: Option<Vec2>,
    ) -> Vec2 {
        if let Some(t) = tangent {
            return t;
        }
        let direction = direction.map_or_else(|| self.end_direction(end, next, bbox), normalize);
        let along = next - end;
        let mut length = magnitude(along) * self.distance_coefficient;
        let angle = angle_between(direction, along);
        if angle > FRAC_PI_4 {
            length += (angle - FRAC_PI_4) * self.angle_tangent_coefficient;
        }
        direction * length
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self {
            direction: CurveDirection::Auto,
            source_bbox: None,
            target_bbox: None,
            source_direction: None,
            target_direction: None,
            source_tangent: None,
            target_tangent: None,
            distance_coefficient: Self::DEFAULT_DISTANCE_COEFFICIENT,
            angle_tangent_coefficient: Self::DEFAULT_ANGLE_TANGENT_COEFFICIENT,
            tension: Self::DEFAULT_TENSION,
        }
    }
}

impl Connector for Curve {
    fn connect(&self, source: Point, target: Point, points: &[Point]) -> BezPath {
        let mut knots = Vec::with_capacity(points.len() + 2);
        knots.push(source);
        knots.extend_from_slice(points);
        knots.push(target);
        let n = knots.len() - 1;

        let start = self.end_tangent(
            knots[0],
            knots[1],
            self.source_bbox,
            self.source_direction,
            self.source_tangent,
        );
        let end = self.end_tangent(
            knots[n],
            knots[n - 1],
            self.target_bbox,
            self.target_direction,
            self.target_tangent,
        );
        let tau = if self.tension > 0.0 {
            self.tension
        } else {
            Self::DEFAULT_TENSION
        };

        // Incoming and outgoing tangent of every interior knot.
        let mut tangents = vec![(Vec2::ZERO, Vec2::ZERO); n + 1];
        for i in 1..n {
            let prev = if i == 1 { knots[0] + start } else { knots[i - 1] };
            let next = if i == n - 1 { knots[n] + end } else { knots[i + 1] };
            let v1 = normalize(prev - knots[i]);
            let v2 = normalize(next - knots[i]);
            let spread = angle_between(v1, v2);
            let mut rot = (PI - spread) / 2.0;
            if v1.cross(v2) < 0.0 {
                rot = -rot;
            }
            let turn = (knots[i] - knots[i + 1]).cross(knots[i] - knots[i - 1]);
            if spread < FRAC_PI_2 && ((rot < 0.0 && turn < 0.0) || (rot > 0.0 && turn > 0.0)) {
                rot -= PI;
            }
            let t = rotate(v2, rot);
            let before = knots[i - 1].distance(knots[i]) * self.distance_coefficient;
            let after = knots[i].distance(knots[i + 1]) * self.distance_coefficient;
            tangents[i] = (t * before, t * after);
        }

        let mut path = BezPath::new();
        path.move_to(source);
        for i in 0..n {
            let (a, b) = (knots[i], knots[i + 1]);
            let lead = if i == 0 { start } else { tangents[i].1 };
            let p0 = b - lead / tau;
            let p3 = if i == n - 1 {
                a + end / tau
            } else {
                a - tangents[i + 1].0 / tau
            };
            let c1 = a + (b - p0) / (6.0 * tau);
            let c2 = b + (p3 - a) / (6.0 * tau);
            path.curve_to(c1, c2, b);
        }
        path
    }
}

fn magnitude(v: Vec2) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// `v` scaled to unit length; the zero vector stays zero.
fn normalize(v: Vec2) -> Vec2 {
    let m = magnitude(v);
    if m == 0.0 { Vec2::ZERO } else { v / m }
}

/// Unsigned angle between two vectors in radians; zero if either is zero.
fn angle_between(a: Vec2, b: Vec2) -> f64 {
    let m = magnitude(a) * magnitude(b);
    if m == 0.0 {
        return 0.0;
    }
    (a.dot(b) / m).clamp(-1.0, 1.0).acos()
}

fn rotate(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = (radians.sin(), radians.cos());
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}
