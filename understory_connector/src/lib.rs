// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_connector --heading-base-level=0

//! Understory Connector: drawable paths for routed links.
//!
//! A router produces an ordered list of points. A connector turns the resolved
//! source point, the interior waypoints, and the resolved target point into a
//! Kurbo [`BezPath`].
//!
//! - [`Polyline`]: straight segments through every point.
//! - [`Rounded`]: straight segments with each corner replaced by a cubic arc.
//! - [`Smooth`]: a C¹ cubic spline through every point.
//! - [`JumpOver`]: a polyline that hops over crossing segments of other links.
//! - [`Curve`]: a Catmull-Rom curve whose end tangents follow the element sides
//!   or an explicit direction.
//!
//! Connectors never fail. Every returned path starts with a move-to the source
//! and ends at the target.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{PathEl, Point};
//! use understory_connector::{ConnectorArgs, ConnectorKind, generate_curve};
//!
//! let source = Point::new(0.0, 0.0);
//! let target = Point::new(100.0, 100.0);
//! let path = generate_curve(
//!     ConnectorKind::Rounded,
//!     source,
//!     target,
//!     &[Point::new(100.0, 0.0)],
//!     &ConnectorArgs::default(),
//! );
//! assert_eq!(path.elements()[0], PathEl::MoveTo(source));
//! assert!(matches!(path.elements().last(), Some(PathEl::LineTo(p)) if *p == target));
//! ```
//!
//! Routes from `understory_route` plug in directly: pass the first and last
//! route points as `source` and `target` and the rest as waypoints.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod connector;
pub mod connectors;

pub use connector::Connector;
pub use connectors::{
    Axis, Curve, CurveDirection, JumpOver, JumpStyle, Polyline, Rounded, Smooth,
};

use kurbo::{BezPath, Line, Point, Rect};

/// The built-in connectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    /// Straight segments.
    #[default]
    Polyline,
    /// Straight segments with rounded corners.
    Rounded,
    /// Smooth cubic spline.
    Smooth,
    /// Polyline with jumps over crossings.
    JumpOver,
    /// Catmull-Rom curve with side-aware end tangents.
    Curve,
}

/// Parameters for [`generate_curve`].
///
/// Each connector reads only the fields it needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorArgs<'a> {
    /// Corner radius for [`ConnectorKind::Rounded`].
    pub radius: f64,
    /// Bend axis for [`ConnectorKind::Smooth`] without waypoints.
    pub axis: Axis,
    /// Jump half-width for [`ConnectorKind::JumpOver`].
    pub jump_size: f64,
    /// Jump shape for [`ConnectorKind::JumpOver`].
    pub jump_style: JumpStyle,
    /// Corner radius for [`ConnectorKind::JumpOver`]; `0` keeps corners sharp.
    pub jump_radius: f64,
    /// Segments [`ConnectorKind::JumpOver`] hops over.
    pub crossings: &'a [Line],
    /// End tangent orientation for [`ConnectorKind::Curve`].
    pub curve_direction: CurveDirection,
    /// Source element box for [`ConnectorKind::Curve`]; `None` for a bare point.
    pub source_bbox: Option<Rect>,
    /// Target element box for [`ConnectorKind::Curve`]; `None` for a bare point.
    pub target_bbox: Option<Rect>,
}

impl Default for ConnectorArgs<'_> {
    fn default() -> Self {
        Self {
            radius: Rounded::DEFAULT_RADIUS,
            axis: Axis::Horizontal,
            jump_size: JumpOver::DEFAULT_SIZE,
            jump_style: JumpStyle::Arc,
            jump_radius: 0.0,
            crossings: &[],
            curve_direction: CurveDirection::Auto,
            source_bbox: None,
            target_bbox: None,
        }
    }
}

/// Build the path for `kind` from `source` through `points` to `target`.
pub fn generate_curve(
    kind: ConnectorKind,
    source: Point,
    target: Point,
    points: &[Point],
    args: &ConnectorArgs<'_>,
) -> BezPath {
    match kind {
        ConnectorKind::Polyline => Polyline.connect(source, target, points),
        ConnectorKind::Rounded => Rounded { radius: args.radius }.connect(source, target, points),
        ConnectorKind::Smooth => Smooth { axis: args.axis }.connect(source, target, points),
        ConnectorKind::JumpOver => JumpOver {
            size: args.jump_size,
            style: args.jump_style,
            radius: args.jump_radius,
            crossings: args.crossings,
        }
        .connect(source, target, points),
        ConnectorKind::Curve => Curve {
            direction: args.curve_direction,
            source_bbox: args.source_bbox,
            target_bbox: args.target_bbox,
            ..Curve::default()
        }
        .connect(source, target, points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    fn end_point(path: &BezPath) -> Option<Point> {
        match path.elements().last()? {
            PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) => Some(*p),
            _ => None,
        }
    }

    #[test]
    fn every_connector_spans_source_to_target() {
        let source = Point::new(0.0, 0.0);
        let target = Point::new(200.0, 80.0);
        let waypoints = [Point::new(100.0, 0.0), Point::new(100.0, 80.0)];
        let crossings = [Line::new((150.0, 0.0), (150.0, 200.0))];
        let args = ConnectorArgs {
            crossings: &crossings,
            ..ConnectorArgs::default()
        };
        let none: &[Point] = &[];
        for kind in [
            ConnectorKind::Polyline,
            ConnectorKind::Rounded,
            ConnectorKind::Smooth,
            ConnectorKind::JumpOver,
            ConnectorKind::Curve,
        ] {
            for points in [&waypoints[..], none] {
                let path = generate_curve(kind, source, target, points, &args);
                assert_eq!(path.elements()[0], PathEl::MoveTo(source), "{kind:?}");
                assert_eq!(end_point(&path), Some(target), "{kind:?}");
            }
        }
    }

    #[test]
    fn args_reach_the_connector() {
        let source = Point::new(0.0, 0.0);
        let target = Point::new(100.0, 100.0);
        let corner = [Point::new(100.0, 0.0)];
        let tight = generate_curve(
            ConnectorKind::Rounded,
            source,
            target,
            &corner,
            &ConnectorArgs {
                radius: 4.0,
                ..ConnectorArgs::default()
            },
        );
        assert_eq!(tight.elements()[1], PathEl::LineTo(Point::new(96.0, 0.0)));
    }

    #[test]
    fn curve_reads_its_boxes_from_the_args() {
        let source = Point::new(0.0, 0.0);
        let target = Point::new(100.0, 100.0);
        let args = ConnectorArgs {
            source_bbox: Some(Rect::new(-20.0, -40.0, 20.0, 0.0)),
            ..ConnectorArgs::default()
        };
        let path = generate_curve(ConnectorKind::Curve, source, target, &[], &args);
        let PathEl::CurveTo(c1, _, _) = path.elements()[1] else {
            panic!("expected a cubic, got {:?}", path.elements());
        };
        // The box puts the source on its bottom side, so the curve leaves downward.
        assert!(c1.x.abs() < 1e-9 && c1.y > 0.0, "{c1:?}");
    }
}
