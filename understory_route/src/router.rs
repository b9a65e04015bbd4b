// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router trait, request and result types, and the [`route`] entry point.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::config::RouteConfig;
use crate::error::RouteError;
use crate::geometry::{Direction, is_finite_point, is_finite_rect};
use crate::obstacle::ObstacleMap;
use crate::routers::{Manhattan, Metro, Orthogonal, RightAngle};

/// One end of a link: a bare point or an element's bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// A fixed point.
    Point(Point),
    /// An element box; routes start or end on its boundary.
    Rect(Rect),
}

impl Anchor {
    /// The point a route is aimed at: the point itself, or the rectangle's centre.
    pub fn reference(&self) -> Point {
        match self {
            Self::Point(p) => *p,
            Self::Rect(r) => r.center(),
        }
    }

    /// The anchor's box; a zero-size box for points.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Point(p) => Rect::from_points(*p, *p),
            Self::Rect(r) => r.abs(),
        }
    }

    /// The rectangle, if this anchor is one.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Point(_) => None,
            Self::Rect(r) => Some(r.abs()),
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        match self {
            Self::Point(p) => is_finite_point(*p),
            Self::Rect(r) => is_finite_rect(r),
        }
    }
}

impl From<Point> for Anchor {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Rect> for Anchor {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

/// A computed route.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Ordered points from the resolved source anchor to the resolved target anchor.
    pub points: Vec<Point>,
    /// True if at least one leg could not be searched and used the fallback bend.
    pub degraded: bool,
    /// Direction of the final segment; pass it back as
    /// [`RouteConfig::previous_direction`] on the next call.
    pub last_direction: Option<Direction>,
}

impl Route {
    /// Sum of segment lengths.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Everything a router needs for one link.
#[derive(Clone, Copy, Debug)]
pub struct RouteRequest<'a> {
    /// Where the route starts.
    pub source: Anchor,
    /// Where the route ends.
    pub target: Anchor,
    /// Points the route must visit, in order.
    pub vertices: &'a [Point],
    /// Obstacles to avoid (ignored by routers that do not avoid obstacles).
    pub obstacles: &'a ObstacleMap,
    /// Router configuration.
    pub config: &'a RouteConfig,
}

impl RouteRequest<'_> {
    /// Validate the configuration and reject non-finite coordinates.
    pub fn validate(&self) -> Result<(), RouteError> {
        self.config.validate()?;
        if !(self.source.is_finite()
            && self.target.is_finite()
            && self.vertices.iter().copied().all(is_finite_point))
        {
            return Err(RouteError::NonFiniteInput);
        }
        Ok(())
    }
}

/// A routing strategy.
///
/// Implementations are pure functions of the request: they keep no state between
/// calls and never fail once the request validates.
pub trait Router {
    /// Compute a route for `request`.
    fn route(&self, request: &RouteRequest<'_>) -> Result<Route, RouteError>;
}

/// The built-in routers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouterKind {
    /// Bend-minimizing orthogonal router; ignores obstacles.
    Orthogonal,
    /// Obstacle-avoiding grid search with horizontal and vertical moves.
    Manhattan,
    /// Obstacle-avoiding grid search that also allows 45 degree moves.
    Metro,
    /// Side-aware right-angle router; ignores obstacles.
    RightAngle,
}

impl Router for RouterKind {
    fn route(&self, request: &RouteRequest<'_>) -> Result<Route, RouteError> {
        match self {
            Self::Orthogonal => Orthogonal.route(request),
            Self::Manhattan => Manhattan.route(request),
            Self::Metro => Metro.route(request),
            Self::RightAngle => RightAngle.route(request),
        }
    }
}

/// Route a link from `source` to `target` through `vertices`, avoiding `obstacles`.
///
/// Builds a fresh [`ObstacleMap`] with the configured cell size and dispatches to
/// the router selected by `kind`. Returns an error only for invalid configuration
/// or non-finite input; a search that cannot complete yields a degraded route.
pub fn route(
    kind: RouterKind,
    source: impl Into<Anchor>,
    target: impl Into<Anchor>,
    vertices: &[Point],
    obstacles: &[Rect],
    config: &RouteConfig,
) -> Result<Route, RouteError> {
    config.validate()?;
    let index = if matches!(kind, RouterKind::Orthogonal | RouterKind::RightAngle) {
        ObstacleMap::empty()
    } else {
        ObstacleMap::build(obstacles, config.cell_size)?
    };
    let request = RouteRequest {
        source: source.into(),
        target: target.into(),
        vertices,
        obstacles: &index,
        config,
    };
    kind.route(&request)
}
