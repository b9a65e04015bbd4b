// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side-aware right-angle router.
//!
//! Every end of a leg leaves or enters through one side: an explicit side when
//! exactly one is allowed, otherwise the side facing the other end of the leg.
//! The route steps out of that side by the margin (elements only; bare points
//! have none) and the pair of sides selects a fixed pattern of up to four
//! joints that keeps clear of both padded boxes. Obstacles are not considered.
//!
//! Vertices are entered through the side facing the next knot and left through
//! the opposite side, so a route never doubles back at a vertex.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::config::Sides;
use crate::error::RouteError;
use crate::geometry::{Bearing, Direction, dedup_points, nearest_side, point_box, remove_collinear};
use crate::router::{Anchor, Route, RouteRequest, Router};
use crate::routers::orthogonal::{DEFAULT_PADDING, clip_ends};

/// Router that picks a side per end and joins the sides with right angles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RightAngle;

impl Router for RightAngle {
    fn route(&self, request: &RouteRequest<'_>) -> Result<Route, RouteError> {
        request.validate()?;
        let config = request.config;
        if matches!(request.source, Anchor::Rect(_)) && config.start_sides.is_empty() {
            return Err(RouteError::NoStartSides);
        }
        if matches!(request.target, Anchor::Rect(_)) && config.end_sides.is_empty() {
            return Err(RouteError::NoEndSides);
        }
        let margin = config.padding_or(DEFAULT_PADDING);
        let target_point = request.target.reference();

        let mut points: Vec<Point> = Vec::new();
        let mut from = Endpoint::anchor(&request.source, config.start_sides, margin);
        for (i, &vertex) in request.vertices.iter().enumerate() {
            let next = request.vertices.get(i + 1).copied().unwrap_or(target_point);
            let side = nearest_side(&point_box(next), vertex);
            push_leg(&mut points, &from, &Endpoint::vertex(vertex, side));
            from = Endpoint::vertex(vertex, side.opposite());
        }
        let to = Endpoint::anchor(&request.target, config.end_sides, margin);
        push_leg(&mut points, &from, &to);

        clip_ends(&mut points, &request.source, &request.target);
        let last_direction = match points.as_slice() {
            [.., a, b] if a != b => Some(Direction::between(*a, *b, 4)),
            _ => None,
        };
        Ok(Route {
            points,
            degraded: false,
            last_direction,
        })
    }
}

/// One end of a leg.
#[derive(Clone, Copy, Debug)]
struct Endpoint {
    point: Point,
    bbox: Rect,
    margin: f64,
    /// `None` picks the side facing the other end.
    side: Option<Bearing>,
}

impl Endpoint {
    fn anchor(anchor: &Anchor, sides: Sides, margin: f64) -> Self {
        Self {
            point: anchor.reference(),
            bbox: anchor.bounds(),
            margin: if anchor.rect().is_some() { margin } else { 0.0 },
            side: single_side(sides),
        }
    }

    fn vertex(point: Point, side: Bearing) -> Self {
        Self {
            point,
            bbox: point_box(point),
            margin: 0.0,
            side: Some(side),
        }
    }

    fn side_toward(&self, other: Point) -> Bearing {
        self.side
            .unwrap_or_else(|| nearest_side(&point_box(self.point), other))
    }

    /// The anchor moved out past the margin on `side`.
    fn outside(&self, side: Bearing) -> Point {
        let padded = self.bbox.inflate(self.margin, self.margin);
        match side {
            Bearing::West => Point::new(padded.x0, self.point.y),
            Bearing::East => Point::new(padded.x1, self.point.y),
            Bearing::North => Point::new(self.point.x, padded.y0),
            Bearing::South => Point::new(self.point.x, padded.y1),
        }
    }
}

/// The side named by `sides` when it names exactly one.
fn single_side(sides: Sides) -> Option<Bearing> {
    [
        (Sides::TOP, Bearing::North),
        (Sides::RIGHT, Bearing::East),
        (Sides::BOTTOM, Bearing::South),
        (Sides::LEFT, Bearing::West),
    ]
    .into_iter()
    .find_map(|(flag, side)| (sides == flag).then_some(side))
}

fn push_leg(points: &mut Vec<Point>, from: &Endpoint, to: &Endpoint) {
    let mut leg = vec![from.point];
    leg.extend(joints(from, to));
    leg.push(to.point);
    dedup_points(&mut leg);
    remove_collinear(&mut leg);
    tracing::trace!(
        from = ?from.side,
        to = ?to.side,
        points = leg.len(),
        "right-angle leg joined"
    );
    let skip = usize::from(points.last() == leg.first());
    points.extend(leg.into_iter().skip(skip));
}

/// Joint points strictly between the two ends of a leg.
#[allow(
    clippy::too_many_lines,
    reason = "One arm per pair of sides reads better than sixteen helpers."
)]
fn joints(source: &Endpoint, target: &Endpoint) -> Vec<Point> {
    use Bearing::{East, North, South, West};

    let source_side = source.side_toward(target.point);
    let target_side = target.side_toward(source.point);
    let Point { x: sox, y: soy } = source.outside(source_side);
    let Point { x: tox, y: toy } = target.outside(target_side);

    let Rect { x0: sx0, y0: sy0, x1: sx1, y1: sy1 } = source.bbox;
    let Rect { x0: tx0, y0: ty0, x1: tx1, y1: ty1 } = target.bbox;
    let sm = source.margin;
    let Rect { x0: smx0, y0: smy0, x1: smx1, y1: smy1 } = source.bbox.inflate(sm, sm);
    let tm = target.margin;
    let Rect { x0: tmx0, y0: tmy0, x1: tmx1, y1: tmy1 } = target.bbox.inflate(tm, tm);
    let Point { x: scx, y: scy } = source.bbox.center();
    let Point { x: tcx, y: tcy } = target.bbox.center();
    // Halfway across the gap between the facing sides.
    let mid_x = (if scx < tcx { sx1 + tx0 } else { tx1 + sx0 }) / 2.0;
    let mid_y = (if scy < tcy { sy1 + ty0 } else { ty1 + sy0 }) / 2.0;
    let p = Point::new;

    match (source_side, target_side) {
        (West, East) => {
            if smx0 <= tmx1 {
                let mut y = mid_y;
                if sx1 <= tx0 {
                    if ty1 >= smy0 && toy < soy {
                        y = tmy0.min(smy0);
                    } else if ty0 <= smy1 && toy >= soy {
                        y = tmy1.max(smy1);
                    }
                }
                return vec![p(sox, soy), p(sox, y), p(tox, y), p(tox, toy)];
            }
            let x = (sox + tox) / 2.0;
            vec![p(x, soy), p(x, toy)]
        }
        (East, West) => {
            if smx1 >= tmx0 {
                let mut y = mid_y;
                if sox > tx1 {
                    if ty1 >= smy0 && toy < soy {
                        y = tmy0.min(smy0);
                    } else if ty0 <= smy1 && toy >= soy {
                        y = tmy1.max(smy1);
                    }
                }
                return vec![p(sox, soy), p(sox, y), p(tox, y), p(tox, toy)];
            }
            let x = (sox + tox) / 2.0;
            vec![p(x, soy), p(x, toy)]
        }
        (North, South) => {
            if soy < toy {
                let mut x = mid_x;
                if soy < ty0 {
                    if tx1 >= smx0 && tox < sox {
                        x = tmx0.min(smx0);
                    } else if tx0 <= smx1 && tox >= sox {
                        x = tmx1.max(smx1);
                    }
                }
                return vec![p(sox, soy), p(x, soy), p(x, toy), p(tox, toy)];
            }
            let y = (soy + toy) / 2.0;
            vec![p(sox, y), p(tox, y)]
        }
        (South, North) => {
            if soy - sm > toy {
                let mut x = mid_x;
                if soy > ty1 {
                    if tx1 >= smx0 && tox < sox {
                        x = tmx0.min(smx0);
                    } else if tx0 <= smx1 && tox >= sox {
                        x = tmx1.max(smx1);
                    }
                }
                return vec![p(sox, soy), p(x, soy), p(x, toy), p(tox, toy)];
            }
            let y = (soy + toy) / 2.0;
            vec![p(sox, y), p(tox, y)]
        }
        (North, North) => {
            let y1 = ((sy1 + ty0) / 2.0).min(toy);
            let y2 = ((sy0 + ty1) / 2.0).min(soy);
            let x = if toy < soy {
                if sox >= tmx1 || sox <= tmx0 {
                    let y = soy.min(toy);
                    return vec![p(sox, y), p(tox, y)];
                }
                if tox > sox { sox.min(tmx0) } else { sox.max(tmx1) }
            } else {
                if tox >= smx1 || tox <= smx0 {
                    let y = soy.min(toy);
                    return vec![p(sox, y), p(tox, y)];
                }
                if tox >= sox { tox.max(smx1) } else { tox.min(smx0) }
            };
            vec![p(sox, y2), p(x, y2), p(x, y1), p(tox, y1)]
        }
        (South, South) => {
            if tx0 >= sox + sm || tx1 <= sox - sm {
                let y = soy.max(toy);
                return vec![p(sox, y), p(tox, y)];
            }
            let (x, mid) = if toy > soy {
                let x = if tox > sox { sox.min(tmx0) } else { sox.max(tmx1) };
                (x, (sy1 + ty0) / 2.0)
            } else {
                let x = if tox > sox { tox.min(smx0) } else { tox.max(smx1) };
                (x, (sy0 + ty1) / 2.0)
            };
            let (y1, y2) = (mid.max(toy), mid.max(soy));
            vec![p(sox, y2), p(x, y2), p(x, y1), p(tox, y1)]
        }
        (West, West) => {
            let x1 = ((sx1 + tx0) / 2.0).min(tox);
            let x2 = ((sx0 + tx1) / 2.0).min(sox);
            let y = if tox > sox {
                if toy <= soy { smy0.min(toy) } else { smy1.max(toy) }
            } else if toy >= soy {
                tmy0.min(soy)
            } else {
                tmy1.max(soy)
            };
            vec![p(x2, soy), p(x2, y), p(x1, y), p(x1, toy)]
        }
        (East, East) => {
            let x1 = ((sx0 + tx1) / 2.0).max(tox);
            let x2 = ((sx1 + tx0) / 2.0).max(sox);
            let y = if tox < sox {
                if toy <= soy { smy0.min(toy) } else { smy1.max(toy) }
            } else if toy >= soy {
                tmy0.min(soy)
            } else {
                tmy1.max(soy)
            };
            vec![p(x2, soy), p(x2, y), p(x1, y), p(x1, toy)]
        }
        (North, East) => {
            if soy > toy {
                if sox < tox {
                    let mut y = mid_y;
                    if y > tcy && y < tmy1 && sox < tmx0 {
                        y = tmy0;
                    }
                    return vec![p(sox, y), p(tox, y), p(tox, toy)];
                }
                return vec![p(sox, toy)];
            }
            let x = mid_x;
            if tox < sox && toy > sy0 && toy < sy1 {
                return vec![p(sox, soy), p(x, soy), p(x, toy)];
            }
            if (x > smx0 && toy > sy0) || tx0 > sx1 {
                let y = smy0.min(tmy0);
                let x = smx1.max(tmx1);
                return vec![p(sox, y), p(x, y), p(x, toy)];
            }
            let x = x.max(tox);
            vec![p(sox, soy), p(x, soy), p(x, toy)]
        }
        (North, West) => {
            if soy > toy {
                if sox > tox {
                    let mut y = mid_y;
                    if y > tcy && y < tmy1 && sox > tmx1 {
                        y = tmy0;
                    }
                    return vec![p(sox, y), p(tox, y), p(tox, toy)];
                }
                return vec![p(sox, toy)];
            }
            let x = mid_x;
            if sox < tox && sy1 >= toy {
                return vec![p(sox, soy), p(x, soy), p(x, toy)];
            }
            if x < smx1 && soy < ty1 {
                let y = smy0.min(tmy0);
                let x = smx0.min(tmx0);
                return vec![p(sox, y), p(x, y), p(x, toy)];
            }
            vec![p(sox, soy), p(x, soy), p(x, toy)]
        }
        (South, East) => {
            if soy < toy {
                if sox < tox {
                    let mut y = mid_y;
                    if y < tcy && y > tmy0 && sox < tmx0 {
                        y = tmy1;
                    }
                    return vec![p(sox, y), p(tox, y), p(tox, toy)];
                }
                return vec![p(sox, toy)];
            }
            if sx0 < tox {
                let y = smy1.max(tmy1);
                let x = smx1.max(tmx1);
                return vec![p(sox, y), p(x, y), p(x, toy)];
            }
            vec![p(sox, soy), p(mid_x, soy), p(mid_x, toy)]
        }
        (South, West) => {
            if soy < toy {
                if sox > tox {
                    let mut y = mid_y;
                    if y < tcy && y > tmy0 && sox > tmx1 {
                        y = tmy1;
                    }
                    return vec![p(sox, y), p(tox, y), p(tox, toy)];
                }
                return vec![p(sox, toy)];
            }
            if sx1 > tox {
                let y = smy1.max(tmy1);
                let x = smx0.min(tmx0);
                return vec![p(sox, y), p(x, y), p(x, toy)];
            }
            vec![p(sox, soy), p(mid_x, soy), p(mid_x, toy)]
        }
        (West, South) => {
            if sox > tox && soy >= tmy1 {
                return vec![p(tox, soy)];
            }
            if sox >= tx1 && soy < toy {
                return vec![p(mid_x, soy), p(mid_x, toy), p(tox, toy)];
            }
            if tox < sx1 && ty1 <= sy0 {
                return vec![p(sox, soy), p(sox, mid_y), p(tox, mid_y)];
            }
            let x = tmx0.min(sox);
            let y = smy1.max(tmy1);
            vec![p(x, soy), p(x, y), p(tox, y)]
        }
        (West, North) => {
            if sox > tox && soy < tmy0 {
                return vec![p(tox, soy)];
            }
            if sox >= tx1 && soy > toy {
                return vec![p(mid_x, soy), p(mid_x, toy), p(tox, toy)];
            }
            if tox <= sx1 && toy > soy {
                return vec![p(sox, soy), p(sox, mid_y), p(tox, mid_y)];
            }
            let x = if toy < soy { smx0.min(tmx0) } else { smx0 };
            let y = smy0.min(tmy0);
            vec![p(x, soy), p(x, y), p(tox, y)]
        }
        (East, North) => {
            if sox <= tox && soy < tmy0 {
                return vec![p(tox, soy)];
            }
            if sx1 < tx0 && soy > toy {
                return vec![p(mid_x, soy), p(mid_x, toy), p(tox, toy)];
            }
            if tox < sox && ty0 > sy1 {
                return vec![p(sox, soy), p(sox, mid_y), p(tox, mid_y)];
            }
            let x = smx1.max(tmx1);
            let y = smy0.min(tmy0);
            vec![p(x, soy), p(x, y), p(tox, y)]
        }
        (East, South) => {
            if sox < tox && soy >= tmy1 {
                return vec![p(tox, soy)];
            }
            if sox <= tmx0 && soy < toy {
                return vec![p(mid_x, soy), p(mid_x, toy), p(tox, toy)];
            }
            if tox > sx0 && ty1 < sy0 {
                return vec![p(sox, soy), p(sox, mid_y), p(tox, mid_y)];
            }
            let x = tmx1.max(sox);
            let y = smy1.max(tmy1);
            vec![p(x, soy), p(x, y), p(tox, y)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::router::{RouterKind, route};

    const A: Rect = Rect::new(0.0, 0.0, 40.0, 40.0);

    fn assert_orthogonal(points: &[Point]) {
        for w in points.windows(2) {
            assert!(
                w[0].x == w[1].x || w[0].y == w[1].y,
                "segment {:?} -> {:?} is not axis-aligned",
                w[0],
                w[1]
            );
        }
    }

    #[test]
    fn facing_sides_connect_directly() {
        let b = Rect::new(200.0, 0.0, 240.0, 40.0);
        let route = route(RouterKind::RightAngle, A, b, &[], &[], &RouteConfig::default()).unwrap();
        assert_eq!(
            route.points,
            vec![Point::new(40.0, 20.0), Point::new(200.0, 20.0)]
        );
        assert!(!route.degraded);
        assert_eq!(route.last_direction, Some(Direction::East));
    }

    #[test]
    fn offset_elements_meet_halfway() {
        let b = Rect::new(200.0, 100.0, 240.0, 140.0);
        let route = route(RouterKind::RightAngle, A, b, &[], &[], &RouteConfig::default()).unwrap();
        assert_eq!(
            route.points,
            vec![
                Point::new(40.0, 20.0),
                Point::new(120.0, 20.0),
                Point::new(120.0, 120.0),
                Point::new(200.0, 120.0),
            ]
        );
    }

    #[test]
    fn explicit_sides_are_honoured() {
        let b = Rect::new(200.0, 100.0, 240.0, 140.0);
        let config = RouteConfig::default().with_sides(Sides::BOTTOM, Sides::TOP);
        let route = route(RouterKind::RightAngle, A, b, &[], &[], &config).unwrap();
        assert_eq!(
            route.points,
            vec![
                Point::new(20.0, 40.0),
                Point::new(20.0, 70.0),
                Point::new(220.0, 70.0),
                Point::new(220.0, 100.0),
            ]
        );
        assert_eq!(route.last_direction, Some(Direction::South));
    }

    #[test]
    fn vertices_are_entered_facing_the_next_knot() {
        let b = Rect::new(200.0, 0.0, 240.0, 40.0);
        let vertex = Point::new(100.0, 100.0);
        let route = route(
            RouterKind::RightAngle,
            A,
            b,
            &[vertex],
            &[],
            &RouteConfig::default(),
        )
        .unwrap();
        assert_eq!(
            route.points,
            vec![
                Point::new(40.0, 20.0),
                Point::new(80.0, 20.0),
                Point::new(80.0, 100.0),
                Point::new(100.0, 100.0),
                Point::new(140.0, 100.0),
                Point::new(140.0, 20.0),
                Point::new(200.0, 20.0),
            ]
        );
    }

    #[test]
    fn same_sides_wrap_around_both_boxes() {
        let b = Rect::new(200.0, 100.0, 240.0, 140.0);
        let config = RouteConfig::default().with_sides(Sides::TOP, Sides::TOP);
        let route = route(RouterKind::RightAngle, A, b, &[], &[], &config).unwrap();
        // Up out of A, across above it, then down into B's top.
        assert_eq!(
            route.points,
            vec![
                Point::new(20.0, 0.0),
                Point::new(20.0, -20.0),
                Point::new(220.0, -20.0),
                Point::new(220.0, 100.0),
            ]
        );
    }

    #[test]
    fn every_side_pair_stays_axis_aligned() {
        let sides = [Sides::TOP, Sides::RIGHT, Sides::BOTTOM, Sides::LEFT];
        let targets = [
            Rect::new(200.0, 100.0, 240.0, 140.0),
            Rect::new(-200.0, -150.0, -160.0, -110.0),
            Rect::new(10.0, 150.0, 50.0, 190.0),
            Rect::new(20.0, 20.0, 60.0, 60.0),
        ];
        for target in targets {
            for start in sides {
                for end in sides {
                    let config = RouteConfig::default().with_sides(start, end);
                    let route =
                        route(RouterKind::RightAngle, A, target, &[], &[], &config).unwrap();
                    assert!(route.points.len() >= 2);
                    assert_orthogonal(&route.points);
                }
            }
        }
    }

    #[test]
    fn point_ends_have_no_margin() {
        let route = route(
            RouterKind::RightAngle,
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
            &[],
            &[],
            &RouteConfig::default(),
        )
        .unwrap();
        assert_eq!(
            route.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
                Point::new(100.0, 50.0),
            ]
        );
    }

    #[test]
    fn rejects_missing_sides() {
        let b = Rect::new(200.0, 0.0, 240.0, 40.0);
        let config = RouteConfig::default().with_sides(Sides::empty(), Sides::all());
        assert_eq!(
            route(RouterKind::RightAngle, A, b, &[], &[], &config),
            Err(RouteError::NoStartSides)
        );
        assert_eq!(single_side(Sides::LEFT | Sides::TOP), None);
        assert_eq!(single_side(Sides::BOTTOM), Some(Bearing::South));
    }
}
