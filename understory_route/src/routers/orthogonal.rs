// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bend-minimizing orthogonal router.
//!
//! Walks the knot sequence `[source, vertices.., target]` and inserts joint
//! points between consecutive knots that are not already horizontally or
//! vertically aligned. Each pair is handled by a fixed rule that depends on
//! whether its ends are elements (padded boxes) or bare vertices, and on the
//! bearing the route arrived with. Obstacles are not considered.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::error::RouteError;
use crate::geometry::{
    Bearing, Direction, bearing, boundary_exit, contains_inclusive, dedup_points, extent_along,
    from_polar, intersects, move_from, move_toward, nearest_boundary_point, point_box, theta,
};
use crate::router::{Anchor, Route, RouteRequest, Router};

/// Padding around endpoint boxes when none is configured.
pub const DEFAULT_PADDING: f64 = 20.0;

/// Router that only emits axis-aligned segments and ignores obstacles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Orthogonal;

impl Router for Orthogonal {
    fn route(&self, request: &RouteRequest<'_>) -> Result<Route, RouteError> {
        request.validate()?;
        let padding = request.config.padding_or(DEFAULT_PADDING);
        let points = orthogonal_points(
            &request.source,
            &request.target,
            request.vertices,
            padding,
        );
        let last_direction = match points.as_slice() {
            [.., a, b] if a != b => Some(
                bearing(*a, *b).map_or_else(|| Direction::between(*a, *b, 4), Direction::from),
            ),
            _ => None,
        };
        Ok(Route {
            points,
            degraded: false,
            last_direction,
        })
    }
}

/// Joint points inserted between two knots and the bearing the route leaves them with.
struct Joint {
    points: Vec<Point>,
    direction: Option<Bearing>,
}

fn padded_box(anchor: &Anchor, padding: f64) -> Rect {
    anchor
        .bounds()
        .inflate(padding, padding)
        .union_pt(anchor.reference())
}

fn orthogonal_points(
    source: &Anchor,
    target: &Anchor,
    vertices: &[Point],
    padding: f64,
) -> Vec<Point> {
    let source_box = padded_box(source, padding);
    let target_box = padded_box(target, padding);

    let mut knots = Vec::with_capacity(vertices.len() + 2);
    knots.push(source.reference());
    knots.extend_from_slice(vertices);
    knots.push(target.reference());

    let last = knots.len() - 1;
    let mut points = vec![knots[0]];
    let mut brng: Option<Bearing> = None;

    for i in 0..last {
        let from = knots[i];
        let to = knots[i + 1];
        let direct = bearing(from, to);
        let is_first = i == 0;
        let is_last = i + 1 == last;

        let joint = if is_first && is_last {
            if intersects(&source_box, &target_box.inflate(1.0, 1.0)) {
                Some(inside_element(from, to, &source_box, &target_box, None))
            } else if direct.is_none() {
                Some(element_element(from, to, &source_box, &target_box))
            } else {
                None
            }
        } else if is_first {
            if contains_inclusive(&source_box, to) {
                let to_box = point_box(to).inflate(padding, padding);
                Some(inside_element(from, to, &source_box, &to_box, None))
            } else if direct.is_none() {
                Some(element_vertex(from, to, &source_box))
            } else {
                None
            }
        } else if is_last {
            // A straight final segment that doubles back over the previous one.
            let retraces = direct.is_some() && bearing(to, from) == brng;
            if contains_inclusive(&target_box, from) || retraces {
                let from_box = point_box(from).inflate(padding, padding);
                Some(inside_element(from, to, &from_box, &target_box, brng))
            } else if direct.is_none() {
                Some(vertex_element(from, to, &target_box, brng))
            } else {
                None
            }
        } else if direct.is_none() {
            Some(vertex_vertex(from, to, brng))
        } else {
            None
        };

        match joint {
            Some(joint) => {
                points.extend(joint.points);
                brng = joint.direction;
            }
            None => brng = direct,
        }
        points.push(to);
    }

    dedup_points(&mut points);
    clip_ends(&mut points, source, target);
    points
}

/// Move rectangle ends from the element centre to where the route leaves the element.
pub(crate) fn clip_ends(points: &mut Vec<Point>, source: &Anchor, target: &Anchor) {
    if points.len() >= 2 {
        if let Some(rect) = source.rect() {
            points[0] = boundary_exit(&rect, points[0], points[1]);
        }
        let n = points.len();
        if let Some(rect) = target.rect() {
            points[n - 1] = boundary_exit(&rect, points[n - 1], points[n - 2]);
        }
    }
    dedup_points(points);
    // A zero-length route is reported as its single point, twice.
    if let [p] = points.as_slice() {
        let p = *p;
        points.push(p);
    }
}

/// The corner `(p1.x, p2.y)`, or `(p2.x, p1.y)` if the first lies in `bbox`.
fn free_join(p1: Point, p2: Point, bbox: &Rect) -> Point {
    let p = Point::new(p1.x, p2.y);
    if contains_inclusive(bbox, p) {
        Point::new(p2.x, p1.y)
    } else {
        p
    }
}

fn vertex_vertex(from: Point, to: Point, brng: Option<Bearing>) -> Joint {
    let p1 = Point::new(from.x, to.y);
    let p2 = Point::new(to.x, from.y);
    let d1 = bearing(from, p1);
    let d2 = bearing(from, p2);
    let reverse = brng.map(Bearing::opposite);
    let p = if d1 == brng || (d1 != reverse && (d2 == reverse || d2 != brng)) {
        p1
    } else {
        p2
    };
    Joint {
        points: vec![p],
        direction: bearing(p, to),
    }
}

fn element_vertex(from: Point, to: Point, from_box: &Rect) -> Joint {
    let p = free_join(from, to, from_box);
    Joint {
        points: vec![p],
        direction: bearing(p, to),
    }
}

fn vertex_element(from: Point, to: Point, to_box: &Rect, brng: Option<Bearing>) -> Joint {
    let corners = [Point::new(from.x, to.y), Point::new(to.x, from.y)];
    let outside: Vec<Point> = corners
        .iter()
        .copied()
        .filter(|p| !contains_inclusive(to_box, *p))
        .collect();
    let not_backwards: Vec<Point> = outside
        .iter()
        .copied()
        .filter(|p| bearing(*p, from) != brng)
        .collect();

    if let Some(&first) = not_backwards.first() {
        let p = not_backwards
            .iter()
            .rev()
            .copied()
            .find(|p| bearing(from, *p) == brng)
            .unwrap_or(first);
        return Joint {
            points: vec![p],
            direction: bearing(p, to),
        };
    }

    // Both corners are unusable: step to the element's edge and realign.
    let p = corners
        .iter()
        .copied()
        .find(|c| !outside.contains(c))
        .unwrap_or(corners[0]);
    let p2 = move_from(to, p, -extent_along(to_box, brng) / 2.0);
    let p1 = free_join(p2, from, to_box);
    Joint {
        points: vec![p1, p2],
        direction: bearing(p2, to),
    }
}

fn element_element(from: Point, to: Point, from_box: &Rect, to_box: &Rect) -> Joint {
    let mut joint = element_vertex(to, from, to_box);
    let p1 = joint.points[0];
    if contains_inclusive(from_box, p1) {
        joint = element_vertex(from, to, from_box);
        let p2 = joint.points[0];
        if contains_inclusive(to_box, p2) {
            let from_border = move_from(from, p2, -extent_along(from_box, bearing(from, p2)) / 2.0);
            let to_border = move_from(to, p1, -extent_along(to_box, bearing(to, p1)) / 2.0);
            let mid = from_border.midpoint(to_border);
            let start = element_vertex(from, mid, from_box);
            let end = vertex_vertex(mid, to, start.direction);
            joint = Joint {
                points: vec![start.points[0], end.points[0]],
                direction: end.direction,
            };
        }
    }
    joint
}

/// Leave the union of two overlapping boxes and come back around its boundary.
fn inside_element(
    from: Point,
    to: Point,
    from_box: &Rect,
    to_box: &Rect,
    brng: Option<Bearing>,
) -> Joint {
    let bndry = from_box.union(*to_box).inflate(1.0, 1.0);
    let reach = bndry.width() + bndry.height();
    let center = bndry.center();
    let reversed = center.distance(to) > center.distance(from);
    let (start, end) = if reversed { (to, from) } else { (from, to) };

    let p1 = match brng {
        Some(b) => {
            let far = start + b.unit() * reach;
            move_toward(nearest_boundary_point(&bndry, far), far, 1.0)
        }
        None => move_from(nearest_boundary_point(&bndry, start), start, 1.0),
    };
    let mut p2 = free_join(p1, end, &bndry);

    let points = if p1.round() == p2.round() {
        // Go a quarter turn around the boundary instead.
        let far = match bearing(p1, start) {
            Some(b) => end + b.turn_left().unit() * reach,
            None => from_polar(
                reach,
                theta(p1, start).to_radians() + core::f64::consts::FRAC_PI_2,
                end,
            ),
        };
        p2 = move_from(nearest_boundary_point(&bndry, far), end, 1.0);
        let p3 = free_join(p1, p2, &bndry);
        if reversed {
            vec![p2, p3, p1]
        } else {
            vec![p1, p3, p2]
        }
    } else if reversed {
        vec![p2, p1]
    } else {
        vec![p1, p2]
    };

    let direction = if reversed {
        bearing(p1, to)
    } else {
        bearing(p2, to)
    };
    Joint { points, direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use crate::obstacle::ObstacleMap;

    fn run(source: Anchor, target: Anchor, vertices: &[Point]) -> Route {
        let config = RouteConfig::default();
        let obstacles = ObstacleMap::empty();
        let request = RouteRequest {
            source,
            target,
            vertices,
            obstacles: &obstacles,
            config: &config,
        };
        Orthogonal.route(&request).unwrap()
    }

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

    fn assert_no_duplicates(points: &[Point]) {
        for w in points.windows(2) {
            assert_ne!(w[0], w[1], "duplicate consecutive point");
        }
    }

    #[test]
    fn aligned_elements_connect_directly() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(200.0, 0.0, 240.0, 40.0);
        let route = run(a.into(), b.into(), &[]);
        assert_eq!(
            route.points,
            vec![Point::new(40.0, 20.0), Point::new(200.0, 20.0)]
        );
        assert!(!route.degraded);
        assert_eq!(route.last_direction, Some(Direction::East));
    }

    #[test]
    fn offset_elements_get_one_bend() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(200.0, 100.0, 240.0, 140.0);
        let route = run(a.into(), b.into(), &[]);
        assert_eq!(
            route.points,
            vec![
                Point::new(40.0, 20.0),
                Point::new(220.0, 20.0),
                Point::new(220.0, 100.0),
            ]
        );
        assert_eq!(route.last_direction, Some(Direction::South));
    }

    #[test]
    fn vertices_are_visited_in_order() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(200.0, 0.0, 240.0, 40.0);
        let route = run(a.into(), b.into(), &[Point::new(100.0, 100.0)]);
        assert_eq!(
            route.points,
            vec![
                Point::new(20.0, 40.0),
                Point::new(20.0, 100.0),
                Point::new(100.0, 100.0),
                Point::new(220.0, 100.0),
                Point::new(220.0, 40.0),
            ]
        );
        assert_orthogonal(&route.points);
    }

    #[test]
    fn point_anchors_continue_previous_bearing() {
        let route = run(
            Point::new(0.0, 0.0).into(),
            Point::new(100.0, 100.0).into(),
            &[Point::new(50.0, 30.0)],
        );
        assert_eq!(
            route.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 30.0),
                Point::new(50.0, 30.0),
                Point::new(100.0, 30.0),
                Point::new(100.0, 100.0),
            ]
        );
    }

    #[test]
    fn overlapping_elements_go_around_their_union() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(60.0, 60.0, 160.0, 160.0);
        let route = run(a.into(), b.into(), &[]);
        assert_eq!(
            route.points,
            vec![
                Point::new(0.0, 50.0),
                Point::new(-22.0, 50.0),
                Point::new(-22.0, 110.0),
                Point::new(60.0, 110.0),
            ]
        );
    }

    #[test]
    fn segments_stay_axis_aligned() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let targets = [
            Rect::new(200.0, 100.0, 240.0, 140.0),
            Rect::new(-200.0, -150.0, -160.0, -110.0),
            Rect::new(10.0, 200.0, 50.0, 240.0),
            Rect::new(30.0, 30.0, 70.0, 70.0),
        ];
        let vertex_sets: [&[Point]; 3] = [
            &[],
            &[Point::new(100.0, -50.0)],
            &[Point::new(60.0, 60.0), Point::new(-80.0, 90.0)],
        ];
        for b in targets {
            for vertices in vertex_sets {
                let route = run(a.into(), b.into(), vertices);
                assert!(route.points.len() >= 2);
                assert_orthogonal(&route.points);
                assert_no_duplicates(&route.points);
                for v in vertices {
                    assert!(route.points.contains(v), "vertex {v:?} missing");
                }
            }
        }
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let p = Point::new(5.0, 5.0);
        let route = run(p.into(), p.into(), &[]);
        assert!(route.points.len() >= 2);
        for q in &route.points {
            assert!(q.x.is_finite() && q.y.is_finite());
        }
    }
}
