// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers over Kurbo value types.
//!
//! Kurbo supplies [`Point`], [`Vec2`], [`Rect`], and [`Line`]. This module adds the
//! handful of operations the routers need on top of them: cardinal bearings,
//! screen-space angles, grid snapping, inclusive containment, and boundary
//! projections.
//!
//! All angles follow the screen convention used throughout this crate: degrees,
//! counter-clockwise from +x, with the y axis pointing *down*. North is therefore
//! `90` and points toward smaller y.
//!
//! None of these functions produce NaN for degenerate input. Coincident points and
//! zero-length vectors fall back to a fixed direction (east) or to the input point.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Rect, Vec2};

/// Cardinal bearing between two points that share exactly one coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Bearing {
    /// Toward smaller y.
    North,
    /// Toward larger y.
    South,
    /// Toward larger x.
    East,
    /// Toward smaller x.
    West,
}

impl Bearing {
    /// The reverse bearing.
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// True for [`Bearing::East`] and [`Bearing::West`].
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// Unit vector in screen coordinates.
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::West => Vec2::new(-1.0, 0.0),
        }
    }

    /// The bearing a quarter turn counter-clockwise (as seen on screen).
    pub const fn turn_left(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }
}

/// One of the eight compass directions a grid step can take.
///
/// Directions carry a screen-space angle (see the module docs) and are used both
/// for grid moves and as the previous-direction hint callers may feed back in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 0 degrees.
    East,
    /// 45 degrees.
    NorthEast,
    /// 90 degrees.
    North,
    /// 135 degrees.
    NorthWest,
    /// 180 degrees.
    West,
    /// 225 degrees.
    SouthWest,
    /// 270 degrees.
    South,
    /// 315 degrees.
    SouthEast,
}

impl Direction {
    /// All directions in counter-clockwise order starting at east.
    pub const ALL: [Self; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Screen-space angle in degrees.
    pub const fn degrees(self) -> u16 {
        match self {
            Self::East => 0,
            Self::NorthEast => 45,
            Self::North => 90,
            Self::NorthWest => 135,
            Self::West => 180,
            Self::SouthWest => 225,
            Self::South => 270,
            Self::SouthEast => 315,
        }
    }

    /// Unit lattice offset `(dx, dy)` in screen coordinates.
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::East => (1, 0),
            Self::NorthEast => (1, -1),
            Self::North => (0, -1),
            Self::NorthWest => (-1, -1),
            Self::West => (-1, 0),
            Self::SouthWest => (-1, 1),
            Self::South => (0, 1),
            Self::SouthEast => (1, 1),
        }
    }

    /// True for east and west.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// True for the four diagonal directions.
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::NorthWest | Self::SouthWest | Self::SouthEast
        )
    }

    /// Absolute angular difference to `other`, in `0..=180` degrees.
    pub const fn change(self, other: Self) -> u16 {
        let a = self.degrees();
        let b = other.degrees();
        let diff = if a > b { a - b } else { b - a };
        if diff > 180 { 360 - diff } else { diff }
    }

    /// Direction of a unit lattice offset. Returns `None` for `(0, 0)`.
    pub fn from_offset(dx: i64, dy: i64) -> Option<Self> {
        let key = (dx.clamp(-1, 1), dy.clamp(-1, 1));
        Self::ALL.into_iter().find(|d| d.offset() == key)
    }

    /// Quantize a screen-space angle into one of `sectors` equal sectors.
    ///
    /// `sectors` is `4` for orthogonal routing and `8` when diagonals are allowed.
    /// Angles are rounded to the nearest sector centre, as in
    /// `floor((angle + q / 2) / q) * q` with `q = 360 / sectors`.
    pub fn quantize(angle: f64, sectors: u16) -> Self {
        let q = 360.0 / f64::from(sectors.max(1));
        let normalized = normalize_angle(angle + q / 2.0);
        let snapped = normalize_angle((normalized / q).floor() * q);
        // Sector centres are multiples of 45 for 4 and 8 sectors.
        let index = (snapped / 45.0).round();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "index is a small non-negative integer after rounding."
        )]
        let index = index as usize % Self::ALL.len();
        Self::ALL[index]
    }

    /// Quantized direction from `from` toward `to`.
    pub fn between(from: Point, to: Point, sectors: u16) -> Self {
        Self::quantize(theta(from, to), sectors)
    }
}

impl From<Bearing> for Direction {
    fn from(b: Bearing) -> Self {
        match b {
            Bearing::North => Self::North,
            Bearing::South => Self::South,
            Bearing::East => Self::East,
            Bearing::West => Self::West,
        }
    }
}

/// Cardinal bearing from `from` to `to`.
///
/// Returns `None` unless the points share exactly one coordinate. Callers use
/// `None` to decide that a joint point is required between the two.
pub fn bearing(from: Point, to: Point) -> Option<Bearing> {
    let same_x = from.x == to.x;
    let same_y = from.y == to.y;
    match (same_x, same_y) {
        (true, false) => Some(if from.y > to.y {
            Bearing::North
        } else {
            Bearing::South
        }),
        (false, true) => Some(if from.x > to.x {
            Bearing::West
        } else {
            Bearing::East
        }),
        _ => None,
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Screen-space angle in degrees of the vector from `from` to `to`.
///
/// Coincident points yield `0`.
pub fn theta(from: Point, to: Point) -> f64 {
    let y = -(to.y - from.y);
    let x = to.x - from.x;
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    normalize_angle(y.atan2(x).to_degrees())
}

/// Sum of the axis distances between two points.
pub fn manhattan_distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Round `value` to the nearest multiple of `size`.
pub fn snap_to_grid(value: f64, size: f64) -> f64 {
    size * (value / size).round()
}

/// Round both coordinates of `p` to the nearest multiple of `size`.
pub fn snap_point(p: Point, size: f64) -> Point {
    Point::new(snap_to_grid(p.x, size), snap_to_grid(p.y, size))
}

/// Unit vector along `v`, or east when `v` has zero length.
pub fn unit_or_east(v: Vec2) -> Vec2 {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Vec2::new(1.0, 0.0)
    }
}

/// Move `point` away from `reference` by `distance` (toward it when negative).
///
/// Coincident inputs move along +x.
pub fn move_from(point: Point, reference: Point, distance: f64) -> Point {
    point + unit_or_east(point - reference) * distance
}

/// Move `point` toward `target` by `distance`.
///
/// Coincident inputs return `point` unchanged.
pub fn move_toward(point: Point, target: Point, distance: f64) -> Point {
    let v = target - point;
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len > 0.0 {
        point + v * (distance / len)
    } else {
        point
    }
}

/// Point at `distance` from `origin` along the screen-space angle `radians`.
pub fn from_polar(distance: f64, radians: f64, origin: Point) -> Point {
    Point::new(
        origin.x + distance * radians.cos(),
        origin.y - distance * radians.sin(),
    )
}

/// Rotate `point` around `origin` by `degrees` (counter-clockwise on screen).
pub fn rotate_around(point: Point, origin: Point, degrees: f64) -> Point {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin(), radians.cos());
    let v = point - origin;
    Point::new(
        origin.x + v.x * cos + v.y * sin,
        origin.y - v.x * sin + v.y * cos,
    )
}

/// True if `p` lies inside `rect` or on its boundary.
pub fn contains_inclusive(rect: &Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// True if `p` lies strictly inside `rect`.
pub fn contains_strict(rect: &Rect, p: Point) -> bool {
    p.x > rect.x0 && p.x < rect.x1 && p.y > rect.y0 && p.y < rect.y1
}

/// True if the two rectangles overlap or touch.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Zero-size rectangle at `p`.
pub fn point_box(p: Point) -> Rect {
    Rect::from_points(p, p)
}

/// Width of `rect` for horizontal bearings, height otherwise.
pub fn extent_along(rect: &Rect, bearing: Option<Bearing>) -> f64 {
    match bearing {
        Some(b) if b.is_horizontal() => rect.width(),
        _ => rect.height(),
    }
}

/// Closest point on the boundary of `rect` to `p`.
///
/// Interior points are projected onto the nearest side, preferring left, then
/// right, top, and bottom on ties. Exterior points are clamped into the rectangle.
pub fn nearest_boundary_point(rect: &Rect, p: Point) -> Point {
    if !contains_inclusive(rect, p) {
        return Point::new(p.x.clamp(rect.x0, rect.x1), p.y.clamp(rect.y0, rect.y1));
    }
    let mut best = p.x - rect.x0;
    let mut out = Point::new(rect.x0, p.y);
    let right = rect.x1 - p.x;
    if right < best {
        best = right;
        out = Point::new(rect.x1, p.y);
    }
    let top = p.y - rect.y0;
    if top < best {
        best = top;
        out = Point::new(p.x, rect.y0);
    }
    if rect.y1 - p.y < best {
        out = Point::new(p.x, rect.y1);
    }
    out
}

/// Side of `rect` closest to `p`, as the bearing pointing out of that side.
///
/// Distances are signed, so a point beyond one side picks that side. Ties
/// prefer west, then east, north, and south.
pub fn nearest_side(rect: &Rect, p: Point) -> Bearing {
    let mut best = p.x - rect.x0;
    let mut side = Bearing::West;
    for (distance, candidate) in [
        (rect.x1 - p.x, Bearing::East),
        (p.y - rect.y0, Bearing::North),
        (rect.y1 - p.y, Bearing::South),
    ] {
        if distance < best {
            best = distance;
            side = candidate;
        }
    }
    side
}

/// Point where the segment `inside → toward` leaves `rect`.
///
/// If `toward` is itself inside the rectangle the segment never leaves it and
/// `inside` is returned.
pub fn boundary_exit(rect: &Rect, inside: Point, toward: Point) -> Point {
    if contains_inclusive(rect, toward) {
        return inside;
    }
    let d = toward - inside;
    // Parameter along the segment where it reaches the bound on one axis.
    let axis_hit = |delta: f64, from: f64, lo: f64, hi: f64| {
        if delta > 0.0 {
            ((hi - from) / delta, hi)
        } else if delta < 0.0 {
            ((lo - from) / delta, lo)
        } else {
            (f64::INFINITY, from)
        }
    };
    let (tx, bx) = axis_hit(d.x, inside.x, rect.x0, rect.x1);
    let (ty, by) = axis_hit(d.y, inside.y, rect.y0, rect.y1);
    // Land exactly on the bound that is hit first; keep unchanged axes exact.
    if tx <= ty {
        let y = if d.y == 0.0 { inside.y } else { inside.y + d.y * tx };
        Point::new(bx, y)
    } else {
        let x = if d.x == 0.0 { inside.x } else { inside.x + d.x * ty };
        Point::new(x, by)
    }
}

/// Intersection point of two finite segments, if any.
///
/// Parallel (including collinear) segments report no intersection.
pub fn segment_intersection(a: Line, b: Line) -> Option<Point> {
    let r = a.p1 - a.p0;
    let s = b.p1 - b.p0;
    let denom = r.cross(s);
    let scale = r.x * r.x + r.y * r.y + s.x * s.x + s.y * s.y;
    if denom.abs() <= f64::EPSILON * scale {
        return None;
    }
    let qp = b.p0 - a.p0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a.p0 + r * t)
    } else {
        None
    }
}

/// True if the segment `a → b` touches `rect` (boundary included).
pub fn segment_intersects_rect(a: Point, b: Point, rect: &Rect) -> bool {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-d.x, a.x - rect.x0),
        (d.x, rect.x1 - a.x),
        (-d.y, a.y - rect.y0),
        (d.y, rect.y1 - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                if t > t1 {
                    return false;
                }
                t0 = t0.max(t);
            } else {
                if t < t0 {
                    return false;
                }
                t1 = t1.min(t);
            }
        }
    }
    t0 <= t1
}

/// Remove consecutive duplicate points in place.
pub fn dedup_points(points: &mut alloc::vec::Vec<Point>) {
    points.dedup_by(|b, a| a.x == b.x && a.y == b.y);
}

/// Drop interior points where the path carries on in the same direction.
///
/// The first and last points are always kept. Reversals are not collinear
/// continuations and stay in place.
pub fn remove_collinear(points: &mut alloc::vec::Vec<Point>) {
    let mut out: alloc::vec::Vec<Point> = alloc::vec::Vec::with_capacity(points.len());
    for &p in points.iter() {
        if let [.., a, b] = out.as_slice() {
            let u = *b - *a;
            let v = p - *b;
            let scale = (u.x * u.x + u.y * u.y).sqrt() * (v.x * v.x + v.y * v.y).sqrt();
            if u.cross(v).abs() <= 1e-9 * scale && u.dot(v) > 0.0 {
                out.pop();
            }
        }
        out.push(p);
    }
    *points = out;
}

/// True if both coordinates are finite.
pub fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// True if all four edges are finite.
pub fn is_finite_rect(r: &Rect) -> bool {
    r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn bearing_requires_exactly_one_shared_coordinate() {
        let o = Point::new(10.0, 10.0);
        assert_eq!(bearing(o, Point::new(10.0, 0.0)), Some(Bearing::North));
        assert_eq!(bearing(o, Point::new(10.0, 20.0)), Some(Bearing::South));
        assert_eq!(bearing(o, Point::new(20.0, 10.0)), Some(Bearing::East));
        assert_eq!(bearing(o, Point::new(0.0, 10.0)), Some(Bearing::West));
        assert_eq!(bearing(o, Point::new(20.0, 20.0)), None);
        assert_eq!(bearing(o, o), None, "coincident points have no bearing");
    }

    #[test]
    fn theta_uses_screen_convention() {
        let o = Point::ZERO;
        assert_eq!(theta(o, Point::new(1.0, 0.0)), 0.0);
        assert!((theta(o, Point::new(0.0, -1.0)) - 90.0).abs() < 1e-9);
        assert!((theta(o, Point::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((theta(o, Point::new(0.0, 1.0)) - 270.0).abs() < 1e-9);
        assert_eq!(theta(o, o), 0.0);
    }

    #[test]
    fn quantize_rounds_to_nearest_sector() {
        assert_eq!(Direction::quantize(10.0, 4), Direction::East);
        assert_eq!(Direction::quantize(350.0, 4), Direction::East);
        assert_eq!(Direction::quantize(100.0, 4), Direction::North);
        assert_eq!(Direction::quantize(50.0, 8), Direction::NorthEast);
        assert_eq!(Direction::quantize(269.0, 8), Direction::South);
    }

    #[test]
    fn direction_change_wraps_around() {
        assert_eq!(Direction::East.change(Direction::SouthEast), 45);
        assert_eq!(Direction::East.change(Direction::West), 180);
        assert_eq!(Direction::North.change(Direction::SouthEast), 135);
        assert_eq!(Direction::South.change(Direction::South), 0);
    }

    #[test]
    fn snapping_rounds_to_multiples() {
        assert_eq!(snap_to_grid(14.0, 10.0), 10.0);
        assert_eq!(snap_to_grid(15.0, 10.0), 20.0);
        assert_eq!(snap_to_grid(-14.0, 10.0), -10.0);
        assert_eq!(
            snap_point(Point::new(123.0, 77.0), 50.0),
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn moves_guard_degenerate_vectors() {
        let p = Point::new(5.0, 5.0);
        assert_eq!(move_toward(p, p, 3.0), p);
        assert_eq!(move_from(p, p, 3.0), Point::new(8.0, 5.0));
        assert_eq!(unit_or_east(Vec2::ZERO), Vec2::new(1.0, 0.0));
        assert_eq!(
            move_from(Point::new(0.0, 10.0), Point::new(0.0, 0.0), -4.0),
            Point::new(0.0, 6.0)
        );
    }

    #[test]
    fn rotation_is_counter_clockwise_on_screen() {
        let p = rotate_around(Point::new(10.0, 0.0), Point::ZERO, 90.0);
        assert!(p.x.abs() < 1e-9 && (p.y + 10.0).abs() < 1e-9, "{p:?}");
    }

    #[test]
    fn containment_and_projection() {
        let r = Rect::new(0.0, 0.0, 40.0, 20.0);
        assert!(contains_inclusive(&r, Point::new(40.0, 20.0)));
        assert!(!contains_strict(&r, Point::new(40.0, 10.0)));
        assert_eq!(
            nearest_boundary_point(&r, Point::new(5.0, 10.0)),
            Point::new(0.0, 10.0)
        );
        assert_eq!(
            nearest_boundary_point(&r, Point::new(50.0, -5.0)),
            Point::new(40.0, 0.0)
        );
        assert_eq!(
            boundary_exit(&r, Point::new(20.0, 10.0), Point::new(100.0, 10.0)),
            Point::new(40.0, 10.0)
        );
        assert_eq!(
            boundary_exit(&r, Point::new(20.0, 10.0), Point::new(30.0, 10.0)),
            Point::new(20.0, 10.0)
        );
    }

    #[test]
    fn segments_and_rects() {
        let a = Line::new((0.0, 0.0), (10.0, 10.0));
        let b = Line::new((0.0, 10.0), (10.0, 0.0));
        let hit = segment_intersection(a, b).unwrap();
        assert!((hit.x - 5.0).abs() < 1e-9 && (hit.y - 5.0).abs() < 1e-9);
        let parallel = Line::new((0.0, 1.0), (10.0, 11.0));
        assert!(segment_intersection(a, parallel).is_none());

        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(segment_intersects_rect(
            Point::new(0.0, 15.0),
            Point::new(30.0, 15.0),
            &r
        ));
        assert!(segment_intersects_rect(
            Point::new(0.0, 10.0),
            Point::new(30.0, 10.0),
            &r
        ));
        assert!(!segment_intersects_rect(
            Point::new(0.0, 9.0),
            Point::new(30.0, 9.0),
            &r
        ));
    }

    #[test]
    fn dedup_drops_consecutive_duplicates_only() {
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        dedup_points(&mut pts);
        assert_eq!(pts.len(), 3);
    }

    #[test]
    fn nearest_side_uses_signed_distances() {
        let r = Rect::new(0.0, 0.0, 40.0, 20.0);
        assert_eq!(nearest_side(&r, Point::new(2.0, 10.0)), Bearing::West);
        assert_eq!(nearest_side(&r, Point::new(39.0, 10.0)), Bearing::East);
        assert_eq!(nearest_side(&r, Point::new(20.0, 1.0)), Bearing::North);
        assert_eq!(nearest_side(&r, Point::new(20.0, 19.0)), Bearing::South);
        // Outside points pick the side they lie beyond.
        assert_eq!(nearest_side(&r, Point::new(100.0, 10.0)), Bearing::East);
        assert_eq!(nearest_side(&r, Point::new(20.0, -50.0)), Bearing::North);
        // A zero-size box at a point faces the dominant offset.
        let at = point_box(Point::new(0.0, 0.0));
        assert_eq!(nearest_side(&at, Point::new(10.0, 50.0)), Bearing::South);
        assert_eq!(nearest_side(&at, Point::new(-80.0, 50.0)), Bearing::West);
        // Ties go west first.
        assert_eq!(nearest_side(&at, Point::new(0.0, 0.0)), Bearing::West);
    }

    #[test]
    fn remove_collinear_keeps_corners_and_reversals() {
        let mut pts = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 10.0),
            Point::new(40.0, 20.0),
        ];
        remove_collinear(&mut pts);
        assert_eq!(
            pts,
            vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 0.0),
                Point::new(40.0, 20.0),
            ]
        );
    }
}
