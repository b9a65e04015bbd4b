// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polyline that hops over crossing links.
//!
//! Each segment of the link is intersected with the caller-supplied crossing
//! segments (typically the segments of other links drawn underneath). Around
//! every crossing a window of `2 * size` is replaced by a jump. Crossings closer
//! together than `size` share one jump, and a jump that would come within
//! `2 * size + 1` of a segment end is skipped so corners stay clean.

use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Vec2};
use understory_route::geometry::{move_from, move_toward, segment_intersection, unit_or_east};

use crate::connector::Connector;

/// Cubic approximation constant for a quarter circle.
const QUARTER_ARC: f64 = 0.552_284_749_831;

/// How a jump is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JumpStyle {
    /// A half circle bulging up, or right on vertical segments.
    #[default]
    Arc,
    /// A gap: the path lifts and resumes past the crossing.
    Gap,
    /// A single cubic hump.
    Cubic,
}

/// Polyline with jumps where it crosses other segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpOver<'a> {
    /// Half the width of a jump.
    pub size: f64,
    /// Jump shape.
    pub style: JumpStyle,
    /// Corner radius for the polyline corners; `0` keeps them sharp.
    pub radius: f64,
    /// Segments this link should hop over.
    pub crossings: &'a [Line],
}

impl JumpOver<'_> {
    /// Jump size used when none is given.
    pub const DEFAULT_SIZE: f64 = 5.0;
}

impl Default for JumpOver<'_> {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            style: JumpStyle::Arc,
            radius: 0.0,
            crossings: &[],
        }
    }
}

/// A piece of the link: a straight run or a jump between its ends.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Piece {
    line: Line,
    jump: bool,
}

impl Piece {
    fn straight(p0: Point, p1: Point) -> Self {
        Self {
            line: Line::new(p0, p1),
            jump: false,
        }
    }
}

impl Connector for JumpOver<'_> {
    fn connect(&self, source: Point, target: Point, points: &[Point]) -> BezPath {
        let mut knots = Vec::with_capacity(points.len() + 2);
        knots.push(source);
        knots.extend_from_slice(points);
        knots.push(target);

        let size = self.size.max(0.0);
        let mut pieces = Vec::new();
        for w in knots.windows(2) {
            if w[0] == w[1] {
                continue;
            }
            let line = Line::new(w[0], w[1]);
            let mut hits: Vec<Point> = self
                .crossings
                .iter()
                .filter_map(|c| segment_intersection(line, *c))
                .collect();
            hits.sort_by(|a, b| line.p0.distance(*a).total_cmp(&line.p0.distance(*b)));
            // A crossing through a vertex of another link is reported by both of its segments.
            hits.dedup_by(|a, b| a.distance(*b) < 1e-9);
            if hits.is_empty() || size == 0.0 {
                pieces.push(Piece::straight(line.p0, line.p1));
            } else {
                split_with_jumps(&mut pieces, line, &hits, size);
            }
        }

        let mut path = BezPath::new();
        path.move_to(source);
        if pieces.is_empty() {
            path.line_to(target);
            return path;
        }
        for (i, piece) in pieces.iter().enumerate() {
            if piece.jump {
                self.draw_jump(&mut path, piece.line);
                continue;
            }
            match pieces.get(i + 1) {
                Some(next) if self.radius > 0.0 && !next.jump => {
                    round_corner(
                        &mut path,
                        self.radius,
                        piece.line.p0,
                        piece.line.p1,
                        next.line.p1,
                    );
                }
                _ => path.line_to(piece.line.p1),
            }
        }
        path
    }
}

impl JumpOver<'_> {
    fn draw_jump(&self, path: &mut BezPath, line: Line) {
        let (a, b) = (line.p0, line.p1);
        let along = unit_or_east(b - a);
        let normal = bulge_normal(along);
        match self.style {
            JumpStyle::Gap => path.move_to(b),
            JumpStyle::Arc => {
                let r = a.distance(b) / 2.0;
                let k = QUARTER_ARC * r;
                let apex = a.midpoint(b) + normal * r;
                path.curve_to(a + normal * k, apex - along * k, apex);
                path.curve_to(apex + along * k, b + normal * k, b);
            }
            JumpStyle::Cubic => {
                let x = self.size * 0.6;
                let y = self.size * 1.35;
                path.curve_to(a + along * x + normal * y, b - along * x + normal * y, b);
            }
        }
    }
}

/// Unit normal of `along` pointing up on screen, or right for vertical runs.
fn bulge_normal(along: Vec2) -> Vec2 {
    let n = Vec2::new(along.y, -along.x);
    if n.y < 0.0 || (n.y == 0.0 && n.x > 0.0) {
        n
    } else {
        -n
    }
}

/// Split `line` at `hits` (sorted from its start) into straight pieces and jumps.
fn split_with_jumps(pieces: &mut Vec<Piece>, line: Line, hits: &[Point], size: f64) {
    let first = pieces.len();
    let mut skip = alloc::vec![false; hits.len()];
    for (idx, &hit) in hits.iter().enumerate() {
        if skip[idx] {
            continue;
        }
        // The remainder of the segment still to be split.
        let last = if pieces.len() > first {
            pieces.pop()
        } else {
            None
        };
        let last = last.unwrap_or(Piece::straight(line.p0, line.p1));
        let start = last.line.p0;
        let end = last.line.p1;

        let jump_start = move_toward(hit, start, size);
        let mut jump_end = move_from(hit, start, size);

        if let Some(&next) = hits.get(idx + 1) {
            let gap = jump_end.distance(next);
            if gap <= size {
                // Merge with the next crossing.
                jump_end = move_from(next, start, gap);
                skip[idx + 1] = true;
            }
        } else if jump_start.distance(end) < size * 2.0 + 1.0 {
            pieces.push(last);
            continue;
        }

        if jump_end.distance(start) < size * 2.0 + 1.0 {
            pieces.push(last);
            continue;
        }

        pieces.push(Piece::straight(start, jump_start));
        pieces.push(Piece {
            line: Line::new(jump_start, jump_end),
            jump: true,
        });
        pieces.push(Piece::straight(jump_end, end));
    }
    if pieces.len() == first {
        pieces.push(Piece::straight(line.p0, line.p1));
    }
}

/// Line to just before `corner`, then curve around it toward `next`.
fn round_corner(path: &mut BezPath, radius: f64, prev: Point, corner: Point, next: Point) {
    let start = move_toward(corner, prev, radius.min(corner.distance(prev) / 2.0));
    let end = move_toward(corner, next, radius.min(corner.distance(next) / 2.0));
    let third = |p: Point| Point::new((p.x + 2.0 * corner.x) / 3.0, (p.y + 2.0 * corner.y) / 3.0);
    path.line_to(start);
    path.curve_to(third(start), third(end), end);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::PathEl;

    const SOURCE: Point = Point::new(0.0, 0.0);
    const TARGET: Point = Point::new(100.0, 0.0);

    fn vertical(x: f64) -> Line {
        Line::new((x, -50.0), (x, 50.0))
    }

    fn ends(path: &BezPath) -> Vec<Point> {
        path.elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn no_crossings_is_a_polyline() {
        let path = JumpOver::default().connect(SOURCE, TARGET, &[]);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(SOURCE), PathEl::LineTo(TARGET)]
        );
    }

    #[test]
    fn arc_jump_bulges_up() {
        let crossings = [vertical(50.0)];
        let path = JumpOver {
            crossings: &crossings,
            ..JumpOver::default()
        }
        .connect(SOURCE, TARGET, &[]);
        assert_eq!(
            ends(&path),
            vec![
                SOURCE,
                Point::new(45.0, 0.0),
                Point::new(50.0, -5.0),
                Point::new(55.0, 0.0),
                TARGET,
            ]
        );
    }

    #[test]
    fn gap_jump_lifts_the_pen() {
        let crossings = [vertical(50.0)];
        let path = JumpOver {
            style: JumpStyle::Gap,
            crossings: &crossings,
            ..JumpOver::default()
        }
        .connect(SOURCE, TARGET, &[]);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(SOURCE),
                PathEl::LineTo(Point::new(45.0, 0.0)),
                PathEl::MoveTo(Point::new(55.0, 0.0)),
                PathEl::LineTo(TARGET),
            ]
        );
    }

    #[test]
    fn cubic_jump_is_one_hump() {
        let crossings = [vertical(50.0)];
        let path = JumpOver {
            style: JumpStyle::Cubic,
            crossings: &crossings,
            ..JumpOver::default()
        }
        .connect(SOURCE, TARGET, &[]);
        let PathEl::CurveTo(c1, c2, end) = path.elements()[2] else {
            panic!("expected a cubic, got {:?}", path.elements());
        };
        assert_eq!(end, Point::new(55.0, 0.0));
        assert!(c1.y < 0.0 && c2.y < 0.0, "hump must bulge up");
    }

    #[test]
    fn close_crossings_merge() {
        let crossings = [vertical(50.0), vertical(58.0)];
        let path = JumpOver {
            style: JumpStyle::Gap,
            crossings: &crossings,
            ..JumpOver::default()
        }
        .connect(SOURCE, TARGET, &[]);
        assert_eq!(
            ends(&path),
            vec![SOURCE, Point::new(45.0, 0.0), Point::new(61.0, 0.0), TARGET]
        );
    }

    #[test]
    fn crossings_near_segment_ends_are_skipped() {
        let crossings = [vertical(95.0), vertical(4.0)];
        let path = JumpOver {
            crossings: &crossings,
            ..JumpOver::default()
        }
        .connect(SOURCE, TARGET, &[]);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(SOURCE), PathEl::LineTo(TARGET)]
        );
    }

    #[test]
    fn vertical_runs_bulge_right() {
        let crossings = [Line::new((-50.0, 50.0), (50.0, 50.0))];
        let path = JumpOver {
            crossings: &crossings,
            ..JumpOver::default()
        }
        .connect(SOURCE, Point::new(0.0, 100.0), &[]);
        assert!(ends(&path).contains(&Point::new(5.0, 50.0)), "{:?}", ends(&path));
    }

    #[test]
    fn corners_round_with_radius() {
        let path = JumpOver {
            radius: 10.0,
            ..JumpOver::default()
        }
        .connect(SOURCE, Point::new(100.0, 100.0), &[Point::new(100.0, 0.0)]);
        assert_eq!(
            ends(&path),
            vec![
                SOURCE,
                Point::new(90.0, 0.0),
                Point::new(100.0, 10.0),
                Point::new(100.0, 100.0),
            ]
        );
    }
}
