// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Obstacle-avoiding grid routers.
//!
//! A route is searched one leg at a time, where a leg joins two consecutive
//! waypoints. Each leg runs A* over a lattice with spacing exactly `step`,
//! anchored at the leg's origin reference point, so every corner the search
//! produces is a whole number of steps away from that point on both axes.
//!
//! The search starts from every allowed side of the origin element at once and
//! aims at the single end port closest to the origin. A port is a lattice node
//! next to an element side together with the short link from that node to the
//! element boundary (or to an off-lattice point). Links are orthogonal for
//! Manhattan and diagonal-then-orthogonal for Metro, so routes start and end
//! exactly on the element while keeping their angles.
//!
//! Turning costs a penalty, and turns sharper than the configured maximum are
//! never taken. If a leg cannot be completed within the iteration budget, it is
//! replaced by a fallback bend that ignores obstacles, and the route is flagged
//! as degraded.

use alloc::collections::BinaryHeap;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::config::{End, RouteConfig, Sides, TurnPenalties};
use crate::error::RouteError;
use crate::geometry::{
    Bearing, Direction, contains_strict, dedup_points, manhattan_distance, remove_collinear,
};
use crate::obstacle::ObstacleMap;
use crate::router::{Anchor, Route, RouteRequest, Router};
use crate::routers::orthogonal::clip_ends;

type HashMap<K, V> = hashbrown::HashMap<K, V, rustc_hash::FxBuildHasher>;

/// Integer lattice coordinates relative to a leg's origin.
type Key = (i64, i64);

/// Grid router restricted to horizontal and vertical moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

/// Grid router that also moves along 45 degree diagonals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metro;

impl Router for Manhattan {
    fn route(&self, request: &RouteRequest<'_>) -> Result<Route, RouteError> {
        GridRouter::new(request, Moves::Orthogonal)?.run()
    }
}

impl Router for Metro {
    fn route(&self, request: &RouteRequest<'_>) -> Result<Route, RouteError> {
        GridRouter::new(request, Moves::Octilinear)?.run()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Moves {
    Orthogonal,
    Octilinear,
}

impl Moves {
    fn directions(self) -> &'static [Direction] {
        match self {
            Self::Orthogonal => &[
                Direction::East,
                Direction::West,
                Direction::South,
                Direction::North,
            ],
            Self::Octilinear => &[
                Direction::East,
                Direction::SouthEast,
                Direction::South,
                Direction::SouthWest,
                Direction::West,
                Direction::NorthWest,
                Direction::North,
                Direction::NorthEast,
            ],
        }
    }

    fn sectors(self) -> u16 {
        match self {
            Self::Orthogonal => 4,
            Self::Octilinear => 8,
        }
    }
}

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Lattice keys are bounded by the iteration budget around the origin."
)]
fn round_to_i64(v: f64) -> i64 {
    v.round() as i64
}

/// Square lattice of side `step` with a node at `origin`.
#[derive(Clone, Copy, Debug)]
struct Lattice {
    origin: Point,
    step: f64,
}

impl Lattice {
    fn new(origin: Point, step: f64) -> Self {
        Self { origin, step }
    }

    fn key(&self, p: Point) -> Key {
        (
            round_to_i64((p.x - self.origin.x) / self.step),
            round_to_i64((p.y - self.origin.y) / self.step),
        )
    }

    fn point(&self, key: Key) -> Point {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Lattice keys are small integers."
        )]
        let (i, j) = (key.0 as f64, key.1 as f64);
        Point::new(self.origin.x + i * self.step, self.origin.y + j * self.step)
    }

    /// Corners of the lattice cell containing `p`, nearest first.
    ///
    /// A point on a node yields just that node.
    fn around(&self, p: Point) -> Vec<Point> {
        let fx = (p.x - self.origin.x) / self.step;
        let fy = (p.y - self.origin.y) / self.step;
        let mut out: Vec<Point> = Vec::with_capacity(4);
        for i in [fx.floor(), fx.ceil()] {
            for j in [fy.floor(), fy.ceil()] {
                let node = Point::new(self.origin.x + i * self.step, self.origin.y + j * self.step);
                if !out.contains(&node) {
                    out.push(node);
                }
            }
        }
        out.sort_by(|a, b| p.distance(*a).total_cmp(&p.distance(*b)));
        out
    }
}

fn step_key(key: Key, direction: Direction) -> Key {
    let (di, dj) = direction.offset();
    (key.0 + di, key.1 + dj)
}

/// A lattice node a leg may start or end at.
#[derive(Clone, Debug)]
struct Port {
    node: Point,
    /// Points after `node` up to and including the anchor; empty when the node
    /// is the anchor.
    link: Vec<Point>,
}

/// Search state of one lattice node.
#[derive(Clone, Copy, Debug)]
struct Node {
    cost: f64,
    parent: Option<Key>,
    direction: Option<Direction>,
    turns: u32,
    closed: bool,
}

/// Open-set entry; the heap pops the lowest priority, most recently pushed first.
#[derive(Clone, Copy, Debug)]
struct Open {
    priority: f64,
    order: u64,
    key: Key,
    cost: f64,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then(self.order.cmp(&other.order))
    }
}

/// Points of one leg and the direction it ends with.
#[derive(Clone, Debug)]
struct Leg {
    points: Vec<Point>,
    last_direction: Option<Direction>,
}

struct GridRouter<'a> {
    request: &'a RouteRequest<'a>,
    config: &'a RouteConfig,
    obstacles: &'a ObstacleMap,
    moves: Moves,
    padding: f64,
    penalties: TurnPenalties,
    diagonal_cost: f64,
}

impl<'a> GridRouter<'a> {
    fn new(request: &'a RouteRequest<'a>, moves: Moves) -> Result<Self, RouteError> {
        request.validate()?;
        let config = request.config;
        if matches!(request.source, Anchor::Rect(_)) && config.start_sides.is_empty() {
            return Err(RouteError::NoStartSides);
        }
        if matches!(request.target, Anchor::Rect(_)) && config.end_sides.is_empty() {
            return Err(RouteError::NoEndSides);
        }
        Ok(Self {
            request,
            config,
            obstacles: request.obstacles,
            moves,
            padding: config.padding_or(0.0),
            penalties: config.resolved_penalties(),
            diagonal_cost: config.resolved_diagonal_cost(),
        })
    }

    fn run(&self) -> Result<Route, RouteError> {
        let request = self.request;
        let reversed = self.config.stable_end == End::Target;

        // Search from the stable end toward the end that moved.
        let mut waypoints = Vec::with_capacity(request.vertices.len() + 2);
        let (start_sides, end_sides) = if reversed {
            waypoints.push(request.target);
            waypoints.extend(request.vertices.iter().rev().copied().map(Anchor::Point));
            waypoints.push(request.source);
            (self.config.end_sides, self.config.start_sides)
        } else {
            waypoints.push(request.source);
            waypoints.extend(request.vertices.iter().copied().map(Anchor::Point));
            waypoints.push(request.target);
            (self.config.start_sides, self.config.end_sides)
        };

        let mut points: Vec<Point> = Vec::new();
        let mut degraded = false;
        let mut incoming: Option<Direction> = None;
        let last_leg = waypoints.len() - 2;

        for (i, pair) in waypoints.windows(2).enumerate() {
            let from_sides = if i == 0 { start_sides } else { Sides::all() };
            let to_sides = if i == last_leg { end_sides } else { Sides::all() };
            let leg = match self.search_leg(&pair[0], &pair[1], from_sides, to_sides, incoming) {
                Some(leg) => leg,
                None => {
                    degraded = true;
                    self.fallback_leg(
                        &pair[0],
                        &pair[1],
                        incoming.or(self.config.previous_direction),
                    )
                }
            };
            incoming = leg.last_direction;
            let skip = usize::from(points.last() == leg.points.first());
            points.extend(leg.points.into_iter().skip(skip));
        }

        if reversed {
            points.reverse();
        }
        dedup_points(&mut points);
        if let [p] = points.as_slice() {
            let p = *p;
            points.push(p);
        }
        let last_direction = match points.as_slice() {
            [.., a, b] if a != b => Some(Direction::between(*a, *b, self.moves.sectors())),
            _ => None,
        };
        if degraded {
            tracing::debug!(points = points.len(), "grid route degraded to fallback");
        }
        Ok(Route {
            points,
            degraded,
            last_direction,
        })
    }

    /// Ports a leg may start or end at, with links that stay clear of obstacles.
    ///
    /// Rectangles offer one port per allowed side: the side midpoint of the
    /// padded rectangle snapped to the lattice, pushed one step outward when the
    /// snap lands inside. Points offer the corners of the lattice cell they sit
    /// in.
    fn ports(&self, anchor: &Anchor, allowed: Sides, lattice: &Lattice) -> Vec<Port> {
        let mut out: Vec<Port> = Vec::with_capacity(4);
        match anchor {
            Anchor::Point(p) => {
                for node in lattice.around(*p) {
                    if self.obstacles.is_blocked(node) {
                        continue;
                    }
                    if let Some(link) = self.point_link(node, *p, true) {
                        out.push(Port { node, link });
                    }
                }
            }
            Anchor::Rect(r) => {
                let raw = r.abs();
                let padded = raw.inflate(self.padding, self.padding);
                let c = padded.center();
                let sides = [
                    (Sides::TOP, Point::new(c.x, padded.y0), Bearing::North),
                    (Sides::RIGHT, Point::new(padded.x1, c.y), Bearing::East),
                    (Sides::BOTTOM, Point::new(c.x, padded.y1), Bearing::South),
                    (Sides::LEFT, Point::new(padded.x0, c.y), Bearing::West),
                ];
                for (side, midpoint, outward) in sides {
                    if !allowed.contains(side) {
                        continue;
                    }
                    let mut key = lattice.key(midpoint);
                    if contains_strict(&padded, lattice.point(key)) {
                        key = step_key(key, Direction::from(outward));
                    }
                    let node = lattice.point(key);
                    if out.iter().any(|port| port.node == node) || self.obstacles.is_blocked(node) {
                        continue;
                    }
                    let link = side_link(node, &raw, outward);
                    if self.is_link_clear(node, &link) {
                        out.push(Port { node, link });
                    }
                }
            }
        }
        out
    }

    /// Path from a lattice node to an off-lattice point, or `None` when every
    /// shape of it is blocked.
    ///
    /// Manhattan bends once, horizontally first when `horizontal_first` holds
    /// and the other way round otherwise. Metro runs diagonally until one axis
    /// is matched, then straight.
    fn point_link(&self, node: Point, target: Point, horizontal_first: bool) -> Option<Vec<Point>> {
        if node == target {
            return Some(Vec::new());
        }
        match self.moves {
            Moves::Orthogonal => {
                let across = Point::new(target.x, node.y);
                let down = Point::new(node.x, target.y);
                let order = if horizontal_first {
                    [across, down]
                } else {
                    [down, across]
                };
                order
                    .into_iter()
                    .map(|bend| vec![bend, target])
                    .find(|link| self.is_link_clear(node, link))
            }
            Moves::Octilinear => {
                let link = vec![diagonal_bend(node, target), target];
                self.is_link_clear(node, &link).then_some(link)
            }
        }
    }

    fn is_link_clear(&self, node: Point, link: &[Point]) -> bool {
        let mut prev = node;
        link.iter().all(|&p| {
            let clear = !self.obstacles.is_segment_blocked(prev, p);
            prev = p;
            clear
        })
    }

    fn is_passable(&self, from: Point, to: Point, zones: &[Rect]) -> bool {
        !zones.iter().any(|z| contains_strict(z, to))
            && !self.obstacles.is_segment_blocked(from, to)
    }

    fn move_cost(&self, direction: Direction) -> f64 {
        if direction.is_diagonal() {
            self.diagonal_cost
        } else {
            self.config.step
        }
    }

    /// A* from every start port of `from` to the chosen end port of `to`.
    ///
    /// Returns `None` when no port survives filtering, the open set runs dry,
    /// or the iteration budget is spent.
    fn search_leg(
        &self,
        from: &Anchor,
        to: &Anchor,
        start_sides: Sides,
        end_sides: Sides,
        incoming: Option<Direction>,
    ) -> Option<Leg> {
        let origin = from.reference();
        let destination = to.reference();
        let lattice = Lattice::new(origin, self.config.step);
        let sectors = self.moves.sectors();

        let mut starts = self.ports(from, start_sides, &lattice);
        let ends = self.ports(to, end_sides, &lattice);

        let goal = ends
            .into_iter()
            .min_by(|a, b| origin.distance(a.node).total_cmp(&origin.distance(b.node)));
        let Some(goal) = goal else {
            tracing::debug!(?destination, "every end port is blocked");
            return None;
        };
        // A loop back onto the same element must leave from a different side.
        if let (Anchor::Rect(a), Anchor::Rect(b)) = (from, to)
            && a == b
        {
            starts.retain(|port| port.node != goal.node);
        }
        if starts.is_empty() {
            tracing::debug!(?origin, "every start port is blocked");
            return None;
        }

        let goal_key = lattice.key(goal.node);
        // Entering an element is limited by the direction toward its centre.
        let entry_direction = match to {
            Anchor::Rect(_) if goal.node != destination => {
                Some(Direction::between(goal.node, destination, sectors))
            }
            _ => None,
        };
        let zones: Vec<Rect> = [from.rect(), to.rect()]
            .into_iter()
            .flatten()
            .map(|r| r.inflate(self.padding, self.padding))
            .collect();
        let max_change = self.config.max_direction_change;

        let mut nodes: HashMap<Key, Node> = HashMap::default();
        let mut open: BinaryHeap<Open> = BinaryHeap::new();
        let mut order: u64 = 0;

        for port in &starts {
            let key = lattice.key(port.node);
            if nodes.contains_key(&key) {
                continue;
            }
            let direction = incoming.or_else(|| {
                (port.node != origin).then(|| Direction::between(origin, port.node, sectors))
            });
            nodes.insert(
                key,
                Node {
                    cost: 0.0,
                    parent: None,
                    direction,
                    turns: 0,
                    closed: false,
                },
            );
            open.push(Open {
                priority: manhattan_distance(port.node, goal.node),
                order,
                key,
                cost: 0.0,
            });
            order += 1;
        }

        tracing::trace!(starts = starts.len(), goal = ?goal.node, "grid leg search started");
        let mut budget = self.config.max_iterations;

        while budget > 0 {
            let Some(entry) = open.pop() else {
                break;
            };
            let Some(node) = nodes.get(&entry.key).copied() else {
                continue;
            };
            if node.closed || entry.cost > node.cost {
                continue;
            }
            budget -= 1;
            if let Some(n) = nodes.get_mut(&entry.key) {
                n.closed = true;
            }

            if entry.key == goal_key {
                tracing::trace!(
                    iterations = self.config.max_iterations - budget,
                    "grid leg search reached goal"
                );
                let (first, corners) = reconstruct(&nodes, goal_key, &lattice);
                return Some(self.assemble(&starts, first, corners, &lattice, &goal, to, incoming));
            }

            let here = lattice.point(entry.key);
            for &direction in self.moves.directions() {
                let change = node.direction.map(|d| d.change(direction));
                if change.is_some_and(|c| c > max_change) {
                    continue;
                }
                let key = step_key(entry.key, direction);
                if nodes.get(&key).is_some_and(|n| n.closed) {
                    continue;
                }
                let is_goal = key == goal_key;
                if let (true, Some(end_direction)) = (is_goal, entry_direction)
                    && direction.change(end_direction) > max_change
                {
                    continue;
                }
                let there = lattice.point(key);
                let passable = if is_goal {
                    !self.obstacles.is_segment_blocked(here, there)
                } else {
                    self.is_passable(here, there, &zones)
                };
                if !passable {
                    continue;
                }
                let turned = change.is_some_and(|c| c > 0);
                let turns = node.turns + u32::from(turned);
                if self.config.max_turns.is_some_and(|cap| turns > cap) {
                    continue;
                }
                let penalty = if node.parent.is_none() {
                    0.0
                } else {
                    self.penalties.penalty(change.unwrap_or(0))
                };
                let cost = node.cost + self.move_cost(direction) + penalty;
                if nodes.get(&key).is_some_and(|n| n.cost <= cost) {
                    continue;
                }
                nodes.insert(
                    key,
                    Node {
                        cost,
                        parent: Some(entry.key),
                        direction: Some(direction),
                        turns,
                        closed: false,
                    },
                );
                open.push(Open {
                    priority: cost + manhattan_distance(there, goal.node),
                    order,
                    key,
                    cost,
                });
                order += 1;
            }
        }

        tracing::debug!(
            iterations = self.config.max_iterations - budget,
            open = open.len(),
            "grid leg search gave up"
        );
        None
    }

    /// Join the searched corners to the exact anchors through their port links.
    #[allow(
        clippy::too_many_arguments,
        reason = "Every piece of a finished search is needed to stitch the leg together."
    )]
    fn assemble(
        &self,
        starts: &[Port],
        first: Key,
        corners: Vec<Point>,
        lattice: &Lattice,
        goal: &Port,
        to: &Anchor,
        incoming: Option<Direction>,
    ) -> Leg {
        let start = starts.iter().find(|port| lattice.key(port.node) == first);
        let mut points: Vec<Point> = start
            .map(|port| port.link.iter().rev().copied().collect())
            .unwrap_or_default();
        let arrival = match corners.as_slice() {
            [.., a, b] => Some(Direction::between(*a, *b, self.moves.sectors())),
            _ => None,
        };
        points.extend(corners);

        // Carry on in the arrival direction when that shape of the link is clear.
        let end_link = match to {
            Anchor::Point(p) if self.moves == Moves::Orthogonal => {
                let horizontal = arrival.or(incoming).is_some_and(Direction::is_horizontal);
                self.point_link(goal.node, *p, horizontal)
                    .unwrap_or_else(|| goal.link.clone())
            }
            _ => goal.link.clone(),
        };
        points.extend(end_link);
        dedup_points(&mut points);
        remove_collinear(&mut points);

        let last_direction = match points.as_slice() {
            [.., a, b] => Some(Direction::between(*a, *b, self.moves.sectors())),
            _ => arrival.or(incoming),
        };
        Leg {
            points,
            last_direction,
        }
    }

    /// A single bend between the two references that ignores obstacles.
    fn fallback_leg(&self, from: &Anchor, to: &Anchor, hint: Option<Direction>) -> Leg {
        let a = from.reference();
        let b = to.reference();
        let bend = match self.moves {
            Moves::Orthogonal => {
                if hint.is_some_and(Direction::is_horizontal) {
                    Point::new(b.x, a.y)
                } else {
                    Point::new(a.x, b.y)
                }
            }
            Moves::Octilinear => diagonal_bend(a, b),
        };
        let mut points = vec![a, bend, b];
        clip_ends(&mut points, from, to);
        tracing::debug!(?a, ?b, "grid leg fell back to a single bend");
        let last_direction = match points.as_slice() {
            [.., p, q] if p != q => Some(Direction::between(*p, *q, self.moves.sectors())),
            _ => hint,
        };
        Leg {
            points,
            last_direction,
        }
    }
}

impl core::fmt::Debug for GridRouter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridRouter")
            .field("moves", &self.moves)
            .field("padding", &self.padding)
            .field("diagonal_cost", &self.diagonal_cost)
            .finish_non_exhaustive()
    }
}

/// Walk parents back from `goal_key`; returns the first key and the corners.
fn reconstruct(nodes: &HashMap<Key, Node>, goal_key: Key, lattice: &Lattice) -> (Key, Vec<Point>) {
    let mut keys = vec![goal_key];
    let mut cursor = goal_key;
    while let Some(parent) = nodes.get(&cursor).and_then(|n| n.parent) {
        keys.push(parent);
        cursor = parent;
    }
    keys.reverse();

    let mut points = Vec::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        let keep = match (i.checked_sub(1).map(|j| keys[j]), keys.get(i + 1)) {
            (Some(prev), Some(next)) => {
                (key.0 - prev.0, key.1 - prev.1) != (next.0 - key.0, next.1 - key.1)
            }
            _ => true,
        };
        if keep {
            points.push(lattice.point(*key));
        }
    }
    (keys[0], points)
}

/// Where a 45 degree run from `a` toward `b` matches one of its coordinates.
///
/// The matched coordinate is copied from `b` so the remaining run is exactly
/// axis-aligned.
fn diagonal_bend(a: Point, b: Point) -> Point {
    let d = b - a;
    let signed = |m: f64, toward: f64| if toward < 0.0 { -m } else { m };
    if d.x.abs() <= d.y.abs() {
        Point::new(b.x, a.y + signed(d.x.abs(), d.y))
    } else {
        Point::new(a.x + signed(d.y.abs(), d.x), b.y)
    }
}

/// Path from a port node onto the `side` of `raw`.
///
/// The node lies outside the side, so the link is one straight segment along
/// the side's normal. A node past the end of the side first slides back
/// alongside it.
fn side_link(node: Point, raw: &Rect, side: Bearing) -> Vec<Point> {
    let boundary = match side {
        Bearing::North => Point::new(node.x.clamp(raw.x0, raw.x1), raw.y0),
        Bearing::South => Point::new(node.x.clamp(raw.x0, raw.x1), raw.y1),
        Bearing::East => Point::new(raw.x1, node.y.clamp(raw.y0, raw.y1)),
        Bearing::West => Point::new(raw.x0, node.y.clamp(raw.y0, raw.y1)),
    };
    let mut link = Vec::with_capacity(2);
    if side.is_horizontal() {
        if boundary.y != node.y {
            link.push(Point::new(node.x, boundary.y));
        }
    } else if boundary.x != node.x {
        link.push(Point::new(boundary.x, node.y));
    }
    link.push(boundary);
    link
}
