// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connector trait for path generation strategies.

use kurbo::{BezPath, Point};

/// Turns a routed point sequence into a drawable path.
///
/// `points` are the route's interior waypoints; `source` and `target` are the
/// resolved anchor points at either end. Implementations never fail and the
/// returned path always starts with a move-to `source`.
pub trait Connector {
    /// Build the path from `source` through `points` to `target`.
    fn connect(&self, source: Point, target: Point, points: &[Point]) -> BezPath;
}
