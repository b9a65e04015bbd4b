// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid over obstacle rectangles.
//!
//! Each obstacle is registered in every cell its rectangle overlaps, so a point
//! query only has to look at one bucket. Cells are keyed by integer coordinates
//! computed by floor-division of the point by the cell size; negative coordinates
//! are fine.
//!
//! Obstacles covering more than [`MAX_CELLS_PER_OBSTACLE`] cells are not
//! bucketed. They sit in one shared list that every query checks, which keeps
//! the index small when a huge obstacle meets a tiny cell size.

use alloc::vec::Vec;
use core::fmt::Debug;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::error::RouteError;
use crate::geometry::{contains_inclusive, is_finite_rect, segment_intersects_rect};

type HashMap<K, V> = hashbrown::HashMap<K, V, rustc_hash::FxBuildHasher>;

/// Most cells one obstacle is bucketed into; larger ones are checked by every query.
pub const MAX_CELLS_PER_OBSTACLE: u64 = 1024;

/// Number of cells in the inclusive key range `min..=max`.
fn cell_span(min: (i64, i64), max: (i64, i64)) -> u64 {
    let w = max.0.abs_diff(min.0).saturating_add(1);
    let h = max.1.abs_diff(min.1).saturating_add(1);
    w.saturating_mul(h)
}

/// Immutable spatial index answering "is this point inside any obstacle".
///
/// Build one per routing pass. There is no incremental update; rebuild when the
/// obstacle set changes.
pub struct ObstacleMap {
    cell_size: f64,
    obstacles: Vec<Rect>,
    cells: HashMap<(i64, i64), Vec<usize>>,
    oversized: Vec<usize>,
}

impl ObstacleMap {
    /// Cell size used when none is configured.
    pub const DEFAULT_CELL_SIZE: f64 = 100.0;

    /// Index `obstacles` into cells of `cell_size`.
    ///
    /// Rectangles are normalized so their width and height are non-negative.
    /// Choose a cell size so most obstacles fall within a handful of cells.
    pub fn build(obstacles: &[Rect], cell_size: f64) -> Result<Self, RouteError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RouteError::InvalidCellSize(cell_size));
        }
        if !obstacles.iter().all(is_finite_rect) {
            return Err(RouteError::NonFiniteInput);
        }
        let mut map = Self {
            cell_size,
            obstacles: obstacles.iter().map(Rect::abs).collect(),
            cells: HashMap::default(),
            oversized: Vec::new(),
        };
        for slot in 0..map.obstacles.len() {
            let rect = map.obstacles[slot];
            let (minx, miny) = map.key_for(rect.x0, rect.y0);
            let (maxx, maxy) = map.key_for(rect.x1, rect.y1);
            if cell_span((minx, miny), (maxx, maxy)) > MAX_CELLS_PER_OBSTACLE {
                map.oversized.push(slot);
                continue;
            }
            for y in miny..=maxy {
                for x in minx..=maxx {
                    map.cells.entry((x, y)).or_default().push(slot);
                }
            }
        }
        Ok(map)
    }

    /// An index with no obstacles.
    pub fn empty() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            obstacles: Vec::new(),
            cells: HashMap::default(),
            oversized: Vec::new(),
        }
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Cell keys saturate for coordinates far outside any realistic canvas."
        )]
        let i = v as i64;
        if (i as f64) > v { i - 1 } else { i }
    }

    fn key_for(&self, x: f64, y: f64) -> (i64, i64) {
        (
            Self::floor_to_i64(x / self.cell_size),
            Self::floor_to_i64(y / self.cell_size),
        )
    }

    /// Number of indexed obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// True if no obstacle is indexed.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Cell size the index was built with.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// All indexed obstacles, normalized.
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// Obstacles registered in the cell containing `p`, plus the oversized ones.
    ///
    /// These are candidates only; they need not contain `p`.
    pub fn candidates(&self, p: Point) -> impl Iterator<Item = &Rect> + '_ {
        self.cells
            .get(&self.key_for(p.x, p.y))
            .into_iter()
            .flatten()
            .chain(&self.oversized)
            .map(|&slot| &self.obstacles[slot])
    }

    /// True if `p` lies inside or on the boundary of any obstacle.
    pub fn is_blocked(&self, p: Point) -> bool {
        self.candidates(p).any(|r| contains_inclusive(r, p))
    }

    /// True if the segment `a → b` touches any obstacle.
    ///
    /// This is an exact test against every obstacle registered in the cells the
    /// segment's bounding box covers. Segments spanning more cells than there are
    /// obstacles worth walking scan the obstacle list instead.
    pub fn is_segment_blocked(&self, a: Point, b: Point) -> bool {
        if self.obstacles.is_empty() {
            return false;
        }
        let hits = |slot: &usize| segment_intersects_rect(a, b, &self.obstacles[*slot]);
        if self.oversized.iter().any(hits) {
            return true;
        }
        let (minx, miny) = self.key_for(a.x.min(b.x), a.y.min(b.y));
        let (maxx, maxy) = self.key_for(a.x.max(b.x), a.y.max(b.y));
        if cell_span((minx, miny), (maxx, maxy)) > MAX_CELLS_PER_OBSTACLE {
            return self
                .obstacles
                .iter()
                .any(|r| segment_intersects_rect(a, b, r));
        }
        for y in miny..=maxy {
            for x in minx..=maxx {
                let Some(slots) = self.cells.get(&(x, y)) else {
                    continue;
                };
                if slots.iter().any(hits) {
                    return true;
                }
            }
        }
        false
    }

    /// True if no sample taken every `sample` units along `a → b` is blocked.
    ///
    /// Both endpoints are always sampled. A non-positive `sample` falls back to
    /// [`ObstacleMap::is_segment_blocked`].
    pub fn is_segment_clear(&self, a: Point, b: Point, sample: f64) -> bool {
        if !(sample.is_finite() && sample > 0.0) {
            return !self.is_segment_blocked(a, b);
        }
        let steps = (a.distance(b) / sample).ceil().max(1.0);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "steps is a positive whole number."
        )]
        let n = steps as usize;
        (0..=n).all(|i| {
            #[allow(clippy::cast_precision_loss, reason = "Sample counts are small.")]
            let t = i as f64 / n as f64;
            !self.is_blocked(a.lerp(b, t))
        })
    }
}

impl Debug for ObstacleMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObstacleMap")
            .field("cell_size", &self.cell_size)
            .field("obstacles", &self.obstacles.len())
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .finish_non_exhaustive()
    }
}
