// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing configuration.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::error::RouteError;
use crate::geometry::Direction;

bitflags::bitflags! {
    /// Sides of a rectangle a route may leave from or arrive at.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Sides: u8 {
        /// The side with the smallest y.
        const TOP    = 0b0000_0001;
        /// The side with the largest x.
        const RIGHT  = 0b0000_0010;
        /// The side with the largest y.
        const BOTTOM = 0b0000_0100;
        /// The side with the smallest x.
        const LEFT   = 0b0000_1000;
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::all()
    }
}

/// Which endpoint of a link is considered stable.
///
/// Grid searches run from the stable end toward the end that moved most recently,
/// so the part of the route near the stable end does not jitter while the other
/// end is being dragged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum End {
    /// Search from the source toward the target.
    #[default]
    Source,
    /// Search from the target toward the source, then reverse the result.
    Target,
}

/// Extra cost added to a grid move for changing direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnPenalties {
    /// Continuing in the same direction.
    pub straight: f64,
    /// A 45 degree turn.
    pub diagonal: f64,
    /// A 90 degree turn.
    pub right_angle: f64,
    /// A 135 or 180 degree turn.
    pub sharp: f64,
}

impl TurnPenalties {
    /// Penalties scaled to a lattice step: `0`, `step/2`, `step/2`, `step`.
    pub fn for_step(step: f64) -> Self {
        Self {
            straight: 0.0,
            diagonal: step / 2.0,
            right_angle: step / 2.0,
            sharp: step,
        }
    }

    /// Penalty for a direction change of `degrees` (`0..=180`).
    pub fn penalty(&self, degrees: u16) -> f64 {
        match degrees {
            0 => self.straight,
            1..=45 => self.diagonal,
            46..=90 => self.right_angle,
            _ => self.sharp,
        }
    }

    fn is_valid(&self) -> bool {
        [self.straight, self.diagonal, self.right_angle, self.sharp]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Configuration shared by all routers.
///
/// Fields are public; `with_*` helpers are provided for chained construction.
/// [`RouteConfig::validate`] is run by every router before any search state is
/// allocated.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteConfig {
    /// Lattice step for grid routers.
    pub step: f64,
    /// Cell size of the obstacle index.
    pub cell_size: f64,
    /// Padding applied around source and target rectangles.
    ///
    /// `None` selects the router default: 20 for the orthogonal router, 0 for grid routers.
    pub padding: Option<f64>,
    /// Sides of a rectangular source a grid route may start from.
    pub start_sides: Sides,
    /// Sides of a rectangular target a grid route may end at.
    pub end_sides: Sides,
    /// Turn penalties; `None` derives them from `step`.
    pub penalties: Option<TurnPenalties>,
    /// Maximum number of node expansions per leg.
    pub max_iterations: usize,
    /// Largest direction change (degrees) a single grid move may make.
    pub max_direction_change: u16,
    /// Optional cap on the number of direction changes along a leg.
    pub max_turns: Option<u32>,
    /// Cost of a diagonal move; `None` uses `ceil(step * sqrt(2))`.
    pub diagonal_cost: Option<f64>,
    /// Which end is held stable while searching.
    pub stable_end: End,
    /// Direction the previous route ended with, used to keep fallback routes stable.
    pub previous_direction: Option<Direction>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            step: 10.0,
            cell_size: 100.0,
            padding: None,
            start_sides: Sides::all(),
            end_sides: Sides::all(),
            penalties: None,
            max_iterations: 2000,
            max_direction_change: 90,
            max_turns: None,
            diagonal_cost: None,
            stable_end: End::Source,
            previous_direction: None,
        }
    }
}

impl RouteConfig {
    /// Set the lattice step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the obstacle index cell size.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the endpoint padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Restrict the sides a route may start from and end at.
    pub fn with_sides(mut self, start: Sides, end: Sides) -> Self {
        self.start_sides = start;
        self.end_sides = end;
        self
    }

    /// Set the per-leg iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the stable end.
    pub fn with_stable_end(mut self, end: End) -> Self {
        self.stable_end = end;
        self
    }

    /// Set the previous-direction hint.
    pub fn with_previous_direction(mut self, direction: Option<Direction>) -> Self {
        self.previous_direction = direction;
        self
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), RouteError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(RouteError::InvalidStep(self.step));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(RouteError::InvalidCellSize(self.cell_size));
        }
        if let Some(padding) = self.padding
            && !(padding.is_finite() && padding >= 0.0)
        {
            return Err(RouteError::InvalidPadding(padding));
        }
        if self.max_iterations == 0 {
            return Err(RouteError::InvalidIterations);
        }
        if self.max_direction_change > 180 {
            return Err(RouteError::InvalidDirectionChange(
                self.max_direction_change,
            ));
        }
        if let Some(cost) = self.diagonal_cost
            && !(cost.is_finite() && cost > 0.0)
        {
            return Err(RouteError::InvalidDiagonalCost(cost));
        }
        if let Some(penalties) = &self.penalties
            && !penalties.is_valid()
        {
            return Err(RouteError::InvalidPenalty);
        }
        Ok(())
    }

    pub(crate) fn padding_or(&self, default: f64) -> f64 {
        self.padding.unwrap_or(default)
    }

    pub(crate) fn resolved_penalties(&self) -> TurnPenalties {
        self.penalties
            .unwrap_or_else(|| TurnPenalties::for_step(self.step))
    }

    pub(crate) fn resolved_diagonal_cost(&self) -> f64 {
        self.diagonal_cost
            .unwrap_or_else(|| (self.step * core::f64::consts::SQRT_2).ceil())
    }
}
