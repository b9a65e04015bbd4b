// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in routers.
//!
//! - [`Orthogonal`]: inserts the fewest right-angle joints between consecutive
//!   knots. Ignores obstacles and always succeeds.
//! - [`Manhattan`]: A* over a lattice with horizontal and vertical moves,
//!   avoiding obstacles.
//! - [`Metro`]: the same search with 45 degree diagonal moves added.
//! - [`RightAngle`]: picks a side at each end and joins them with a fixed
//!   right-angle pattern that clears both padded boxes. Ignores obstacles.

mod grid;
mod orthogonal;
mod right_angle;

pub use grid::{Manhattan, Metro};
pub use orthogonal::{DEFAULT_PADDING, Orthogonal};
pub use right_angle::RightAngle;
