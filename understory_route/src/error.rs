// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported when a routing request cannot be attempted.
//!
//! A search that fails to find a path is not an error. Routers return a degraded
//! fallback route for that case. These variants cover configuration and input
//! problems detected before any search starts.

/// Configuration or input rejected by [`RouteConfig::validate`](crate::RouteConfig::validate)
/// or by a router entry point.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// The lattice step was zero, negative, or not finite.
    #[error("step size must be positive and finite, got {0}")]
    InvalidStep(f64),
    /// The obstacle index cell size was zero, negative, or not finite.
    #[error("obstacle cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),
    /// The iteration budget was zero.
    #[error("iteration budget must be at least 1")]
    InvalidIterations,
    /// The maximum allowed direction change exceeded 180 degrees.
    #[error("maximum direction change must be within 0..=180 degrees, got {0}")]
    InvalidDirectionChange(u16),
    /// The padding was negative or not finite.
    #[error("padding must be finite and non-negative, got {0}")]
    InvalidPadding(f64),
    /// An explicit diagonal step cost was zero, negative, or not finite.
    #[error("diagonal step cost must be positive and finite, got {0}")]
    InvalidDiagonalCost(f64),
    /// A turn penalty was negative or not finite.
    #[error("turn penalties must be finite and non-negative")]
    InvalidPenalty,
    /// The source is a rectangle but no start side is allowed.
    #[error("no start side is allowed for a rectangular source")]
    NoStartSides,
    /// The target is a rectangle but no end side is allowed.
    #[error("no end side is allowed for a rectangular target")]
    NoEndSides,
    /// An anchor, vertex, or obstacle carried a NaN or infinite coordinate.
    #[error("routing input contains a non-finite coordinate")]
    NonFiniteInput,
}
