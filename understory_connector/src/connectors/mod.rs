// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in connectors.

mod curve;
mod jumpover;
mod polyline;
mod rounded;
mod smooth;

pub use curve::{Curve, CurveDirection};
pub use jumpover::{JumpOver, JumpStyle};
pub use polyline::Polyline;
pub use rounded::Rounded;
pub use smooth::{Axis, Smooth, control_points};
