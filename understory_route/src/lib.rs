// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_route --heading-base-level=0

//! Understory Route: link routing between diagram elements.
//!
//! Given a source and a target (each a bare point or an element rectangle), an
//! ordered list of vertices to pass through, and a set of obstacle rectangles,
//! compute an ordered list of points that connects them.
//!
//! - [`RouterKind::Orthogonal`]: axis-aligned segments with as few bends as
//!   possible. Obstacles are ignored and a route is always produced.
//! - [`RouterKind::Manhattan`]: A* over a lattice with horizontal and vertical
//!   moves that steers around obstacles.
//! - [`RouterKind::Metro`]: the same search with 45 degree diagonals.
//! - [`RouterKind::RightAngle`]: leaves and enters elements through a chosen or
//!   facing side and joins the two with a fixed right-angle pattern. Obstacles
//!   are ignored.
//!
//! Every call is a pure function of its inputs. The only state a caller may carry
//! between calls is [`Route::last_direction`], which can be passed back as
//! [`RouteConfig::previous_direction`] to keep fallback routes from flipping while
//! an endpoint is dragged.
//!
//! Errors are reserved for invalid configuration and non-finite input. A grid
//! search that cannot complete (every end port blocked, target enclosed,
//! iteration budget spent) returns a route with [`Route::degraded`] set instead.
//!
//! Turning the points into a drawable path is the job of the
//! `understory_connector` crate.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_route::{RouteConfig, RouterKind, route};
//!
//! let a = Rect::new(0.0, 0.0, 40.0, 40.0);
//! let b = Rect::new(200.0, 0.0, 240.0, 40.0);
//! let wall = Rect::new(80.0, -20.0, 120.0, 80.0);
//!
//! let r = route(RouterKind::Manhattan, a, b, &[], &[wall], &RouteConfig::default()).unwrap();
//! assert!(!r.degraded);
//! assert_eq!(r.points.last(), Some(&Point::new(200.0, 20.0)));
//! // Every segment is horizontal or vertical.
//! assert!(r.points.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y));
//! ```
//!
//! Routers can also be driven through the [`Router`] trait with a prebuilt
//! [`ObstacleMap`], which is useful when many links share one obstacle set:
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_route::{Anchor, Manhattan, ObstacleMap, RouteConfig, RouteRequest, Router};
//!
//! let obstacles = ObstacleMap::build(&[Rect::new(40.0, -10.0, 60.0, 10.0)], 100.0).unwrap();
//! let config = RouteConfig::default();
//! let request = RouteRequest {
//!     source: Anchor::Point(Point::new(0.0, 0.0)),
//!     target: Anchor::Point(Point::new(100.0, 0.0)),
//!     vertices: &[],
//!     obstacles: &obstacles,
//!     config: &config,
//! };
//! let r = Manhattan.route(&request).unwrap();
//! assert!(r.points.len() > 2);
//! ```
//!
//! ## Coordinates
//!
//! Points and rectangles are Kurbo types in screen space: y grows downward.
//! Angles and [`Direction`]s are measured counter-clockwise as seen on screen, so
//! north points toward smaller y.
//!
//! This crate is `no_std` and uses `alloc`. Enable the `libm` feature when
//! building without `std`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod geometry;
pub mod obstacle;
pub mod router;
pub mod routers;

pub use config::{End, RouteConfig, Sides, TurnPenalties};
pub use error::RouteError;
pub use geometry::{Bearing, Direction};
pub use obstacle::{MAX_CELLS_PER_OBSTACLE, ObstacleMap};
pub use router::{Anchor, Route, RouteRequest, Router, RouterKind, route};
pub use routers::{Manhattan, Metro, Orthogonal, RightAngle};
