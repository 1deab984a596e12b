// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Geometry: rectangle and transform helpers shared by the treemap crates.
//!
//! Rectangles and transforms are plain [`kurbo`] types. This crate adds the few
//! operations a treemap needs on top of them and pins down their behavior on
//! degenerate input:
//!
//! - [`RectExt`] adds interior intersection, inclusion, half-open containment,
//!   aspect ratio, and conservative transformed bounding boxes to [`Rect`].
//! - [`aspect_ratio`] computes `max(w, h) / min(w, h)` without ever producing
//!   NaN or infinity: zero-width rectangles report [`f64::MAX`] and fully
//!   collapsed ones report `1.0`.
//! - [`try_inverse`] inverts an [`Affine`] or reports an [`InvertError`] when the
//!   transform is singular or non-finite.
//! - [`pixel_centers`] finds the pixels of a grid whose centers fall inside a
//!   rectangle, using the same half-open rule.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use treemap_geometry::RectExt;
//!
//! let a = Rect::new(0.0, 0.0, 75.0, 50.0);
//! let b = Rect::new(75.0, 0.0, 100.0, 50.0);
//!
//! // Shared edges do not count as an intersection.
//! assert!(!a.intersects(&b));
//! assert_eq!(a.aspect_ratio(), 1.5);
//! assert!(a.contains_half_open(Point::new(0.0, 0.0)));
//! assert!(!a.contains_half_open(Point::new(75.0, 10.0)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod affine;
mod pixel;
mod rect;

pub use affine::{InvertError, try_inverse, uniform_scale};
pub use pixel::pixel_centers;
pub use rect::{RectExt, aspect_ratio};

#[doc(no_inline)]
pub use kurbo::{Affine, Point, Rect, Vec2};
