// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap View: pan and zoom state for interactive treemap viewers.
//!
//! [`PanZoom`] owns the world-to-screen [`Affine`](kurbo::Affine) of a view.
//! It zooms in powers of two around a screen point, pans in pixels, fits a
//! world rectangle, and can confine the view to a world rectangle so users
//! never scroll off the map. It does not render anything; callers feed the
//! transform to a renderer or compositor and redraw when
//! [`PanZoom::take_invalidation`] says so.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use treemap_view::PanZoom;
//!
//! let mut view = PanZoom::new(Rect::new(0.0, 0.0, 800.0, 600.0));
//! view.fit(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
//! assert_eq!(view.scale(), 600.0);
//!
//! // Four steps of 2^0.25 double the scale, keeping the cursor's world point.
//! let cursor = Point::new(400.0, 300.0);
//! let before = view.screen_to_world(cursor).unwrap();
//! view.zoom(cursor, 4.0);
//! assert!((view.scale() - 1200.0).abs() < 1e-9);
//! assert!((view.screen_to_world(cursor).unwrap() - before).hypot() < 1e-9);
//!
//! view.pan(Vec2::new(-20.0, 0.0));
//! assert!(view.take_invalidation());
//! assert!(!view.take_invalidation());
//! ```

mod error;
mod pan_zoom;

pub use error::ViewError;
pub use pan_zoom::{PanZoom, PanZoomConfig};
