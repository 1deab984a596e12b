// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan/zoom state.

use kurbo::{Affine, Point, Rect, Vec2};
use treemap_geometry::{RectExt, try_inverse, uniform_scale};

use crate::ViewError;

/// Tuning for [`PanZoom`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanZoomConfig {
    /// Exponent per zoom step: one step scales by `2^zoom_step`.
    pub zoom_step: f64,
    /// Smallest scale [`PanZoom::zoom`] will reach.
    pub min_scale: f64,
    /// Largest scale [`PanZoom::zoom`] will reach.
    pub max_scale: f64,
}

impl Default for PanZoomConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.25,
            min_scale: 1.0e-9,
            max_scale: 1.0e9,
        }
    }
}

/// The world-to-screen transform of a treemap view.
///
/// Screen coordinates are pixels inside the viewport rectangle. All
/// operations keep the transform a uniform scale plus translation unless one
/// is installed with [`PanZoom::set_transform`].
///
/// When limits are set, the limits rectangle always covers the viewport: the
/// view cannot be zoomed out past it or panned beyond its edges.
///
/// Every change that moves the transform sets an invalidation flag and bumps
/// the revision; no-op requests (for example a pan that the limits undo) do
/// neither. The flag starts raised so the first frame gets drawn.
#[derive(Clone, Debug)]
pub struct PanZoom {
    config: PanZoomConfig,
    viewport: Rect,
    transform: Affine,
    limits: Option<Rect>,
    invalidated: bool,
    revision: u64,
}

impl PanZoom {
    /// A view of `viewport` at identity.
    pub fn new(viewport: Rect) -> Self {
        Self::with_config(viewport, PanZoomConfig::default())
    }

    /// A view of `viewport` at identity with custom tuning.
    pub fn with_config(viewport: Rect, config: PanZoomConfig) -> Self {
        Self {
            config,
            viewport,
            transform: Affine::IDENTITY,
            limits: None,
            invalidated: true,
            revision: 0,
        }
    }

    /// Current world-to-screen transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// The screen rectangle being viewed.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// World rectangle the view is confined to, if any.
    pub fn limits(&self) -> Option<Rect> {
        self.limits
    }

    /// Uniform scale of the current transform, in pixels per world unit.
    pub fn scale(&self) -> f64 {
        uniform_scale(self.transform)
    }

    /// Install a transform. Singular or non-finite transforms are rejected and
    /// leave the view unchanged.
    pub fn set_transform(&mut self, transform: Affine) -> Result<(), ViewError> {
        try_inverse(transform)?;
        self.apply(transform);
        Ok(())
    }

    /// Zoom by `delta_steps` (positive zooms in) keeping the world point under
    /// `screen_point` fixed.
    ///
    /// The resulting scale is clamped to `[min_scale, max_scale]`.
    pub fn zoom(&mut self, screen_point: Point, delta_steps: f64) {
        if !delta_steps.is_finite() {
            return;
        }
        let scale = self.scale();
        let target = (scale * (delta_steps * self.config.zoom_step).exp2())
            .max(self.config.min_scale)
            .min(self.config.max_scale);
        let factor = target / scale;
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let about = screen_point.to_vec2();
        let t = Affine::translate(about)
            * Affine::scale(factor)
            * Affine::translate(-about)
            * self.transform;
        self.apply(t);
    }

    /// Move the view content by `screen_delta` pixels.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.apply(Affine::translate(screen_delta) * self.transform);
    }

    /// Return to identity, subject to the limits.
    pub fn reset(&mut self) {
        self.apply(Affine::IDENTITY);
    }

    /// Confine the view to a world rectangle, or lift the confinement.
    pub fn set_limits(&mut self, limits: Option<Rect>) -> Result<(), ViewError> {
        if let Some(rect) = limits {
            check_rect(rect)?;
        }
        self.limits = limits;
        self.apply(self.transform);
        Ok(())
    }

    /// Change the screen rectangle, for example after a window resize.
    pub fn set_viewport(&mut self, viewport: Rect) -> Result<(), ViewError> {
        if !viewport.is_valid() {
            return Err(ViewError::InvalidRect(viewport));
        }
        if viewport != self.viewport {
            self.viewport = viewport;
            self.mark_changed();
        }
        self.apply(self.transform);
        Ok(())
    }

    /// Show all of `world`, as large as possible and centered in the viewport.
    pub fn fit(&mut self, world: Rect) -> Result<(), ViewError> {
        check_rect(world)?;
        let v = self.viewport;
        let scale = (v.width() / world.width()).min(v.height() / world.height());
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ViewError::InvalidRect(world));
        }
        let t = Affine::translate(v.center().to_vec2())
            * Affine::scale(scale)
            * Affine::translate(-world.center().to_vec2());
        self.apply(t);
        Ok(())
    }

    /// Map a screen point to world space.
    pub fn screen_to_world(&self, point: Point) -> Result<Point, ViewError> {
        Ok(try_inverse(self.transform)? * point)
    }

    /// Map a world point to screen space.
    pub fn world_to_screen(&self, point: Point) -> Point {
        self.transform * point
    }

    /// World-space bounding box of the viewport.
    pub fn visible_world_rect(&self) -> Result<Rect, ViewError> {
        let inverse = try_inverse(self.transform)?;
        Ok(self.viewport.transform_bbox(inverse))
    }

    /// Whether anything changed since the last call; clears the flag.
    pub fn take_invalidation(&mut self) -> bool {
        core::mem::take(&mut self.invalidated)
    }

    /// Number of effective changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn apply(&mut self, transform: Affine) {
        let transform = self.constrain(transform);
        if transform != self.transform {
            log::trace!("view transform {:?} -> {:?}", self.transform, transform);
            self.transform = transform;
            self.mark_changed();
        }
    }

    fn mark_changed(&mut self) {
        self.invalidated = true;
        self.revision += 1;
    }

    /// Adjust `t` so the limits cover the viewport.
    fn constrain(&self, mut t: Affine) -> Affine {
        let Some(limits) = self.limits else {
            return t;
        };
        let v = self.viewport;
        let screen = limits.transform_bbox(t);
        let grow = (v.width() / screen.width()).max(v.height() / screen.height());
        if grow > 1.0 && grow.is_finite() {
            let c = v.center().to_vec2();
            t = Affine::translate(c) * Affine::scale(grow) * Affine::translate(-c) * t;
        }

        let screen = limits.transform_bbox(t);
        let shift = |lo: f64, hi: f64, v_lo: f64, v_hi: f64| {
            if lo > v_lo {
                v_lo - lo
            } else if hi < v_hi {
                v_hi - hi
            } else {
                0.0
            }
        };
        let dx = shift(screen.x0, screen.x1, v.x0, v.x1);
        let dy = shift(screen.y0, screen.y1, v.y0, v.y1);
        if dx != 0.0 || dy != 0.0 {
            t = Affine::translate((dx, dy)) * t;
        }
        t
    }
}

fn check_rect(rect: Rect) -> Result<(), ViewError> {
    if rect.is_valid() && rect.area() > 0.0 {
        Ok(())
    } else {
        Err(ViewError::InvalidRect(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn near(a: Point, b: Point) -> bool {
        (a - b).hypot() < EPS
    }

    fn view() -> PanZoom {
        let mut v = PanZoom::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(v.take_invalidation());
        v
    }

    #[test]
    fn zoom_keeps_the_anchor_fixed() {
        let mut v = view();
        let anchor = Point::new(30.0, 70.0);
        let before = v.screen_to_world(anchor).unwrap();
        v.zoom(anchor, 4.0);
        assert!((v.scale() - 2.0).abs() < EPS);
        assert!(near(v.screen_to_world(anchor).unwrap(), before));
        assert!(v.take_invalidation());
        assert!(!v.take_invalidation());

        v.zoom(anchor, -4.0);
        assert!((v.scale() - 1.0).abs() < EPS);
        assert!(near(v.world_to_screen(Point::ORIGIN), Point::ORIGIN));
    }

    #[test]
    fn zoom_stops_at_max_scale() {
        let mut v = PanZoom::with_config(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            PanZoomConfig {
                zoom_step: 1.0,
                max_scale: 8.0,
                ..PanZoomConfig::default()
            },
        );
        v.zoom(Point::ORIGIN, 10.0);
        assert!((v.scale() - 8.0).abs() < EPS);
    }

    #[test]
    fn zooming_out_stops_at_min_scale() {
        let mut v = PanZoom::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let center = Point::new(400.0, 300.0);
        for _ in 0..2400 {
            v.zoom(center, -1.0);
        }
        let min = PanZoomConfig::default().min_scale;
        assert!((v.scale() / min - 1.0).abs() < 1e-6, "scale {}", v.scale());
        assert!(v.screen_to_world(center).is_ok());
        assert!(v.visible_world_rect().is_ok());

        // The view can still zoom back in.
        v.zoom(center, 4.0);
        assert!(v.scale() > 2.0 * min);
    }

    #[test]
    fn pan_moves_content() {
        let mut v = view();
        v.pan(Vec2::new(10.0, -5.0));
        assert_eq!(v.world_to_screen(Point::ORIGIN), Point::new(10.0, -5.0));
        assert_eq!(v.visible_world_rect().unwrap(), Rect::new(-10.0, 5.0, 90.0, 105.0));
        assert_eq!(v.revision(), 1);
    }

    #[test]
    fn limits_block_zooming_out_and_panning_away() {
        let mut v = view();
        v.set_limits(Some(Rect::new(0.0, 0.0, 100.0, 100.0))).unwrap();
        assert!(!v.take_invalidation(), "identity already satisfies the limits");

        v.zoom(Point::new(50.0, 50.0), -4.0);
        v.pan(Vec2::new(10.0, 0.0));
        assert_eq!(v.transform(), Affine::IDENTITY);
        assert!(!v.take_invalidation());
        assert_eq!(v.revision(), 0);

        // Zoomed in, panning stops at the limit edges.
        v.zoom(Point::new(50.0, 50.0), 4.0);
        v.pan(Vec2::new(1000.0, 1000.0));
        assert!(near(v.world_to_screen(Point::ORIGIN), Point::ORIGIN));
        v.pan(Vec2::new(-1000.0, 0.0));
        assert!(near(v.world_to_screen(Point::new(100.0, 0.0)), Point::new(100.0, 0.0)));
    }

    #[test]
    fn setting_limits_pulls_the_view_back() {
        let mut v = view();
        v.pan(Vec2::new(-500.0, 0.0));
        v.set_limits(Some(Rect::new(0.0, 0.0, 200.0, 50.0))).unwrap();
        // The 50-unit-tall limits are scaled up to cover the 100 px viewport.
        assert!((v.scale() - 2.0).abs() < EPS);
        let visible = v.visible_world_rect().unwrap();
        assert!(visible.x0 >= -EPS && visible.x1 <= 200.0 + EPS);
        assert!(visible.y0 >= -EPS && visible.y1 <= 50.0 + EPS);

        assert!(matches!(
            v.set_limits(Some(Rect::new(0.0, 0.0, 0.0, 10.0))),
            Err(ViewError::InvalidRect(_))
        ));
        v.set_limits(None).unwrap();
        assert_eq!(v.limits(), None);
    }

    #[test]
    fn fit_centers_the_world() {
        let mut v = view();
        v.fit(Rect::new(0.0, 0.0, 200.0, 100.0)).unwrap();
        assert!((v.scale() - 0.5).abs() < EPS);
        assert!(near(v.world_to_screen(Point::ORIGIN), Point::new(0.0, 25.0)));
        assert!(near(v.world_to_screen(Point::new(200.0, 100.0)), Point::new(100.0, 75.0)));
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut v = view();
        v.zoom(Point::new(10.0, 10.0), 3.0);
        v.pan(Vec2::new(4.0, 4.0));
        v.reset();
        assert_eq!(v.transform(), Affine::IDENTITY);
        assert_eq!(v.revision(), 3);
    }

    #[test]
    fn singular_transforms_are_rejected() {
        let mut v = view();
        assert!(matches!(
            v.set_transform(Affine::scale(0.0)),
            Err(ViewError::NonInvertible(_))
        ));
        assert_eq!(v.transform(), Affine::IDENTITY);
        assert!(!v.take_invalidation());

        v.set_transform(Affine::scale(3.0)).unwrap();
        assert!(near(v.screen_to_world(Point::new(3.0, 6.0)).unwrap(), Point::new(1.0, 2.0)));
    }

    #[test]
    fn viewport_changes_invalidate() {
        let mut v = view();
        v.set_viewport(Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert!(!v.take_invalidation());
        v.set_viewport(Rect::new(0.0, 0.0, 640.0, 480.0)).unwrap();
        assert!(v.take_invalidation());
        assert_eq!(v.visible_world_rect().unwrap(), Rect::new(0.0, 0.0, 640.0, 480.0));
        assert!(v.set_viewport(Rect::new(0.0, 0.0, f64::NAN, 1.0)).is_err());
    }
}
