// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive cushion rasterization of a [`Layout`].

use alloc::vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect};
use treemap_geometry::{RectExt, pixel_centers, try_inverse};
use treemap_layout::{Layout, LayoutId, LayoutNode, Rgb};

use crate::{CushionParams, PixelBuffer, RenderError, Surface};

/// Counters gathered during one render call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Nodes whose ridge was accumulated.
    pub nodes_visited: usize,
    /// Subtrees skipped because they fall outside the clip.
    pub culled: usize,
    /// Leaves rasterized.
    pub leaves: usize,
    /// Internal nodes rasterized as one cushion because they were too small.
    pub flattened: usize,
    /// Pixels written.
    pub pixels: usize,
}

/// Renders layouts with van Wijk and van de Wetering's cushion shading.
#[derive(Clone, Copy, Debug, Default)]
pub struct CushionRenderer {
    params: CushionParams,
}

impl CushionRenderer {
    /// Create a renderer.
    pub fn new(params: CushionParams) -> Self {
        Self { params }
    }

    /// Parameters in use.
    pub fn params(&self) -> &CushionParams {
        &self.params
    }

    /// Render the whole buffer. See [`CushionRenderer::render_clipped`].
    pub fn render(
        &self,
        layout: &Layout,
        world_to_buffer: Affine,
        buffer: &mut PixelBuffer,
    ) -> Result<RenderStats, RenderError> {
        let clip = Rect::new(0.0, 0.0, f64::from(buffer.width()), f64::from(buffer.height()));
        self.render_clipped(layout, world_to_buffer, clip, buffer)
    }

    /// Render the pixels whose centers fall inside `clip` (buffer coordinates).
    ///
    /// Pixels not covered by any layout leaf keep their previous content.
    pub fn render_clipped(
        &self,
        layout: &Layout,
        world_to_buffer: Affine,
        clip: Rect,
        buffer: &mut PixelBuffer,
    ) -> Result<RenderStats, RenderError> {
        let buffer_to_world = try_inverse(world_to_buffer)?;
        let full = Rect::new(0.0, 0.0, f64::from(buffer.width()), f64::from(buffer.height()));
        let clip = clip.intersect(full);
        let mut stats = RenderStats::default();
        if !clip.is_valid() || clip.area() <= 0.0 {
            return Ok(stats);
        }

        let area_scale = world_to_buffer.determinant().abs();
        let mut stack = vec![(layout.root(), Surface::default(), self.params.height)];
        while let Some((id, surface, h)) = stack.pop() {
            let Some(node) = layout.node(id) else {
                continue;
            };
            let screen = node.rect.transform_bbox(world_to_buffer);
            if !screen.intersects(&clip) {
                stats.culled += 1;
                continue;
            }
            stats.nodes_visited += 1;
            let surface = surface.with_ridge(node.rect, h);

            if node.is_leaf() {
                stats.leaves += 1;
            } else if node.rect.area() * area_scale <= self.params.min_cushion_size {
                stats.flattened += 1;
            } else {
                let child_h = h * self.params.falloff;
                stack.extend(
                    node.children()
                        .iter()
                        .rev()
                        .map(|&c: &LayoutId| (c, surface, child_h)),
                );
                continue;
            }
            stats.pixels +=
                self.rasterize(node, &surface, screen.intersect(clip), buffer_to_world, buffer);
        }

        log::debug!(
            "cushion render: {} visited, {} culled, {} leaves, {} flattened, {} px",
            stats.nodes_visited,
            stats.culled,
            stats.leaves,
            stats.flattened,
            stats.pixels
        );
        Ok(stats)
    }

    /// Render the part of the layout visible in `target` (screen coordinates)
    /// into a new buffer whose pixel `(0, 0)` is the top-left of `target`.
    ///
    /// The buffer is `target.width()` by `target.height()` pixels, rounded.
    pub fn render_rect(
        &self,
        layout: &Layout,
        target: Rect,
        world_to_screen: Affine,
    ) -> Result<PixelBuffer, RenderError> {
        if !target.is_valid() {
            return Err(RenderError::InvalidTarget(target));
        }
        let (w, h) = (target.width().round(), target.height().round());
        if w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(RenderError::InvalidTarget(target));
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Both sides are rounded, non-negative, and checked against u32::MAX."
        )]
        let mut buffer = PixelBuffer::try_new(w as u32, h as u32)
            .map_err(|_| RenderError::InvalidTarget(target))?;
        let world_to_buffer = Affine::translate(-target.origin().to_vec2()) * world_to_screen;
        self.render(layout, world_to_buffer, &mut buffer)?;
        Ok(buffer)
    }

    /// Shade every pixel whose center is in `screen` and maps into `node.rect`.
    fn rasterize(
        &self,
        node: &LayoutNode,
        surface: &Surface,
        screen: Rect,
        buffer_to_world: Affine,
        buffer: &mut PixelBuffer,
    ) -> usize {
        let (xs, ys) = pixel_centers(screen, buffer.width(), buffer.height());
        let mut written = 0;
        for y in ys {
            for x in xs.clone() {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let world = buffer_to_world * center;
                if !node.rect.contains_half_open(world) {
                    continue;
                }
                let cos = surface.cos_to_light(world, self.params.light);
                let intensity = self.params.ambient + (self.params.diffuse * cos).max(0.0);
                buffer.set_pixel(x, y, shade(node.color, intensity));
                written += 1;
            }
        }
        written
    }
}

/// Scale `color` by `intensity / 255`, saturating each channel.
fn shade(color: Rgb, intensity: f64) -> Rgb {
    let channel = |c: u8| {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Clamped to [0, 255] before the cast."
        )]
        let v = (intensity * f64::from(c) / 255.0).clamp(0.0, 255.0) as u8;
        v
    };
    Rgb::new(channel(color.r), channel(color.g), channel(color.b))
}
