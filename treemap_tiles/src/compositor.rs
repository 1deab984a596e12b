// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assembling a screen image from cached tiles.

use std::sync::Arc;

use kurbo::{Affine, Point, Rect};
use treemap_cushion::PixelBuffer;
use treemap_geometry::{RectExt, pixel_centers, try_inverse};
use treemap_layout::Rgb;

use crate::{TileCache, TileError, TileKey, TileStatus, cover};

/// How many tiles of each kind a [`Compositor::composite`] call drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Tiles drawn from their own bitmap.
    pub exact: usize,
    /// Tiles drawn from a coarser cached ancestor.
    pub fallback: usize,
    /// Tiles with nothing cached, drawn in the placeholder color.
    pub placeholder: usize,
}

impl CompositeStats {
    /// Whether every tile was drawn at full resolution.
    pub fn is_complete(&self) -> bool {
        self.fallback == 0 && self.placeholder == 0
    }
}

/// Draws the tiles covering a view into a screen buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compositor {
    /// Color for tiles with no usable bitmap.
    pub placeholder: Rgb,
    /// How many levels up to search for a stand-in bitmap.
    pub max_fallback_levels: u32,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            placeholder: Rgb::new(0x20, 0x20, 0x20),
            max_fallback_levels: 4,
        }
    }
}

impl Compositor {
    /// Paint the part of `buffer` inside `clip` (screen space) from `cache`.
    ///
    /// Missing tiles are requested from the cache. Until they arrive, the
    /// nearest cached ancestor is scaled up in their place, or the placeholder
    /// color is used. Sampling is nearest-neighbour at pixel centers.
    pub fn composite(
        &self,
        cache: &TileCache,
        world_to_screen: Affine,
        clip: Rect,
        buffer: &mut PixelBuffer,
    ) -> Result<CompositeStats, TileError> {
        let full = Rect::new(0.0, 0.0, f64::from(buffer.width()), f64::from(buffer.height()));
        if !clip.is_valid() {
            return Err(TileError::InvalidClip(clip));
        }
        let clip = clip.intersect(full);
        if !clip.is_valid() || clip.area() <= 0.0 {
            return Ok(CompositeStats::default());
        }
        let tile_px = cache.config().tile_px;
        let cover = cover(world_to_screen, clip, tile_px)?;
        let screen_to_world = try_inverse(world_to_screen)?;

        let mut stats = CompositeStats::default();
        for &key in &cover.keys {
            let bitmap = match cache.lookup(key) {
                TileStatus::Ready(bitmap) => {
                    stats.exact += 1;
                    Some((key, bitmap))
                }
                TileStatus::Pending | TileStatus::Failed => {
                    let found = self.cached_ancestor(cache, key);
                    if found.is_some() {
                        stats.fallback += 1;
                    } else {
                        stats.placeholder += 1;
                    }
                    found
                }
            };
            let screen = key.world_rect().transform_bbox(world_to_screen).intersect(clip);
            self.draw_tile(
                key,
                bitmap.as_ref().map(|(k, b)| (*k, &**b)),
                screen,
                screen_to_world,
                tile_px,
                buffer,
            );
        }
        log::trace!(
            "composited level {}: {} exact, {} fallback, {} placeholder",
            cover.level,
            stats.exact,
            stats.fallback,
            stats.placeholder
        );
        Ok(stats)
    }

    fn cached_ancestor(
        &self,
        cache: &TileCache,
        key: TileKey,
    ) -> Option<(TileKey, Arc<PixelBuffer>)> {
        (1..=self.max_fallback_levels).find_map(|levels| {
            let ancestor = key.ancestor(levels);
            match cache.peek(ancestor) {
                Some(TileStatus::Ready(bitmap)) => Some((ancestor, bitmap)),
                _ => None,
            }
        })
    }

    /// Fill the pixels of `key`'s area inside `screen`. The bitmap, when
    /// present, belongs to `key` or one of its ancestors.
    fn draw_tile(
        &self,
        key: TileKey,
        bitmap: Option<(TileKey, &PixelBuffer)>,
        screen: Rect,
        screen_to_world: Affine,
        tile_px: u32,
        buffer: &mut PixelBuffer,
    ) {
        let area = key.world_rect();
        let (xs, ys) = pixel_centers(screen, buffer.width(), buffer.height());
        for y in ys {
            for x in xs.clone() {
                let world = screen_to_world * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if !area.contains_half_open(world) {
                    continue;
                }
                let color = bitmap
                    .and_then(|(source, bmp)| sample(source, bmp, tile_px, world))
                    .unwrap_or(self.placeholder);
                buffer.set_pixel(x, y, color);
            }
        }
    }
}

/// Nearest-neighbour lookup of world point `p` in the bitmap of `key`.
fn sample(key: TileKey, bitmap: &PixelBuffer, tile_px: u32, p: Point) -> Option<Rgb> {
    let rect = key.world_rect();
    let scale = f64::from(tile_px) / rect.width();
    let max = f64::from(tile_px - 1);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Clamped to the bitmap before the cast."
    )]
    let to_px = |t: f64| (t * scale).floor().clamp(0.0, max) as u32;
    bitmap.pixel(to_px(p.x - rect.x0), to_px(p.y - rect.y0))
}
