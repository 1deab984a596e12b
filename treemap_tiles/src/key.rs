// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tile pyramid: keys, levels, and covers.

use kurbo::{Affine, Point, Rect};
use treemap_geometry::{RectExt, try_inverse, uniform_scale};

use crate::TileError;

/// Address of one square tile in world space.
///
/// A tile at `level` has edge length `2^level` world units and covers
/// `[x·edge, (x+1)·edge) × [y·edge, (y+1)·edge)`. Levels grow as the view
/// zooms out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// Pyramid level; the tile edge is `2^level` world units.
    pub level: i32,
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl TileKey {
    /// Create a key.
    pub const fn new(level: i32, x: i64, y: i64) -> Self {
        Self { level, x, y }
    }

    /// Edge length in world units.
    pub fn edge(self) -> f64 {
        2.0_f64.powi(self.level)
    }

    /// World-space area covered by this tile.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Tile indices far beyond 2^53 are not addressable in f64 world space anyway."
    )]
    pub fn world_rect(self) -> Rect {
        let edge = self.edge();
        let origin = Point::new(self.x as f64 * edge, self.y as f64 * edge);
        Rect::from_origin_size(origin, (edge, edge))
    }

    /// The tile one level up that contains this one.
    pub fn parent(self) -> Self {
        self.ancestor(1)
    }

    /// The tile `levels` levels up that contains this one.
    pub fn ancestor(self, levels: u32) -> Self {
        let shift = levels.min(63);
        Self {
            level: self.level.saturating_add_unsigned(levels),
            x: self.x >> shift,
            y: self.y >> shift,
        }
    }
}

/// Pyramid level whose tiles, drawn `tile_px` pixels wide, are never
/// magnified by more than a factor of two.
///
/// Returns `ceil(log2(tile_px · world_per_screen))`.
pub fn level_for_scale(tile_px: u32, world_per_screen: f64) -> i32 {
    let level = (f64::from(tile_px) * world_per_screen).log2().ceil();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Float-to-int casts saturate; extreme zoom levels clamp to the i32 range."
    )]
    let level = level as i32;
    level
}

/// The tiles needed to paint a screen rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileCover {
    /// Level of every key.
    pub level: i32,
    /// Keys in row-major order.
    pub keys: Vec<TileKey>,
}

/// Compute the minimal set of tiles covering `clip` (screen space).
///
/// The level comes from [`level_for_scale`] at the transform's uniform scale;
/// the keys span the world-space bounding box of `clip`.
pub fn cover(world_to_screen: Affine, clip: Rect, tile_px: u32) -> Result<TileCover, TileError> {
    if tile_px == 0 {
        return Err(TileError::ZeroTileSize);
    }
    if !clip.is_valid() {
        return Err(TileError::InvalidClip(clip));
    }
    let screen_to_world = try_inverse(world_to_screen)?;
    let level = level_for_scale(tile_px, 1.0 / uniform_scale(world_to_screen));
    let edge = 2.0_f64.powi(level);
    let world = clip.transform_bbox(screen_to_world);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Saturating casts; an on-screen clip only spans a handful of tiles."
    )]
    let range = |t0: f64, t1: f64| ((t0 / edge).floor() as i64, (t1 / edge).ceil() as i64);
    let (x0, x1) = range(world.x0, world.x1);
    let (y0, y1) = range(world.y0, world.y1);

    let mut keys = Vec::new();
    if clip.area() > 0.0 {
        for y in y0..y1 {
            for x in x0..x1 {
                keys.push(TileKey::new(level, x, y));
            }
        }
    }
    log::trace!("cover level {level}: {} tiles for {clip:?}", keys.len());
    Ok(TileCover { level, keys })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    #[test]
    fn world_rects_tile_the_plane() {
        let k = TileKey::new(3, -2, 5);
        assert_eq!(k.world_rect(), Rect::new(-16.0, 40.0, -8.0, 48.0));
        let fine = TileKey::new(-1, 3, 0);
        assert_eq!(fine.world_rect(), Rect::new(1.5, 0.0, 2.0, 0.5));
    }

    #[test]
    fn parents_contain_children() {
        for key in [TileKey::new(0, 5, -3), TileKey::new(-4, -1, -1), TileKey::new(2, 0, 7)] {
            let parent = key.parent();
            assert_eq!(parent.level, key.level + 1);
            assert!(parent.world_rect().includes(&key.world_rect()), "{key:?}");
            assert_eq!(key.ancestor(2), parent.parent());
        }
        assert_eq!(TileKey::new(0, -1, -1).parent(), TileKey::new(1, -1, -1));
    }

    #[test]
    fn level_tracks_zoom() {
        assert_eq!(level_for_scale(256, 1.0), 8);
        assert_eq!(level_for_scale(256, 0.5), 7);
        assert_eq!(level_for_scale(256, 0.6), 8);
        assert_eq!(level_for_scale(256, 1.0 / 1024.0), -2);
    }

    #[test]
    fn cover_spans_the_clip() {
        let view = Affine::translate(Vec2::new(-100.0, -50.0));
        let clip = Rect::new(0.0, 0.0, 300.0, 200.0);
        let c = cover(view, clip, 256).unwrap();
        assert_eq!(c.level, 8);
        // World (100, 50)..(400, 250) touches columns 0..2 and row 0.
        let expected: Vec<TileKey> = (0..2).map(|x| TileKey::new(8, x, 0)).collect();
        assert_eq!(c.keys, expected);
    }

    #[test]
    fn every_pixel_center_is_covered() {
        let view = Affine::translate(Vec2::new(37.0, -12.5)) * Affine::scale(3.7);
        let clip = Rect::new(0.0, 0.0, 640.0, 480.0);
        let c = cover(view, clip, 64).unwrap();
        let inv = try_inverse(view).unwrap();
        for y in (0..480).step_by(7) {
            for x in (0..640).step_by(7) {
                let world = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                assert!(
                    c.keys.iter().any(|k| k.world_rect().contains_half_open(world)),
                    "pixel ({x}, {y}) uncovered"
                );
            }
        }
        // Tiles are at least as large on screen as their bitmaps.
        let edge_px = c.keys[0].edge() * 3.7;
        assert!((64.0..128.0).contains(&edge_px));
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(cover(Affine::IDENTITY, clip, 0), Err(TileError::ZeroTileSize)));
        assert!(matches!(
            cover(Affine::scale(0.0), clip, 16),
            Err(TileError::NonInvertible(_))
        ));
        assert!(matches!(
            cover(Affine::IDENTITY, Rect::new(5.0, 0.0, 1.0, 1.0), 16),
            Err(TileError::InvalidClip(_))
        ));
    }
}
