// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed RGB pixel storage.

use alloc::{vec, vec::Vec};
use treemap_layout::Rgb;

use crate::RenderError;

/// A row-major RGB24 image.
///
/// Pixel `(x, y)` covers the square `[x, x + 1) × [y, y + 1)` in buffer
/// coordinates, so its center is at `(x + 0.5, y + 0.5)`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// A black buffer of the given size.
    ///
    /// # Panics
    ///
    /// If the byte size overflows `usize` or cannot be allocated. Use
    /// [`PixelBuffer::try_new`] for sizes that come from user input.
    pub fn new(width: u32, height: u32) -> Self {
        let Some(len) = byte_len(width, height) else {
            panic!("a {width}x{height} pixel buffer overflows usize");
        };
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// A black buffer of the given size, or [`RenderError::TooLarge`] when
    /// its bytes overflow `usize` or the allocation fails.
    pub fn try_new(width: u32, height: u32) -> Result<Self, RenderError> {
        let too_large = RenderError::TooLarge { width, height };
        let len = byte_len(width, height).ok_or(too_large)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large)?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing RGB bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        let expected = byte_len(width, height).ok_or(RenderError::TooLarge { width, height })?;
        if data.len() != expected {
            return Err(RenderError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(3) {
            px.copy_from_slice(&[color.r, color.g, color.b]);
        }
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let i = self.offset(x, y)?;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Write `color` at `(x, y)`. Writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 3].copy_from_slice(&[color.r, color.g, color.b]);
        }
    }

    /// Raw bytes, row-major, three per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning its raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 3)
    }
}

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(3)
}
