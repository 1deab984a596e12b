// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// An opaque 8-bit-per-channel color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a `0xRRGGBB` value. The top byte is ignored.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Each channel is masked to 8 bits first."
    )]
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;

    #[test]
    fn hex_round_trip() {
        assert_eq!(Rgb::from_hex(0x12_34_56), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Rgb::from_hex(0xff_00_00_ff), Rgb::new(0, 0, 0xff));
        assert_eq!(Rgb::from_hex(0xff_ff_ff), Rgb::WHITE);
    }
}
