// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform inversion and scale extraction.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Affine;

/// Error returned when a transform has no usable inverse.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("transform is not invertible (determinant {determinant})")]
pub struct InvertError {
    /// Determinant of the rejected transform.
    pub determinant: f64,
}

/// Invert `affine`, rejecting singular and non-finite transforms.
///
/// ```rust
/// use kurbo::{Affine, Point};
/// use treemap_geometry::try_inverse;
///
/// let t = Affine::scale(2.0);
/// let inv = try_inverse(t).unwrap();
/// assert_eq!(inv * Point::new(4.0, 6.0), Point::new(2.0, 3.0));
///
/// assert!(try_inverse(Affine::scale(0.0)).is_err());
/// ```
pub fn try_inverse(affine: Affine) -> Result<Affine, InvertError> {
    let determinant = affine.determinant();
    if !affine.is_finite() || !determinant.is_finite() || determinant == 0.0 {
        return Err(InvertError { determinant });
    }
    let inverse = affine.inverse();
    if !inverse.is_finite() {
        return Err(InvertError { determinant });
    }
    Ok(inverse)
}

/// Geometric-mean scale factor of `affine`: `sqrt(|det|)`.
///
/// For a uniform scale `s` (with any translation) this is exactly `|s|`.
#[inline]
pub fn uniform_scale(affine: Affine) -> f64 {
    affine.determinant().abs().sqrt()
}
