// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-level squarified partitioning.

use alloc::{vec, vec::Vec};
use kurbo::Rect;
use treemap_geometry::aspect_ratio;

/// Partition `bounds` among `sizes` using the squarified treemap algorithm.
///
/// Returns one rectangle per size, in input order. The rectangles tile
/// `bounds` exactly and each one's area is proportional to its size.
///
/// Sizes are expected to be finite and non-negative; anything else is treated
/// as zero. Zero sizes (and every size when the total is zero) receive
/// zero-area rectangles on the leading edge of the space left over.
///
/// ```rust
/// use kurbo::Rect;
/// use treemap_layout::squarify;
///
/// let rects = squarify(&[1.0, 3.0], Rect::new(0.0, 0.0, 100.0, 50.0));
/// // The larger item is placed first, as a column on the left.
/// assert_eq!(rects[1], Rect::new(0.0, 0.0, 75.0, 50.0));
/// assert_eq!(rects[0], Rect::new(75.0, 0.0, 100.0, 50.0));
/// ```
pub fn squarify(sizes: &[f64], bounds: Rect) -> Vec<Rect> {
    let mut out = vec![Rect::ZERO; sizes.len()];
    Squarifier::default().run(sizes, bounds, &mut out);
    out
}

/// Reusable scratch space for [`squarify`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Squarifier {
    /// Indices into the size slice, largest first.
    order: Vec<usize>,
    /// `suffix[k]` is the total weight of `order[k..]`.
    suffix: Vec<f64>,
    /// Row lengths of the last run, in placement order.
    rows: Vec<usize>,
}

impl Squarifier {
    /// Write the rectangle for `sizes[i]` to `out[i]`.
    pub(crate) fn run(&mut self, sizes: &[f64], bounds: Rect, out: &mut [Rect]) {
        debug_assert_eq!(sizes.len(), out.len(), "one output slot per size");
        let n = sizes.len();
        let weight = |i: usize| sizes[i].max(0.0);

        self.order.clear();
        self.order.extend(0..n);
        // Stable, so equal sizes keep insertion order.
        self.order.sort_by(|&a, &b| weight(b).total_cmp(&weight(a)));

        self.suffix.clear();
        self.suffix.resize(n + 1, 0.0);
        for k in (0..n).rev() {
            self.suffix[k] = self.suffix[k + 1] + weight(self.order[k]);
        }

        self.rows.clear();
        let mut remaining = bounds;
        let mut offset = 0;
        while offset < n {
            let rest = &self.order[offset..];
            let remaining_sum = self.suffix[offset];
            let column = remaining.width() >= remaining.height();

            if remaining_sum <= 0.0 {
                let edge = if column {
                    Rect::new(remaining.x0, remaining.y0, remaining.x0, remaining.y1)
                } else {
                    Rect::new(remaining.x0, remaining.y0, remaining.x1, remaining.y0)
                };
                for &i in rest {
                    out[i] = edge;
                }
                self.rows.push(rest.len());
                break;
            }

            let (long, short) = if column {
                (remaining.width(), remaining.height())
            } else {
                (remaining.height(), remaining.width())
            };
            let count = row_length(&weight, rest, remaining_sum, long, short);
            let row = &rest[..count];
            let row_sum: f64 = row.iter().map(|&i| weight(i)).sum();
            let last = offset + count == n;
            remaining = place_row(
                &weight,
                row,
                row_sum,
                remaining_sum,
                remaining,
                column,
                last,
                out,
            );
            self.rows.push(count);
            offset += count;
        }
    }

    /// Row lengths chosen by the last [`Squarifier::run`].
    #[cfg(test)]
    pub(crate) fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// Number of leading items of `rest` that form the next row.
///
/// Grows the row one item at a time and stops before the first item that makes
/// the worst aspect ratio larger than it was without it.
fn row_length(
    weight: &impl Fn(usize) -> f64,
    rest: &[usize],
    remaining_sum: f64,
    long: f64,
    short: f64,
) -> usize {
    let largest = weight(rest[0]);
    let mut best = f64::INFINITY;
    let mut row_sum = 0.0;
    for (k, &i) in rest.iter().enumerate() {
        let candidate = row_sum + weight(i);
        let worst = worst_aspect(largest, weight(i), candidate, remaining_sum, long, short);
        if k > 0 && worst > best {
            return k;
        }
        best = worst;
        row_sum = candidate;
    }
    rest.len()
}

/// Worst aspect ratio of a row whose members range from `largest` to `smallest`.
///
/// The aspect ratio of a member is quasi-convex in its length, so over a sorted
/// row the maximum is attained at one of the two ends.
pub(crate) fn worst_aspect(
    largest: f64,
    smallest: f64,
    row_sum: f64,
    remaining_sum: f64,
    long: f64,
    short: f64,
) -> f64 {
    let thickness = long * (row_sum / remaining_sum);
    let length = |size: f64| {
        if row_sum > 0.0 {
            short * (size / row_sum)
        } else {
            0.0
        }
    };
    aspect_ratio(thickness, length(largest)).max(aspect_ratio(thickness, length(smallest)))
}

/// Assign rectangles to `row` and return what is left of `r`.
fn place_row(
    weight: &impl Fn(usize) -> f64,
    row: &[usize],
    row_sum: f64,
    remaining_sum: f64,
    r: Rect,
    column: bool,
    last: bool,
    out: &mut [Rect],
) -> Rect {
    let extent = if column { r.width() } else { r.height() };
    let thickness = extent * (row_sum / remaining_sum);
    // The final row absorbs rounding so the partition closes exactly.
    let edge = match (column, last) {
        (true, true) => r.x1,
        (true, false) => (r.x0 + thickness).min(r.x1),
        (false, true) => r.y1,
        (false, false) => (r.y0 + thickness).min(r.y1),
    };
    let (a, b) = if column { (r.y0, r.y1) } else { (r.x0, r.x1) };

    let mut cumulative = 0.0;
    let mut start = a;
    for (k, &i) in row.iter().enumerate() {
        cumulative += weight(i);
        let end = if k + 1 == row.len() {
            b
        } else {
            a + (b - a) * (cumulative / row_sum)
        };
        out[i] = if column {
            Rect::new(r.x0, start, edge, end)
        } else {
            Rect::new(start, r.y0, end, edge)
        };
        start = end;
    }

    if column {
        Rect::new(edge, r.y0, r.x1, r.y1)
    } else {
        Rect::new(r.x0, edge, r.x1, r.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemap_geometry::RectExt;

    const EPS: f64 = 1e-9;

    fn assert_rect_eq(actual: Rect, expected: Rect) {
        let close = (actual.x0 - expected.x0).abs() < EPS
            && (actual.y0 - expected.y0).abs() < EPS
            && (actual.x1 - expected.x1).abs() < EPS
            && (actual.y1 - expected.y1).abs() < EPS;
        assert!(close, "expected {expected:?}, got {actual:?}");
    }

    fn run(sizes: &[f64], bounds: Rect) -> (Vec<Rect>, Vec<usize>) {
        let mut s = Squarifier::default();
        let mut out = vec![Rect::ZERO; sizes.len()];
        s.run(sizes, bounds, &mut out);
        (out, s.rows().to_vec())
    }

    #[test]
    fn two_children_in_wide_bounds() {
        let (rects, rows) = run(&[3.0, 1.0], Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 75.0, 50.0));
        assert_eq!(rects[1], Rect::new(75.0, 0.0, 100.0, 50.0));
        assert_eq!(rows, vec![1, 1]);
    }

    #[test]
    fn one_large_many_small_square() {
        let sizes = [10.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let (rects, rows) = run(&sizes, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(rows, vec![1, 2, 2, 2, 2, 1]);

        let x_big = 100.0 * 10.0 / 19.0;
        assert_rect_eq(rects[0], Rect::new(0.0, 0.0, x_big, 100.0));
        let y_row = 100.0 * 2.0 / 9.0;
        assert_rect_eq(rects[1], Rect::new(x_big, 0.0, 76.315_789_473_684_2, y_row));
        assert_rect_eq(rects[2], Rect::new(76.315_789_473_684_2, 0.0, 100.0, y_row));
        // The last three share the bottom strip: a stacked pair, then a single column.
        assert_rect_eq(
            rects[9],
            Rect::new(84.210_526_315_789_48, 66.666_666_666_666_66, 100.0, 100.0),
        );
    }

    #[test]
    fn one_large_many_small_wide() {
        let sizes = [10.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let (rects, rows) = run(&sizes, Rect::new(0.0, 0.0, 190.0, 100.0));
        assert_eq!(rows, vec![1, 3, 2, 2, 1, 1]);
        // The large item becomes a perfect square.
        assert_rect_eq(rects[0], Rect::new(0.0, 0.0, 100.0, 100.0));
        for r in &rects[1..] {
            assert!((r.area() - 1000.0).abs() < 1e-6, "unit item area {}", r.area());
        }
    }

    #[test]
    fn committed_rows_never_get_worse() {
        let sizes = [10.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (rects, rows) = run(&sizes, bounds);

        // Replay the row decisions: each committed row is no worse than the row
        // with one fewer element, and adding the next element would be worse.
        let mut remaining = bounds;
        let mut offset = 0;
        for &count in &rows {
            let rest = &sizes[offset..];
            let total: f64 = rest.iter().sum();
            let column = remaining.width() >= remaining.height();
            let (long, short) = if column {
                (remaining.width(), remaining.height())
            } else {
                (remaining.height(), remaining.width())
            };
            let worst_of = |k: usize| {
                let sum: f64 = rest[..k].iter().sum();
                worst_aspect(rest[0], rest[k - 1], sum, total, long, short)
            };
            if count > 1 {
                assert!(worst_of(count) <= worst_of(count - 1));
            }
            if count < rest.len() {
                assert!(worst_of(count + 1) > worst_of(count));
            }
            let row_bbox = rects[offset..offset + count]
                .iter()
                .fold(rects[offset], |acc, r| acc.union(*r));
            remaining = if column {
                Rect::new(row_bbox.x1, remaining.y0, remaining.x1, remaining.y1)
            } else {
                Rect::new(remaining.x0, row_bbox.y1, remaining.x1, remaining.y1)
            };
            offset += count;
        }
        assert_eq!(offset, sizes.len());
    }

    #[test]
    fn output_follows_input_order() {
        let (rects, _) = run(&[1.0, 3.0], Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rects[1], Rect::new(0.0, 0.0, 75.0, 50.0));
        assert_eq!(rects[0], Rect::new(75.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let (rects, rows) = run(&[2.0, 2.0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rows, vec![2]);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(rects[1], Rect::new(0.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn zero_weights_get_zero_area() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (rects, _) = run(&[3.0, 1.0, 0.0], bounds);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 75.0, 50.0));
        assert_eq!(rects[1], Rect::new(75.0, 0.0, 100.0, 50.0));
        assert_eq!(rects[2].area(), 0.0);
        assert!(rects[2].is_valid());
        assert!(bounds.includes(&rects[2]));

        let (all_zero, rows) = run(&[0.0, 0.0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rows, vec![2]);
        for r in all_zero {
            assert_eq!(r, Rect::new(0.0, 0.0, 0.0, 10.0));
        }
    }

    #[test]
    fn invalid_weights_count_as_zero() {
        let (rects, _) = run(&[f64::NAN, 1.0, -4.0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rects[1], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rects[0].area(), 0.0);
        assert_eq!(rects[2].area(), 0.0);
    }

    #[test]
    fn degenerate_bounds() {
        let (rects, _) = run(&[2.0, 1.0], Rect::new(5.0, 0.0, 5.0, 30.0));
        for r in &rects {
            assert!(r.is_valid());
            assert_eq!(r.area(), 0.0);
        }
        assert!(squarify(&[], Rect::new(0.0, 0.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn bruls_example_tiles_the_bounds() {
        let sizes = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let bounds = Rect::new(0.0, 0.0, 6.0, 4.0);
        let (rects, rows) = run(&sizes, bounds);
        assert_eq!(rows, vec![2, 2, 1, 1, 1]);
        let total: f64 = rects.iter().map(|r| r.area()).sum();
        assert!((total - 24.0).abs() < 1e-9);
        for (i, a) in rects.iter().enumerate() {
            assert!((a.area() - sizes[i]).abs() < 1e-9, "area of item {i}");
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }
}
