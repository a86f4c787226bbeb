//! Box-area downscaling.
//!
//! Each destination pixel is the plain average of the source rectangle it
//! covers. Point sampling would drop fine detail outright; at the coarse
//! grid sizes this crate emits, averaging keeps thin lines and gradients
//! visible.

use image::Rgb;

use crate::PixelGrid;

/// Shrinks `grid` so neither side exceeds `max_dim`, preserving aspect ratio
/// as far as integer rounding allows.
///
/// A grid that already fits, or one with a zero side, is returned as is.
/// A `max_dim` of zero is treated as one.
///
/// # Example
/// ```
/// use bbcode_art::{downscale_if_needed, PixelGrid};
/// use image::Rgb;
///
/// let grid = PixelGrid::from_pixel(400, 200, Rgb([9, 9, 9]));
/// let small = downscale_if_needed(grid, 100);
/// assert_eq!(small.dimensions(), (100, 50));
/// assert_eq!(*small.get_pixel(99, 49), Rgb([9, 9, 9]));
/// ```
#[must_use = "this returns the downscaled grid"]
pub fn downscale_if_needed(grid: PixelGrid, max_dim: u32) -> PixelGrid {
    let max_dim = max_dim.max(1);
    let (width, height) = grid.dimensions();
    if width == 0 || height == 0 || (width <= max_dim && height <= max_dim) {
        return grid;
    }

    let scale = f64::max(
        width as f64 / max_dim as f64,
        height as f64 / max_dim as f64,
    );
    let new_width = scaled_len(width, scale, max_dim);
    let new_height = scaled_len(height, scale, max_dim);

    log::debug!(
        "downscaling {}x{} -> {}x{} (scale {:.3})",
        width,
        height,
        new_width,
        new_height,
        scale
    );

    let mut out = PixelGrid::new(new_width, new_height);
    for ny in 0..new_height {
        let (y0, y1) = source_span(ny, scale, height);
        for nx in 0..new_width {
            let (x0, x1) = source_span(nx, scale, width);
            if let Some(color) = average(&grid, x0..x1, y0..y1) {
                out.put_pixel(nx, ny, color);
            }
        }
    }
    out
}

/// `round(len / scale)`, kept within `[1, max_dim]`.
fn scaled_len(len: u32, scale: f64, max_dim: u32) -> u32 {
    let rounded = (len as f64 / scale + 0.5) as u32;
    rounded.clamp(1, max_dim)
}

/// Half-open source range `[floor(i*scale), floor((i+1)*scale))` clamped to `limit`.
fn source_span(index: u32, scale: f64, limit: u32) -> (u32, u32) {
    let start = ((index as f64 * scale) as u32).min(limit);
    let end = (((index + 1) as f64 * scale) as u32).min(limit);
    (start, end.max(start))
}

/// Truncated mean of every pixel in the rectangle, `None` if it is empty.
fn average(
    grid: &PixelGrid,
    xs: std::ops::Range<u32>,
    ys: std::ops::Range<u32>,
) -> Option<Rgb<u8>> {
    let mut totals = [0u64; 3];
    let mut count = 0u64;
    for y in ys {
        for x in xs.clone() {
            let Rgb(channels) = grid.get_pixel(x, y);
            for (total, channel) in totals.iter_mut().zip(channels) {
                *total += u64::from(*channel);
            }
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some(Rgb(totals.map(|total| (total / count) as u8)))
}
