//! Raster decoding, delegated to the `image` crate.

use image::{DynamicImage, GenericImageView, Rgb, Rgba};

use crate::{BbcodeError, PixelGrid, Result};

/// Decodes PNG, JPEG, GIF, WebP or BMP bytes into a pixel grid.
///
/// The format is guessed from the leading bytes. Multi-frame formats yield
/// their first frame. Color channels are premultiplied by alpha before alpha
/// is dropped, so fully transparent pixels come out black.
///
/// # Errors
/// Returns [`BbcodeError::UnsupportedOrCorruptImage`] if the bytes are not
/// a recognized or well-formed image.
pub fn decode_image(bytes: &[u8]) -> Result<PixelGrid> {
    let format = image::guess_format(bytes).map_err(BbcodeError::UnsupportedOrCorruptImage)?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(BbcodeError::UnsupportedOrCorruptImage)?;

    let (width, height) = decoded.dimensions();
    log::debug!("decoded {:?} image {}x{}", format, width, height);

    Ok(into_grid(decoded))
}

/// Converts an already decoded image into a pixel grid.
pub(crate) fn into_grid(image: DynamicImage) -> PixelGrid {
    if !image.color().has_alpha() {
        return match image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        };
    }

    let rgba = image.to_rgba8();
    PixelGrid::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        premultiply(r, g, b, a)
    })
}

/// `c * a / 255` per channel, truncated.
#[inline]
pub(crate) fn premultiply(r: u8, g: u8, b: u8, a: u8) -> Rgb<u8> {
    let scale = |c: u8| (u16::from(c) * u16::from(a) / 255) as u8;
    Rgb([scale(r), scale(g), scale(b)])
}
