//! The conversion pipeline: payload → bytes → grid → downscaled grid → text.
//!
//! Every call owns its intermediate values and shares nothing with other
//! calls, so conversions may run in parallel freely.

use image::DynamicImage;

use crate::{
    downscale::downscale_if_needed,
    encoder::{bbcode_encode, normalize_glyph, EncodeOptions},
    payload::decode_payload,
    raster::{decode_image, into_grid},
    PixelGrid, Result, DEFAULT_GLYPH, DEFAULT_MAX_DIM, MAX_DIM_LIMIT,
};

/// Options for a conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Largest allowed output width or height, in pixels (1-800).
    pub max_dim: u32,
    /// Text repeated once per pixel.
    pub glyph: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_dim: DEFAULT_MAX_DIM,
            glyph: DEFAULT_GLYPH.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Builds options from raw caller input, clamping `max_dim` with
    /// [`clamp_max_dim`] and normalizing `glyph`.
    ///
    /// ```
    /// use bbcode_art::ConvertOptions;
    ///
    /// let opts = ConvertOptions::new(-5, "");
    /// assert_eq!(opts.max_dim, 100);
    /// assert_eq!(opts.glyph, "██");
    /// assert_eq!(ConvertOptions::new(5000, "@").max_dim, 800);
    /// ```
    pub fn new(max_dim: i64, glyph: &str) -> Self {
        Self {
            max_dim: clamp_max_dim(max_dim),
            glyph: normalize_glyph(glyph),
        }
    }

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions::with_glyph(&self.glyph)
    }
}

/// Non-positive requests become [`DEFAULT_MAX_DIM`]; anything above
/// [`MAX_DIM_LIMIT`] is capped.
pub fn clamp_max_dim(requested: i64) -> u32 {
    if requested <= 0 {
        DEFAULT_MAX_DIM
    } else {
        requested.min(i64::from(MAX_DIM_LIMIT)) as u32
    }
}

/// Converts an encoded image payload into BBCode block art.
///
/// `payload` may be a data URL, percent-encoded, or plain base64.
/// `max_dim` and `glyph` are clamped and normalized as in
/// [`ConvertOptions::new`].
///
/// # Errors
/// * [`crate::BbcodeError::InvalidEncoding`] if the payload is not base64
/// * [`crate::BbcodeError::UnsupportedOrCorruptImage`] if the bytes are not an image
#[must_use = "this returns the BBCode text"]
pub fn convert(payload: &str, max_dim: i64, glyph: &str) -> Result<String> {
    let opts = ConvertOptions::new(max_dim, glyph);
    let bytes = decode_payload(payload)?;
    convert_bytes(&bytes, &opts)
}

/// Converts raw image file bytes into BBCode block art.
#[must_use = "this returns the BBCode text"]
pub fn convert_bytes(bytes: &[u8], opts: &ConvertOptions) -> Result<String> {
    let grid = decode_image(bytes)?;
    Ok(render(grid, opts))
}

/// Converts an already decoded image into BBCode block art.
#[must_use = "this returns the BBCode text"]
pub fn convert_image(image: DynamicImage, opts: &ConvertOptions) -> String {
    render(into_grid(image), opts)
}

/// `max_dim` is public, so it is clamped again here.
fn render(grid: PixelGrid, opts: &ConvertOptions) -> String {
    let grid = downscale_if_needed(grid, opts.max_dim.clamp(1, MAX_DIM_LIMIT));
    let text = bbcode_encode(&grid, &opts.encode_options());
    log::debug!(
        "encoded {}x{} grid into {} bytes of markup",
        grid.width(),
        grid.height(),
        text.len()
    );
    text
}
