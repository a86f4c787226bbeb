//! BBCode encoder: one text line per pixel row, one color tag pair per run.
//!
//! Adjacent pixels with the same color share a single
//! `[color=#rrggbb]...[/color]` span holding one glyph per pixel. Every row,
//! the last one included, ends with `\r\n`.

use image::Rgb;

use crate::{
    raster::premultiply, BbcodeError, PixelGrid, Result, CLOSE_TAG, DEFAULT_GLYPH, LINE_BREAK,
    OPEN_TAG_PREFIX,
};

/// Options for the BBCode encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Text repeated once per pixel.
    /// Emitted verbatim; use [`EncodeOptions::with_glyph`] to normalize.
    pub glyph: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            glyph: DEFAULT_GLYPH.to_string(),
        }
    }
}

impl EncodeOptions {
    /// Options using `glyph` after [`normalize_glyph`].
    pub fn with_glyph(glyph: &str) -> Self {
        Self {
            glyph: normalize_glyph(glyph),
        }
    }
}

/// Empty glyphs become [`DEFAULT_GLYPH`]; a single character is doubled so
/// that a pixel stays roughly square in a monospace font.
///
/// ```
/// use bbcode_art::normalize_glyph;
///
/// assert_eq!(normalize_glyph(""), "██");
/// assert_eq!(normalize_glyph("#"), "##");
/// assert_eq!(normalize_glyph("<>"), "<>");
/// ```
pub fn normalize_glyph(glyph: &str) -> String {
    let mut chars = glyph.chars();
    match (chars.next(), chars.next()) {
        (None, _) => DEFAULT_GLYPH.to_string(),
        (Some(c), None) => [c, c].iter().collect(),
        _ => glyph.to_string(),
    }
}

/// Encode a pixel grid into BBCode block art.
///
/// An empty grid produces an empty string.
///
/// # Example
/// ```
/// use bbcode_art::{bbcode_encode, EncodeOptions, PixelGrid};
/// use image::Rgb;
///
/// let grid = PixelGrid::from_pixel(2, 1, Rgb([255, 0, 0]));
/// let text = bbcode_encode(&grid, &EncodeOptions::with_glyph("#"));
/// assert_eq!(text, "[color=#ff0000]####[/color]\r\n");
/// ```
#[must_use = "this returns the encoded BBCode string"]
pub fn bbcode_encode(grid: &PixelGrid, opts: &EncodeOptions) -> String {
    let (width, height) = grid.dimensions();
    if width == 0 || height == 0 {
        return String::new();
    }

    let mut out = String::with_capacity(estimate_capacity(width, height, &opts.glyph));
    for (y, row) in grid.rows().enumerate() {
        let runs = encode_row(&mut out, row, &opts.glyph);
        log::trace!("row {}: {} runs", y, runs);
    }
    out
}

/// Encode RGBA image data into BBCode block art.
///
/// # Arguments
/// * `rgba` - Raw RGBA pixel data (4 bytes per pixel: R, G, B, A)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `opts` - Encoding options
///
/// Color channels are premultiplied by alpha, as for decoded images.
/// Zero width or height yields an empty string.
#[must_use = "this returns the encoded BBCode string"]
pub fn bbcode_encode_rgba(
    rgba: &[u8],
    width: usize,
    height: usize,
    opts: &EncodeOptions,
) -> Result<String> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(BbcodeError::IntegerOverflow)?;
    if rgba.len() != expected {
        return Err(BbcodeError::BufferSizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(BbcodeError::IntegerOverflow);
    };

    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .flat_map(|c| premultiply(c[0], c[1], c[2], c[3]).0)
        .collect();
    let grid = PixelGrid::from_raw(w, h, rgb).ok_or(BbcodeError::BufferSizeMismatch {
        expected,
        actual: rgba.len(),
    })?;
    Ok(bbcode_encode(&grid, opts))
}

/// Appends one encoded row and returns how many runs it produced.
fn encode_row<'a>(
    out: &mut String,
    row: impl Iterator<Item = &'a Rgb<u8>>,
    glyph: &str,
) -> usize {
    let mut last: Option<Rgb<u8>> = None;
    let mut runs = 0;

    for &pixel in row {
        if last != Some(pixel) {
            if last.is_some() {
                out.push_str(CLOSE_TAG);
            }
            write_open_tag(out, pixel);
            runs += 1;
            last = Some(pixel);
        }
        out.push_str(glyph);
    }

    if last.is_some() {
        out.push_str(CLOSE_TAG);
    }
    out.push_str(LINE_BREAK);
    runs
}

/// Writes `[color=#rrggbb]`.
#[inline]
fn write_open_tag(out: &mut String, Rgb(channels): Rgb<u8>) {
    const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

    out.push_str(OPEN_TAG_PREFIX);
    out.push('#');
    for channel in channels {
        out.push(HEX_DIGITS[(channel >> 4) as usize] as char);
        out.push(HEX_DIGITS[(channel & 0x0f) as usize] as char);
    }
    out.push(']');
}

/// Glyphs plus one tag pair per row; rows with many runs grow past this.
fn estimate_capacity(width: u32, height: u32, glyph: &str) -> usize {
    const TAG_PAIR_LEN: usize = "[color=#000000][/color]".len();
    let per_row = (width as usize)
        .saturating_mul(glyph.len())
        .saturating_add(TAG_PAIR_LEN + LINE_BREAK.len());
    per_row.saturating_mul(height as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    fn row_grid(pixels: &[Rgb<u8>]) -> PixelGrid {
        PixelGrid::from_fn(pixels.len() as u32, 1, |x, _| pixels[x as usize])
    }

    #[test]
    fn test_uniform_row_single_run() {
        let text = bbcode_encode(&row_grid(&[RED, RED]), &EncodeOptions::default());
        assert_eq!(text, "[color=#ff0000]████[/color]\r\n");
    }

    #[test]
    fn test_two_colors_two_runs() {
        let text = bbcode_encode(&row_grid(&[RED, GREEN]), &EncodeOptions::default());
        assert_eq!(
            text,
            "[color=#ff0000]██[/color][color=#00ff00]██[/color]\r\n"
        );
    }

    #[test]
    fn test_color_returns_opens_new_run() {
        let text = bbcode_encode(
            &row_grid(&[RED, GREEN, GREEN, RED]),
            &EncodeOptions::with_glyph("x"),
        );
        assert_eq!(
            text,
            "[color=#ff0000]xx[/color][color=#00ff00]xxxx[/color][color=#ff0000]xx[/color]\r\n"
        );
    }

    #[test]
    fn test_runs_do_not_span_rows() {
        let grid = PixelGrid::from_pixel(2, 2, Rgb([1, 2, 3]));
        let text = bbcode_encode(&grid, &EncodeOptions::with_glyph("ab"));
        assert_eq!(
            text,
            "[color=#010203]abab[/color]\r\n[color=#010203]abab[/color]\r\n"
        );
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(bbcode_encode(&PixelGrid::new(0, 0), &EncodeOptions::default()), "");
        assert_eq!(bbcode_encode(&PixelGrid::new(0, 3), &EncodeOptions::default()), "");
    }

    #[test]
    fn test_empty_glyph_emits_empty_runs() {
        let opts = EncodeOptions {
            glyph: String::new(),
        };
        let text = bbcode_encode(&row_grid(&[RED, GREEN]), &opts);
        assert_eq!(text, "[color=#ff0000][/color][color=#00ff00][/color]\r\n");
    }

    #[test]
    fn test_normalize_glyph() {
        assert_eq!(normalize_glyph(""), DEFAULT_GLYPH);
        assert_eq!(normalize_glyph("█"), "██");
        assert_eq!(normalize_glyph("▓▓▓"), "▓▓▓");
    }

    #[test]
    fn test_encode_rgba_premultiplies_alpha() {
        let rgba = [255u8, 0, 0, 255, 255, 0, 0, 0];
        let text = bbcode_encode_rgba(&rgba, 2, 1, &EncodeOptions::with_glyph("#")).unwrap();
        assert_eq!(text, "[color=#ff0000]##[/color][color=#000000]##[/color]\r\n");
    }

    #[test]
    fn test_hex_digits_are_lowercase_and_padded() {
        let text = bbcode_encode(&row_grid(&[Rgb([0x0a, 0xf0, 0x9c])]), &EncodeOptions::default());
        assert_eq!(text, "[color=#0af09c]██[/color]\r\n");
    }

    #[test]
    fn test_encode_rgba_size_mismatch() {
        let rgba = vec![0u8; 16];
        assert!(matches!(
            bbcode_encode_rgba(&rgba, 10, 10, &EncodeOptions::default()),
            Err(BbcodeError::BufferSizeMismatch {
                expected: 400,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_encode_rgba_zero_dimensions() {
        let text = bbcode_encode_rgba(&[], 0, 4, &EncodeOptions::default()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_encode_rgba_overflow() {
        assert!(matches!(
            bbcode_encode_rgba(&[], usize::MAX, 2, &EncodeOptions::default()),
            Err(BbcodeError::IntegerOverflow)
        ));
    }
}
