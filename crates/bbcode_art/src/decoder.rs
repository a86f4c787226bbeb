//! BBCode markup decoder.
//!
//! Reads the text produced by [`crate::bbcode_encode`] back into a pixel grid.
//! The accepted grammar is strict, one row per line:
//!
//! ```text
//! line := run+ ("\r\n" | "\n")
//! run  := "[color=#" HEX{6} "]" glyph+ "[/color]"
//! ```
//!
//! Every line must describe the same number of pixels.

use image::Rgb;

use crate::{
    encoder::normalize_glyph, BbcodeError, PixelGrid, Result, CLOSE_TAG, OPEN_TAG_PREFIX,
};

/// A run of `len` pixels of one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    color: Rgb<u8>,
    len: usize,
}

/// Decodes BBCode block art into a pixel grid.
///
/// `glyph` is normalized like the encoder does it, so a single character is
/// expected twice per pixel.
///
/// # Errors
/// * [`BbcodeError::EmptyGlyph`] if `glyph` is empty
/// * [`BbcodeError::InvalidMarkup`] on malformed tags, stray text, partial
///   glyphs or rows of differing width
///
/// # Example
/// ```
/// use bbcode_art::bbcode_decode;
/// use image::Rgb;
///
/// let grid = bbcode_decode("[color=#ff0000]##[/color][color=#00FF00]##[/color]\r\n", "#")?;
/// assert_eq!(grid.dimensions(), (2, 1));
/// assert_eq!(*grid.get_pixel(1, 0), Rgb([0, 255, 0]));
/// # Ok::<(), bbcode_art::BbcodeError>(())
/// ```
#[must_use = "this returns the decoded pixel grid"]
pub fn bbcode_decode(text: &str, glyph: &str) -> Result<PixelGrid> {
    if glyph.is_empty() {
        return Err(BbcodeError::EmptyGlyph);
    }
    let glyph = normalize_glyph(glyph);

    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let mut rows = Vec::with_capacity(lines.len());
    let mut width: Option<usize> = None;
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let runs = RowParser::new(line, &glyph, line_no).parse()?;
        let row_width: usize = runs.iter().map(|run| run.len).sum();

        match width {
            None => width = Some(row_width),
            Some(expected) if expected != row_width => {
                return Err(invalid(
                    line_no,
                    format!("row has {} pixels, expected {}", row_width, expected),
                ));
            }
            Some(_) => {}
        }
        rows.push(runs);
    }

    let width = u32::try_from(width.unwrap_or(0)).map_err(|_| BbcodeError::IntegerOverflow)?;
    let height = u32::try_from(rows.len()).map_err(|_| BbcodeError::IntegerOverflow)?;

    let mut grid = PixelGrid::new(width, height);
    for (y, runs) in rows.iter().enumerate() {
        let mut x = 0u32;
        for run in runs {
            for _ in 0..run.len {
                grid.put_pixel(x, y as u32, run.color);
                x += 1;
            }
        }
    }

    log::debug!("decoded markup into {}x{} grid", width, height);
    Ok(grid)
}

struct RowParser<'a> {
    rest: &'a str,
    glyph: &'a str,
    line: usize,
}

impl<'a> RowParser<'a> {
    fn new(line_text: &'a str, glyph: &'a str, line: usize) -> Self {
        Self {
            rest: line_text,
            glyph,
            line,
        }
    }

    fn parse(mut self) -> Result<Vec<Run>> {
        if self.rest.is_empty() {
            return Err(invalid(self.line, "empty line"));
        }

        let mut runs = Vec::new();
        while !self.rest.is_empty() {
            let color = self.open_tag()?;
            let len = self.glyphs()?;
            runs.push(Run { color, len });
        }
        Ok(runs)
    }

    /// Consumes `[color=#rrggbb]`.
    fn open_tag(&mut self) -> Result<Rgb<u8>> {
        let Some(rest) = self
            .rest
            .strip_prefix(OPEN_TAG_PREFIX)
            .and_then(|r| r.strip_prefix('#'))
        else {
            return Err(invalid(self.line, "expected [color=#rrggbb]"));
        };

        let (hex, rest) = match (rest.get(..6), rest.get(6..)) {
            (Some(hex), Some(rest)) => (hex, rest),
            _ => return Err(invalid(self.line, "truncated color tag")),
        };
        let color = parse_hex_color(hex)
            .ok_or_else(|| invalid(self.line, format!("bad color #{}", hex)))?;
        let rest = rest
            .strip_prefix(']')
            .ok_or_else(|| invalid(self.line, "unterminated color tag"))?;

        self.rest = rest;
        Ok(color)
    }

    /// Consumes the glyphs of a run and its `[/color]`, returning the count.
    fn glyphs(&mut self) -> Result<usize> {
        let end = self
            .rest
            .find(CLOSE_TAG)
            .ok_or_else(|| invalid(self.line, "missing [/color]"))?;
        let content = &self.rest[..end];

        let glyph_len = self.glyph.len();
        if content.is_empty() {
            return Err(invalid(self.line, "run without glyphs"));
        }
        if content.len() % glyph_len != 0
            || !content
                .as_bytes()
                .chunks(glyph_len)
                .all(|chunk| chunk == self.glyph.as_bytes())
        {
            return Err(invalid(
                self.line,
                format!("run content {:?} is not a repetition of the glyph", content),
            ));
        }

        self.rest = &self.rest[end + CLOSE_TAG.len()..];
        Ok(content.len() / glyph_len)
    }
}

fn parse_hex_color(hex: &str) -> Option<Rgb<u8>> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
}

fn invalid(line: usize, reason: impl Into<String>) -> BbcodeError {
    BbcodeError::InvalidMarkup {
        line,
        reason: reason.into(),
    }
}
