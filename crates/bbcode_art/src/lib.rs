//! # bbcode_art
//!
//! Turns raster images into BBCode block art: one line of text per pixel row,
//! where every run of same-colored pixels becomes a `[color=#rrggbb]` span of
//! repeated block glyphs.
//!
//! ## Features
//!
//! - **Payload**: accepts data URLs, percent-encoded and plain base64 strings
//! - **Downscale**: box-area averaging to keep the output within a maximum size
//! - **Encoder**: run-length color tagging, one tag pair per constant-color run
//! - **Decoder**: parses the markup back into pixels
//!
//! ## Quick Start
//!
//! ### Converting an encoded payload
//!
//! ```ignore
//! use bbcode_art::convert;
//!
//! let text = convert("data:image/png;base64,iVBORw0KGgo...", 100, "██")?;
//! print!("{}", text);
//! ```
//!
//! ### Encoding raw pixels
//!
//! ```ignore
//! use bbcode_art::{bbcode_encode_rgba, EncodeOptions};
//!
//! // RGBA image data (4 bytes per pixel)
//! let rgba = vec![255u8, 0, 0, 255, 0, 255, 0, 255]; // red and green
//! let text = bbcode_encode_rgba(&rgba, 2, 1, &EncodeOptions::default())?;
//! assert_eq!(text, "[color=#ff0000]██[/color][color=#00ff00]██[/color]\r\n");
//! ```

use thiserror::Error;

pub mod convert;
pub mod decoder;
pub mod downscale;
pub mod encoder;
pub mod payload;
pub mod raster;

pub use convert::{clamp_max_dim, convert, convert_bytes, convert_image, ConvertOptions};
pub use decoder::bbcode_decode;
pub use downscale::downscale_if_needed;
pub use encoder::{bbcode_encode, bbcode_encode_rgba, normalize_glyph, EncodeOptions};
pub use payload::decode_payload;
pub use raster::decode_image;

/// Pixel grid handed from stage to stage. Alpha is already folded into the colors.
pub type PixelGrid = image::RgbImage;

/// Maximum dimension used when the caller asks for a non-positive one.
pub const DEFAULT_MAX_DIM: u32 = 100;

/// Upper clamp for the maximum dimension.
pub const MAX_DIM_LIMIT: u32 = 800;

/// Glyph used when the caller supplies none.
pub const DEFAULT_GLYPH: &str = "██";

/// Errors that can occur while converting images to or from BBCode art.
#[derive(Debug, Error)]
pub enum BbcodeError {
    /// Payload is not valid base64 after prefix and percent-decoding
    #[error("invalid base64 payload: {0}")]
    InvalidEncoding(String),

    /// Decoded bytes are not a recognized raster format
    #[error("unsupported or corrupt image: {0}")]
    UnsupportedOrCorruptImage(#[source] image::ImageError),

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Markup could not be parsed back into pixels
    #[error("invalid markup on line {line}: {reason}")]
    InvalidMarkup { line: usize, reason: String },

    /// Decoding markup needs a non-empty glyph to count
    #[error("glyph must not be empty")]
    EmptyGlyph,

    /// Integer overflow during processing
    #[error("integer overflow")]
    IntegerOverflow,
}

/// Result type for BBCode art operations.
pub type Result<T> = core::result::Result<T, BbcodeError>;

pub(crate) const OPEN_TAG_PREFIX: &str = "[color=";
pub(crate) const CLOSE_TAG: &str = "[/color]";
pub(crate) const LINE_BREAK: &str = "\r\n";
