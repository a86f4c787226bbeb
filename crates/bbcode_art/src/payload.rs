//! Payload normalization: turns a transported image string into raw bytes.
//!
//! Callers hand over whatever their transport produced. That is usually a
//! `data:` URL read by a browser, sometimes percent-encoded a second time
//! on the way, and sometimes bare base64. The tail is always base64.

use std::borrow::Cow;

use base64::{engine::general_purpose, Engine as _};
use percent_encoding::percent_decode_str;

use crate::{BbcodeError, Result};

const BASE64_MARKER: &str = "base64";

/// Decodes an encoded image payload into raw image bytes.
///
/// The steps run in order:
/// 1. A `data:...;base64,` style prefix is dropped when the text before the
///    first comma mentions `base64`.
/// 2. If a `%` is present, percent-decoding is attempted. A failed attempt
///    leaves the string as it was. This is not form unescaping: `+` is
///    kept, so a payload mixing `%3D` with raw `+` still decodes.
/// 3. The remainder is decoded as standard padded base64. Line breaks are
///    skipped.
///
/// # Errors
/// Returns [`BbcodeError::InvalidEncoding`] when step 3 fails.
///
/// # Example
/// ```
/// use bbcode_art::decode_payload;
///
/// let bytes = decode_payload("data:text/plain;base64,aGk=")?;
/// assert_eq!(bytes, b"hi");
/// # Ok::<(), bbcode_art::BbcodeError>(())
/// ```
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let body = strip_data_url_prefix(payload);
    let body = percent_decode_best_effort(body);

    let cleaned: Cow<'_, str> = if body.contains(['\r', '\n']) {
        Cow::Owned(body.chars().filter(|c| *c != '\r' && *c != '\n').collect())
    } else {
        body
    };

    let bytes = general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| BbcodeError::InvalidEncoding(e.to_string()))?;

    log::debug!("payload decoded to {} bytes", bytes.len());
    Ok(bytes)
}

/// Drops everything up to and including the first comma, but only when the
/// part before it carries the base64 marker.
pub(crate) fn strip_data_url_prefix(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((head, tail)) if head.contains(BASE64_MARKER) => {
            log::debug!("stripped data URL prefix {:?}", head);
            tail
        }
        _ => payload,
    }
}

/// Percent-decodes `text` if it contains a `%`. Malformed escapes or a
/// non UTF-8 result count as failure and return the input untouched.
///
/// Unlike `application/x-www-form-urlencoded` unescaping, `+` is not turned
/// into a space. It is part of the base64 alphabet, and a space would make
/// an otherwise valid payload fail to decode.
pub(crate) fn percent_decode_best_effort(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    if has_malformed_escape(text) {
        log::debug!("percent-decoding skipped: malformed escape");
        return Cow::Borrowed(text);
    }

    match percent_decode_str(text).decode_utf8() {
        Ok(decoded) => {
            log::debug!("percent-decoding applied");
            Cow::Owned(decoded.into_owned())
        }
        Err(e) => {
            log::debug!("percent-decoding skipped: {}", e);
            Cow::Borrowed(text)
        }
    }
}

/// `percent_decode_str` passes a stray `%` through silently; a stray `%`
/// means the payload was never percent-encoded.
fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let valid = bytes
                .get(idx + 1..idx + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return true;
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }
    false
}
