#![no_main]

use arbitrary::Arbitrary;
use bbcode_art::{bbcode_encode_rgba, EncodeOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    pixels: Vec<u8>,
    glyph: String,
}

fuzz_target!(|input: FuzzInput| {
    let width = input.width as usize;
    let height = input.height as usize;

    // Ensure we have enough pixels (RGBA = 4 bytes per pixel)
    let expected_size = width * height * 4;
    if input.pixels.len() < expected_size {
        return;
    }

    let pixels = &input.pixels[..expected_size];
    let opts = EncodeOptions::with_glyph(&input.glyph);

    let text = bbcode_encode_rgba(pixels, width, height, &opts).expect("sized buffer must encode");
    if width > 0 && height > 0 {
        assert!(text.ends_with("\r\n"));
    } else {
        assert!(text.is_empty());
    }
});
