#![no_main]

use arbitrary::Arbitrary;
use bbcode_art::{bbcode_decode, bbcode_encode, downscale_if_needed, EncodeOptions, PixelGrid};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    max_dim: u8,
    pixels: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let width = (input.width as u32).clamp(1, 64);
    let height = (input.height as u32).clamp(1, 64);

    // Ensure we have enough pixels (RGB = 3 bytes per pixel)
    let expected_size = (width * height * 3) as usize;
    if input.pixels.len() < expected_size {
        return;
    }

    let Some(grid) = PixelGrid::from_raw(width, height, input.pixels[..expected_size].to_vec())
    else {
        return;
    };

    let max_dim = (input.max_dim as u32).max(1);
    let grid = downscale_if_needed(grid, max_dim);
    assert!(grid.width() <= max_dim && grid.height() <= max_dim);

    // Encoding is lossless with respect to the (downscaled) grid
    let text = bbcode_encode(&grid, &EncodeOptions::default());
    let decoded = bbcode_decode(&text, "██").expect("encoder output must decode");
    assert_eq!(decoded, grid);
});
