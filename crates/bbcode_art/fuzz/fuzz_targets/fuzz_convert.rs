#![no_main]

use arbitrary::Arbitrary;
use bbcode_art::convert;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    payload: String,
    max_dim: i64,
    glyph: String,
}

fuzz_target!(|input: FuzzInput| {
    // Any payload string must produce text or an error, never a panic
    let _ = convert(&input.payload, input.max_dim, &input.glyph);
});
