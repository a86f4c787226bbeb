use base64::{engine::general_purpose, Engine as _};
use bbcode_art::convert;
use criterion::{criterion_group, criterion_main, Criterion};
use image::{ImageFormat, Rgba, RgbaImage};
use std::hint::black_box;
use std::io::Cursor;

fn gradient_data_url(width: u32, height: u32) -> String {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 96, 255])
    });
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png)
        .expect("Failed to encode gradient PNG");
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png.into_inner())
    )
}

fn bench_convert_small(c: &mut Criterion) {
    let payload = gradient_data_url(64, 64);

    c.bench_function("convert_png_64x64", |b| {
        b.iter(|| {
            let result = convert(black_box(&payload), 100, "██");
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_convert_downscaled(c: &mut Criterion) {
    let payload = gradient_data_url(1024, 768);

    c.bench_function("convert_png_1024x768_to_100", |b| {
        b.iter(|| {
            let result = convert(black_box(&payload), 100, "██");
            assert!(result.is_ok());
            result
        })
    });
}

criterion_group!(benches, bench_convert_small, bench_convert_downscaled);
criterion_main!(benches);
