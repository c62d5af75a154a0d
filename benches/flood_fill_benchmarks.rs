use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wand_bgremove::{
    apply_color_key, encode_apng, resize_to_canvas, AnimationOptions, CanvasSize, Coordinate,
    PixelBuffer, RegionGrower, Rgb, Tolerance,
};

/// Flat background with a centered opaque square covering a quarter of the area
fn sprite(size: u32) -> PixelBuffer {
    let quarter = size / 4;
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let core = quarter..size - quarter;
            let inside = core.contains(&x) && core.contains(&y);
            let rgba = if inside {
                [30, 90, 200, 255]
            } else {
                [250, 250, 250, 255]
            };
            data.extend_from_slice(&rgba);
        }
    }
    PixelBuffer::from_raw(size, size, data).unwrap()
}

fn bench_region_growing(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_growing");
    let tolerance = Tolerance::new(32.0).unwrap();

    for size in [64u32, 256, 1024] {
        let source = sprite(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter_batched(
                || source.clone(),
                |mut buffer| {
                    RegionGrower::grow(&mut buffer, Coordinate::new(0, 0), tolerance).unwrap();
                    black_box(buffer)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_select_only(c: &mut Criterion) {
    let source = sprite(512);
    let tolerance = Tolerance::new(32.0).unwrap();

    c.bench_function("select_512", |b| {
        b.iter(|| {
            RegionGrower::select(black_box(&source), Coordinate::new(0, 0), tolerance).unwrap()
        });
    });
}

fn bench_color_key(c: &mut Criterion) {
    let source = sprite(512);
    let tolerance = Tolerance::new(32.0).unwrap();

    c.bench_function("color_key_512", |b| {
        b.iter_batched(
            || source.clone(),
            |mut buffer| {
                apply_color_key(&mut buffer, Rgb::WHITE, tolerance).unwrap();
                black_box(buffer)
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_resize_and_animate(c: &mut Criterion) {
    let source = sprite(256);
    let canvas = CanvasSize::default();

    c.bench_function("resize_256_to_default_canvas", |b| {
        b.iter(|| resize_to_canvas(black_box(&source), canvas).unwrap());
    });

    let frames: Vec<_> = (0..8).map(|_| resize_to_canvas(&source, canvas).unwrap()).collect();
    c.bench_function("encode_apng_8_frames", |b| {
        b.iter(|| encode_apng(black_box(&frames), &AnimationOptions::default()).unwrap());
    });
}

criterion_group!(
    benches,
    bench_region_growing,
    bench_select_only,
    bench_color_key,
    bench_resize_and_animate
);
criterion_main!(benches);
