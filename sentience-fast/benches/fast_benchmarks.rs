use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use sentience_core::{CornerSet, FastVariant, FeatureConfig, MonoImage};
use sentience_fast::{CornerDetector, DetectorBuilder, FastDetector};

/// Create benchmark image with corner-bearing structures
fn create_benchmark_image(width: usize, height: usize, complexity: &str) -> MonoImage {
    let mut img = MonoImage::filled(width, height, 128);

    match complexity {
        "simple" => {
            // One bright square in the middle
            let cx = width / 2;
            let cy = height / 2;
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    img.set(x, y, 255);
                }
            }
        }
        "complex" => {
            // Blocks of varying intensity
            let centres = [(width / 4, height / 4), (3 * width / 4, height / 4),
                           (width / 4, 3 * height / 4), (3 * width / 4, 3 * height / 4),
                           (width / 2, height / 2)];
            for (i, &(cx, cy)) in centres.iter().enumerate() {
                let intensity = 150 + (i * 20) as u8;
                for y in cy - 3..=cy + 3 {
                    for x in cx - 3..=cx + 3 {
                        img.set(x, y, intensity);
                    }
                }
            }
        }
        "realistic" => {
            // Horizontal gradient with periodic texture
            for y in 0..height {
                for x in 0..width {
                    let gradient = ((x as f32 / width as f32) * 50.0) as u8;
                    let noise = ((x * 7 + y * 13) % 11) as u8;
                    img.set(x, y, 100 + gradient + noise);
                }
            }
            for i in 1..20 {
                let cx = i * width / 20;
                let cy = (i * 7 * height / 20) % (height - 6) + 3;
                for y in cy - 2..=cy + 2 {
                    for x in cx - 2..=cx + 2 {
                        img.set(x, y, if (x + y) % 2 == 0 { 30 } else { 230 });
                    }
                }
            }
        }
        _ => {}
    }

    img
}

fn create_test_config() -> FeatureConfig {
    FeatureConfig {
        barrier: 20,
        variant: FastVariant::Nine,
        n_threads: 1, // Single-threaded for consistent benchmarks
    }
}

/// Benchmark detection plus suppression across sizes
fn bench_full_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_detection");

    let sizes = [(64, 64), (128, 128), (320, 240), (640, 480)];
    let complexities = ["simple", "complex", "realistic"];

    for &(width, height) in &sizes {
        for complexity in &complexities {
            let detector = FastDetector::new(create_test_config(), width, height).unwrap();
            let img = create_benchmark_image(width, height, complexity);

            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", width, height), complexity),
                &(detector, img),
                |b, (detector, img)| {
                    b.iter(|| black_box(detector.detect_nonmax(black_box(img)).unwrap()))
                },
            );
        }
    }

    group.finish();
}

/// Benchmark individual pipeline stages
fn bench_pipeline_stages(c: &mut Criterion) {
    let (width, height) = (320, 240);
    let detector = FastDetector::new(create_test_config(), width, height).unwrap();
    let img = create_benchmark_image(width, height, "realistic");

    let mut group = c.benchmark_group("pipeline_stages");

    group.bench_function("detect", |b| {
        b.iter(|| black_box(detector.detect(black_box(&img)).unwrap()))
    });

    let raw = detector.detect(&img).unwrap();
    group.bench_function("score", |b| {
        b.iter(|| {
            let mut corners = raw.clone();
            CornerDetector::score_corners(black_box(&img), &mut corners, 20, false);
            black_box(corners)
        })
    });

    let scored = CornerSet::from_corners(detector.detect_with_score(&img).unwrap());
    group.bench_function("non_maximum_suppression", |b| {
        b.iter(|| black_box(detector.non_maximum_suppression(black_box(&scored))))
    });

    group.finish();
}

/// Compare the two arc variants and parallel modes
fn bench_configurations(c: &mut Criterion) {
    let (width, height) = (640, 480);
    let img = create_benchmark_image(width, height, "realistic");
    let mut group = c.benchmark_group("configurations");

    for (name, variant, parallel) in [
        ("fast9_seq", FastVariant::Nine, false),
        ("fast9_par", FastVariant::Nine, true),
        ("fast10_seq", FastVariant::Ten, false),
        ("fast10_par", FastVariant::Ten, true),
    ] {
        let detector = DetectorBuilder::new(width, height)
            .variant(variant)
            .parallel(parallel)
            .build()
            .unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(detector.detect_corners(black_box(&img)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_detection, bench_pipeline_stages, bench_configurations);
criterion_main!(benches);
