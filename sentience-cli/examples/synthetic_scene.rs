use sentience_cli::{FeaturePipeline, PipelineConfig};
use sentience_core::MonoImage;
use sentience_fast::{DetectorBuilder, DetectorConfig};
use std::time::Instant;

/// Sky over ground, tilted slightly, with a row of buildings on the skyline
fn synthetic_scene(width: usize, height: usize) -> MonoImage {
    let mut img = MonoImage::filled(width, height, 245);
    for x in 0..width {
        let horizon = height / 2 + x * 8 / width;
        for y in horizon..height {
            img.set(x, y, 50 + ((x * 3 + y * 5) % 13) as u8);
        }
    }
    for (i, bx) in (20..width - 30).step_by(45).enumerate() {
        let top = height / 2 - 15 - (i % 3) * 6;
        for y in top..height / 2 + 4 {
            for x in bx..bx + 18 {
                img.set(x, y, 35);
            }
        }
    }
    img
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let (width, height) = (480, 320);
    let img = synthetic_scene(width, height);
    println!("Synthetic scene: {}x{}", width, height);

    // Detector presets on their own
    for (name, builder) in [
        ("sensitive", DetectorBuilder::new(width, height).preset_sensitive()),
        ("balanced", DetectorBuilder::new(width, height).preset_balanced()),
        ("strict", DetectorBuilder::new(width, height).preset_strict()),
    ] {
        let detector = builder.build()?;
        let t0 = Instant::now();
        let corners = detector.detect_corners(&img)?;
        println!("  {:<9} {:>5} corners in {:.2?}", name, corners.len(), t0.elapsed());
    }

    // Configuration files round-trip through TOML
    let detector_cfg = DetectorConfig::balanced_preset(width, height).with_metadata("Demo", "synthetic skyline");
    println!("\nDetector config:\n{}", detector_cfg.to_toml()?);

    let pipeline_cfg = PipelineConfig::default();
    let toml = pipeline_cfg.to_toml()?;
    let reloaded = PipelineConfig::from_toml(&toml)?;

    // Full pipeline
    let pipeline = FeaturePipeline::new(&reloaded, width, height)?;
    let t0 = Instant::now();
    let frame = pipeline.process(&img)?;
    println!("Pipeline finished in {:.2?}", t0.elapsed());
    println!("{}", frame.summary());

    if let Some(h) = frame.horizon {
        println!(
            "Horizon at y={:.1}, tilt {:.2} degrees",
            h.vertical_position,
            h.gravity_angle.to_degrees()
        );
    }
    Ok(())
}
