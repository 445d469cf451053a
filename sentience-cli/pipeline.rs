use serde::{Deserialize, Serialize};
use sentience_constellation::{ConstellationBuilder, DirectionAggregator};
use sentience_core::{CornerSet, Line, MonoImage};
use sentience_fast::ConfiguredDetector;
use sentience_lines::{classify, gravity_direction, horizon_detection, HorizonEstimate, LineVerifier};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::{SentienceError, SentienceResult};

/// Everything extracted from one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFrame {
    pub corners: CornerSet,
    pub lines: Vec<Line>,
    /// Radians in `[-π/4, π/4]`
    pub gravity_angle: f32,
    pub horizon: Option<HorizonEstimate>,
}

impl FeatureFrame {
    pub fn summary(&self) -> String {
        let on_horizon = self.lines.iter().filter(|l| l.on_horizon).count();
        let horizon = match &self.horizon {
            Some(h) => format!("y={:.1} tilt={:.3} rad", h.vertical_position, h.gravity_angle),
            None => "none".to_string(),
        };
        format!(
            "{} corners, {} lines ({} on horizon), gravity {:.3} rad, horizon {}",
            self.corners.len(), self.lines.len(), on_horizon, self.gravity_angle, horizon
        )
    }
}

/// Detector, descriptors and line analysis wired together for one image size
pub struct FeaturePipeline {
    detector: ConfiguredDetector,
    constellations: ConstellationBuilder,
    directions: DirectionAggregator,
    verifier: Option<LineVerifier>,
}

impl FeaturePipeline {
    pub fn new(config: &PipelineConfig, width: usize, height: usize) -> SentienceResult<Self> {
        config.validate()?;
        let detector = config.detector_builder(width, height).build()?;

        let c = &config.constellation;
        let constellations = ConstellationBuilder::new(c.max_x_diff, c.max_y_diff)
            .ok_or_else(|| {
                SentienceError::Config(format!(
                    "constellation window {}x{} must be positive",
                    c.max_x_diff, c.max_y_diff
                ))
            })?
            .with_half_size(c.half_size);
        let directions = DirectionAggregator::new(config.direction.radius).with_stride(config.direction.stride);

        let l = &config.lines;
        let verifier = l.enabled.then(|| {
            LineVerifier::new(l.line_threshold, l.min_length)
                .with_samples(l.samples)
                .with_radius(l.radius)
        });

        log::debug!("pipeline ready: {}", detector.config_summary());
        Ok(Self {
            detector,
            constellations,
            directions,
            verifier,
        })
    }

    /// Run every stage over `img`
    pub fn process(&self, img: &MonoImage) -> SentienceResult<FeatureFrame> {
        let t0 = Instant::now();
        let mut corners = self.detector.detect_corners(img)?;
        self.constellations.describe_all(&mut corners);
        self.directions.aggregate(&mut corners);

        let mut lines = match &self.verifier {
            Some(v) => v.fast_lines(img, &corners),
            None => Vec::new(),
        };
        classify(img, &corners, &mut lines);
        let gravity_angle = gravity_direction(&corners, &lines);
        let horizon = horizon_detection(img.width(), &corners, &lines);

        let frame = FeatureFrame {
            corners,
            lines,
            gravity_angle,
            horizon,
        };
        log::info!("frame processed in {:.2?}: {}", t0.elapsed(), frame.summary());
        Ok(frame)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.detector.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentience_fast::FastError;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Bright sky over dark ground with a few dark blocks standing on the horizon
    fn scene(width: usize, height: usize) -> MonoImage {
        let horizon = height / 2;
        let mut img = MonoImage::filled(width, height, 250);
        for y in horizon..height {
            for x in 0..width {
                img.set(x, y, 40);
            }
        }
        for bx in [20, 60, 100, 140] {
            for y in horizon - 12..horizon {
                for x in bx..bx + 8 {
                    img.set(x, y, 40);
                }
            }
        }
        img
    }

    #[test]
    fn test_process_scene() {
        init_logs();
        let img = scene(160, 120);
        let pipeline = FeaturePipeline::new(&PipelineConfig::default(), 160, 120).unwrap();
        let frame = pipeline.process(&img).unwrap();

        assert!(!frame.corners.is_empty());
        assert!(sentience_core::is_raster_ordered(frame.corners.as_slice()));
        for c in &frame.corners {
            assert!(c.constellation.is_some());
            assert!(c.direction.is_some());
        }
        assert!((-std::f32::consts::FRAC_PI_4..=std::f32::consts::FRAC_PI_4).contains(&frame.gravity_angle));
        for line in &frame.lines {
            assert!(line.point1 < line.point2);
            assert!(line.point2.0 < frame.corners.len());
        }
        assert!(frame.summary().contains("corners"));
    }

    /// Five bright dots on a dark field: four at the corners of a square and one in the middle
    fn dots_scene() -> MonoImage {
        let mut img = MonoImage::filled(120, 120, 40);
        for (cx, cy) in [(25, 25), (95, 25), (60, 60), (25, 95), (95, 95)] {
            for y in cy - 1..=cy + 1 {
                for x in cx - 1..=cx + 1 {
                    img.set(x, y, 200);
                }
            }
            img.set(cx, cy, 250);
        }
        img
    }

    #[test]
    fn test_diagonal_lines_drive_gravity() {
        init_logs();
        let frame = FeaturePipeline::new(&PipelineConfig::default(), 120, 120)
            .unwrap()
            .process(&dots_scene())
            .unwrap();

        let positions: Vec<(i32, i32)> = frame.corners.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(positions, vec![(25, 25), (95, 25), (60, 60), (25, 95), (95, 95)]);

        // rows and columns pass beside another dot, only the diagonals are clean
        let pairs: Vec<(usize, usize)> = frame.lines.iter().map(|l| (l.point1.0, l.point2.0)).collect();
        assert_eq!(pairs, vec![(0, 2), (0, 4), (1, 2), (1, 3), (2, 3), (2, 4)]);

        // both diagonals weigh equally, the first bin holding atan(1/√2) wins
        let expected = 2.5 * std::f32::consts::TAU / 30.0;
        assert!((frame.gravity_angle - expected).abs() < 1e-5, "{}", frame.gravity_angle);

        // no bright sky above any line
        assert!(frame.lines.iter().all(|l| !l.on_horizon));
        assert!(frame.horizon.is_none());
    }

    #[test]
    fn test_lines_disabled() {
        init_logs();
        let mut cfg = PipelineConfig::default();
        cfg.lines.enabled = false;
        let img = scene(160, 120);
        let frame = FeaturePipeline::new(&cfg, 160, 120).unwrap().process(&img).unwrap();
        assert!(frame.lines.is_empty());
        assert_eq!(frame.gravity_angle, 0.0);
        assert!(frame.horizon.is_none());
    }

    #[test]
    fn test_flat_image_yields_empty_frame() {
        init_logs();
        let frame = FeaturePipeline::new(&PipelineConfig::default(), 64, 48)
            .unwrap()
            .process(&MonoImage::filled(64, 48, 128))
            .unwrap();
        assert!(frame.corners.is_empty());
        assert!(frame.lines.is_empty());
        assert!(frame.horizon.is_none());
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let pipeline = FeaturePipeline::new(&PipelineConfig::default(), 64, 48).unwrap();
        let result = pipeline.process(&MonoImage::filled(48, 64, 0));
        assert!(matches!(result, Err(SentienceError::Fast(FastError::DimensionMismatch { .. }))));
    }

    #[test]
    fn test_frame_serializes() {
        let img = scene(160, 120);
        let frame = FeaturePipeline::new(&PipelineConfig::default(), 160, 120)
            .unwrap()
            .process(&img)
            .unwrap();
        let json = serde_json::to_string(&frame).unwrap();
        let back: FeatureFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.corners.len(), frame.corners.len());
        assert_eq!(back.lines.len(), frame.lines.len());
    }
}
