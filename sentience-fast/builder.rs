use sentience_core::{FastVariant, FeatureConfig};
use crate::error::FastResult;
use crate::detector::FastDetector;
use crate::config::DetectorConfig;
use crate::configured_detector::ConfiguredDetector;
use crate::types::CalibrationOffset;

/// Builder for creating a `ConfiguredDetector`
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    config: FeatureConfig,
    width: usize,
    height: usize,
    parallel: bool,
    nonmax_suppression: bool,
    calibration: CalibrationOffset,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_config(DetectorConfig::new(width, height))
    }

    /// Set the barrier (1-127)
    pub fn barrier(mut self, barrier: u8) -> Self {
        self.config.barrier = barrier;
        self
    }

    /// Set the segment-test variant
    pub fn variant(mut self, variant: FastVariant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Set the variant from a minimum arc length; lengths other than 9 and 10 are ignored
    pub fn arc_length(mut self, n: usize) -> Self {
        match FastVariant::from_arc_length(n) {
            Some(variant) => self.config.variant = variant,
            None => log::warn!("unsupported arc length {}, keeping {:?}", n, self.config.variant),
        }
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Enable or disable row-parallel detection
    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Enable or disable non-maximal suppression
    pub fn nonmax_suppression(mut self, enable: bool) -> Self {
        self.nonmax_suppression = enable;
        self
    }

    /// Set the offset applied to suppression survivors
    pub fn calibration(mut self, calibration: CalibrationOffset) -> Self {
        self.calibration = calibration;
        self
    }

    /// Apply the sensitive preset
    pub fn preset_sensitive(self) -> Self {
        let (w, h) = (self.width, self.height);
        self.apply_preset(DetectorConfig::sensitive_preset(w, h))
    }

    /// Apply the balanced preset
    pub fn preset_balanced(self) -> Self {
        let (w, h) = (self.width, self.height);
        self.apply_preset(DetectorConfig::balanced_preset(w, h))
    }

    /// Apply the strict preset
    pub fn preset_strict(self) -> Self {
        let (w, h) = (self.width, self.height);
        self.apply_preset(DetectorConfig::strict_preset(w, h))
    }

    fn apply_preset(mut self, preset: DetectorConfig) -> Self {
        self.config = preset.core;
        self.parallel = preset.parallel;
        self.nonmax_suppression = preset.nonmax_suppression;
        self
    }

    /// Build the `ConfiguredDetector`
    pub fn build(self) -> FastResult<ConfiguredDetector> {
        let config = self.clone().to_config();
        config.validate()?;
        let detector = FastDetector::new(config.core, config.width, config.height)?
            .with_parallel(config.parallel)
            .with_calibration(config.calibration);
        Ok(ConfiguredDetector {
            detector,
            config: self,
        })
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self {
            config: config.core,
            width: config.width,
            height: config.height,
            parallel: config.parallel,
            nonmax_suppression: config.nonmax_suppression,
            calibration: config.calibration,
        }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig {
            core: self.config,
            width: self.width,
            height: self.height,
            parallel: self.parallel,
            nonmax_suppression: self.nonmax_suppression,
            calibration: self.calibration,
            name: None,
            description: None,
            version: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn nonmax_enabled(&self) -> bool {
        self.nonmax_suppression
    }
}
