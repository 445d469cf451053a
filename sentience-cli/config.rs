use serde::{Deserialize, Serialize};
use sentience_core::{FastVariant, DEFAULT_CONSTELLATION_HALF_SIZE};
use sentience_fast::{CalibrationOffset, DetectorBuilder};
use std::path::Path;

use crate::{SentienceError, SentienceResult};

/// Corner detection and suppression settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSection {
    pub barrier: u8,
    pub arc_length: usize,
    pub parallel: bool,
    pub nonmax_suppression: bool,
    pub calibration: CalibrationOffset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for DetectorSection {
    fn default() -> Self {
        Self {
            barrier: 20,
            arc_length: 9,
            parallel: true,
            nonmax_suppression: true,
            calibration: CalibrationOffset::default(),
            threads: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationSection {
    pub half_size: usize,
    pub max_x_diff: i32,
    pub max_y_diff: i32,
}

impl Default for ConstellationSection {
    fn default() -> Self {
        Self {
            half_size: DEFAULT_CONSTELLATION_HALF_SIZE,
            max_x_diff: 40,
            max_y_diff: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionSection {
    pub radius: i32,
    pub stride: usize,
}

impl Default for DirectionSection {
    fn default() -> Self {
        Self { radius: 10, stride: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinesSection {
    pub enabled: bool,
    pub line_threshold: i32,
    pub min_length: i32,
    pub samples: usize,
    pub radius: i32,
}

impl Default for LinesSection {
    fn default() -> Self {
        Self {
            enabled: true,
            line_threshold: 20,
            min_length: 20,
            samples: 100,
            radius: 10,
        }
    }
}

/// Settings for every pipeline stage, loadable from TOML.
///
/// Missing sections and keys fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub detector: DetectorSection,
    pub constellation: ConstellationSection,
    pub direction: DirectionSection,
    pub lines: LinesSection,
}

impl PipelineConfig {
    pub fn load_toml<P: AsRef<Path>>(path: P) -> SentienceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> SentienceResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> SentienceResult<()> {
        let d = &self.detector;
        if d.barrier == 0 || d.barrier > 127 {
            return Err(SentienceError::Config(format!("barrier {} outside 1-127", d.barrier)));
        }
        if FastVariant::from_arc_length(d.arc_length).is_none() {
            return Err(SentienceError::Config(format!("arc length {} is not 9 or 10", d.arc_length)));
        }
        if d.threads == Some(0) {
            return Err(SentienceError::Config("threads must be at least 1".to_string()));
        }
        let c = &self.constellation;
        if c.max_x_diff <= 0 || c.max_y_diff <= 0 {
            return Err(SentienceError::Config(format!(
                "constellation window {}x{} must be positive",
                c.max_x_diff, c.max_y_diff
            )));
        }
        if self.direction.radius < 0 {
            return Err(SentienceError::Config(format!("direction radius {} is negative", self.direction.radius)));
        }
        let l = &self.lines;
        if l.samples == 0 || l.radius < 0 {
            return Err(SentienceError::Config(format!(
                "line samples {} and radius {} must be positive",
                l.samples, l.radius
            )));
        }
        Ok(())
    }

    /// Detector builder for an image of the given size
    pub fn detector_builder(&self, width: usize, height: usize) -> DetectorBuilder {
        let d = &self.detector;
        let builder = DetectorBuilder::new(width, height)
            .barrier(d.barrier)
            .arc_length(d.arc_length)
            .parallel(d.parallel)
            .nonmax_suppression(d.nonmax_suppression)
            .calibration(d.calibration);
        match d.threads {
            Some(n) => builder.threads(n),
            None => builder,
        }
    }
}
