use sentience_core::{FastVariant, FeatureConfig};
use crate::error::{FastError, FastResult};
use crate::builder::DetectorBuilder;
use crate::types::CalibrationOffset;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Complete detector configuration with all settings
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Barrier, arc variant and thread count
    pub core: FeatureConfig,
    /// Image dimensions
    pub width: usize,
    pub height: usize,
    /// Row-parallel detection
    pub parallel: bool,
    /// Run non-maximal suppression after scoring
    pub nonmax_suppression: bool,
    /// Offset applied to suppression survivors
    #[cfg_attr(feature = "serde", serde(default))]
    pub calibration: CalibrationOffset,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,
}

impl DetectorConfig {
    /// Create new configuration with default settings
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            core: FeatureConfig {
                barrier: 20,
                variant: FastVariant::Nine,
                n_threads: 1,
            },
            width,
            height,
            parallel: cfg!(feature = "parallel"),
            nonmax_suppression: true,
            calibration: CalibrationOffset::default(),
            name: None,
            description: None,
            version: None,
        }
    }

    /// Low barrier for dim or low-contrast scenes
    pub fn sensitive_preset(width: usize, height: usize) -> Self {
        Self {
            core: FeatureConfig {
                barrier: 12,
                variant: FastVariant::Nine,
                n_threads: num_cpus::get(),
            },
            parallel: true,
            name: Some("Sensitive".to_string()),
            description: Some("Low barrier, FAST-9, for low-contrast scenes".to_string()),
            version: Some("1.0".to_string()),
            ..Self::new(width, height)
        }
    }

    /// Defaults used by the stereo front end
    pub fn balanced_preset(width: usize, height: usize) -> Self {
        Self {
            core: FeatureConfig {
                barrier: 20,
                variant: FastVariant::Nine,
                n_threads: num_cpus::get(),
            },
            parallel: true,
            name: Some("Balanced".to_string()),
            description: Some("Moderate barrier, FAST-9".to_string()),
            version: Some("1.0".to_string()),
            ..Self::new(width, height)
        }
    }

    /// High barrier with the longer arc, fewer but more stable corners
    pub fn strict_preset(width: usize, height: usize) -> Self {
        Self {
            core: FeatureConfig {
                barrier: 35,
                variant: FastVariant::Ten,
                n_threads: num_cpus::get(),
            },
            parallel: true,
            name: Some("Strict".to_string()),
            description: Some("High barrier, FAST-10, for cluttered scenes".to_string()),
            version: Some("1.0".to_string()),
            ..Self::new(width, height)
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "DetectorConfig: {}x{}, barrier={}, arc={}, parallel={}, nms={}, calibration=({:.2}, {:.2})",
            self.width, self.height, self.core.barrier, self.core.variant.arc_length(),
            self.parallel, self.nonmax_suppression, self.calibration.x, self.calibration.y
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> FastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FastError::InvalidImageSize { width: self.width, height: self.height });
        }
        if self.core.barrier == 0 || self.core.barrier > 127 {
            return Err(FastError::InvalidBarrier(self.core.barrier));
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for cfg in [
            DetectorConfig::new(64, 48),
            DetectorConfig::sensitive_preset(64, 48),
            DetectorConfig::balanced_preset(64, 48),
            DetectorConfig::strict_preset(64, 48),
        ] {
            assert!(cfg.validate().is_ok(), "{}", cfg.summary());
        }
        assert_eq!(DetectorConfig::strict_preset(8, 8).core.variant, FastVariant::Ten);
    }

    #[test]
    fn test_validate_rejects_bad_barrier() {
        let mut cfg = DetectorConfig::new(64, 48);
        cfg.core.barrier = 0;
        assert!(matches!(cfg.validate(), Err(FastError::InvalidBarrier(0))));
    }

    #[test]
    fn test_summary_mentions_arc() {
        let summary = DetectorConfig::strict_preset(320, 240).summary();
        assert!(summary.contains("320x240"));
        assert!(summary.contains("arc=10"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_and_toml_round_trip() {
        let cfg = DetectorConfig::balanced_preset(320, 240)
            .with_metadata("Rig", "left camera");
        let from_json = DetectorConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(from_json.core.barrier, 20);
        assert_eq!(from_json.name.as_deref(), Some("Rig"));

        let from_toml = DetectorConfig::from_toml(&cfg.to_toml().unwrap()).unwrap();
        assert_eq!(from_toml.width, 320);
        assert_eq!(from_toml.core.variant, FastVariant::Nine);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_invalid_json_barrier_rejected() {
        let mut cfg = DetectorConfig::new(10, 10);
        cfg.core.barrier = 0;
        let json = cfg.to_json().unwrap();
        assert!(DetectorConfig::from_json(&json).is_err());
    }
}
