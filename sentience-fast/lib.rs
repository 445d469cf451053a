//! Segment-test corner detection, scoring and raster non-maximal suppression.
//!
//! The entry points are [`FastDetector`] for direct use and
//! [`DetectorBuilder`] / [`DetectorConfig`] when the detector is assembled
//! from presets or a configuration file.

pub mod error;
pub mod types;
pub mod utils;
pub mod corner_detection;
pub mod nms;
pub mod detector;
pub mod config;
pub mod builder;
pub mod configured_detector;

pub use error::{FastError, FastResult};
pub use types::{CalibrationOffset, CornerType};
pub use corner_detection::CornerDetector;
pub use nms::{RasterNms, MIN_CORNERS};
pub use detector::FastDetector;
pub use config::DetectorConfig;
pub use builder::DetectorBuilder;
pub use configured_detector::ConfiguredDetector;
