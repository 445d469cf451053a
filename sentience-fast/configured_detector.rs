use sentience_core::{Corner, CornerSet, MonoImage};
use crate::error::FastResult;
use crate::detector::FastDetector;
use crate::builder::DetectorBuilder;

/// A detector that has been configured with a specific builder.
///
/// Holds a `FastDetector` and the `DetectorBuilder` it came from, so the
/// suppression switch and the configuration summary travel with it.
#[derive(Debug, Clone)]
pub struct ConfiguredDetector {
    pub(crate) detector: FastDetector,
    pub(crate) config: DetectorBuilder,
}

impl ConfiguredDetector {
    /// Detect scored corners, suppressed if the builder enabled it.
    ///
    /// # Arguments
    /// * `img` - Single-channel image matching the configured dimensions.
    ///
    /// # Returns
    /// A `FastResult` containing a raster-ordered `CornerSet`.
    pub fn detect_corners(&self, img: &MonoImage) -> FastResult<CornerSet> {
        if self.config.nonmax_enabled() {
            self.detector.detect_nonmax(img)
        } else {
            Ok(CornerSet::from_corners(self.detector.detect_with_score(img)?))
        }
    }

    /// Detect corners with their scores, without suppression.
    pub fn detect_with_score(&self, img: &MonoImage) -> FastResult<Vec<Corner>> {
        self.detector.detect_with_score(img)
    }

    /// Get a reference to the underlying `FastDetector`.
    pub fn detector(&self) -> &FastDetector {
        &self.detector
    }

    /// Get a summary of the detector's configuration.
    pub fn config_summary(&self) -> String {
        self.config.summary()
    }

    /// Get the image dimensions (width, height) the detector is configured for.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.config.width(), self.config.height())
    }
}
