use sentience_core::{Corner, CornerSet, FeatureConfig, MonoImage};
use crate::corner_detection::CornerDetector;
use crate::error::{FastError, FastResult};
use crate::nms::RasterNms;
use crate::types::CalibrationOffset;

/// Segment-test corner detector bound to one image size
#[derive(Debug, Clone)]
pub struct FastDetector {
    cfg: FeatureConfig,
    w: usize,
    h: usize,
    parallel: bool,
    nms: RasterNms,
}

impl FastDetector {
    /// Creates a new detector with validation
    pub fn new(cfg: FeatureConfig, width: usize, height: usize) -> FastResult<Self> {
        // Validate dimensions
        if width == 0 || height == 0 {
            return Err(FastError::InvalidImageSize { width, height });
        }

        // The circle needs a 3-pixel border on each side
        const MIN_SIZE: usize = 2 * CornerDetector::BORDER + 1;
        if width < MIN_SIZE || height < MIN_SIZE {
            return Err(FastError::ImageTooSmall {
                width, height, min_size: MIN_SIZE
            });
        }

        // 0 would make every textured pixel a corner, >127 leaves no usable band
        if cfg.barrier == 0 || cfg.barrier > 127 {
            return Err(FastError::InvalidBarrier(cfg.barrier));
        }

        Ok(Self {
            cfg,
            w: width,
            h: height,
            parallel: cfg!(feature = "parallel"),
            nms: RasterNms::new(width, height),
        })
    }

    /// Offset applied to corners that survive suppression
    pub fn with_calibration(mut self, calibration: CalibrationOffset) -> Self {
        self.nms = self.nms.with_calibration(calibration);
        self
    }

    /// Toggle row-parallel detection
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates image dimensions before processing
    fn validate_image(&self, img: &MonoImage) -> FastResult<()> {
        if img.width() != self.w || img.height() != self.h {
            return Err(FastError::DimensionMismatch {
                expected: (self.w, self.h),
                actual: (img.width(), img.height()),
            });
        }
        Ok(())
    }

    /// Raw segment-test corners in raster order, unscored
    pub fn detect(&self, img: &MonoImage) -> FastResult<Vec<Corner>> {
        self.validate_image(img)?;
        Ok(CornerDetector::detect(img, self.cfg.barrier, self.cfg.variant, self.parallel))
    }

    /// Corners with their strength scores
    pub fn detect_with_score(&self, img: &MonoImage) -> FastResult<Vec<Corner>> {
        let mut corners = self.detect(img)?;
        CornerDetector::score_corners(img, &mut corners, self.cfg.barrier, self.parallel);
        Ok(corners)
    }

    /// Scored corners after non-maximal suppression and calibration
    pub fn detect_nonmax(&self, img: &MonoImage) -> FastResult<CornerSet> {
        let scored = CornerSet::from_corners(self.detect_with_score(img)?);
        Ok(self.nms.suppress(&scored))
    }

    /// Apply non-maximal suppression to an already scored set
    pub fn non_maximum_suppression(&self, corners: &CornerSet) -> CornerSet {
        self.nms.suppress(corners)
    }

    /// Strength of a single pixel
    pub fn score(&self, img: &MonoImage, x: i32, y: i32) -> FastResult<i32> {
        self.validate_image(img)?;
        Ok(CornerDetector::score(img, x, y, self.cfg.barrier))
    }

    /// Get detector configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.cfg
    }

    /// Get image dimensions
    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn calibration(&self) -> CalibrationOffset {
        self.nms.calibration()
    }
}
