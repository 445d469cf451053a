use sentience_core::MonoImage;
use sentience_fast::FastError;

pub mod config;
pub mod pipeline;

pub use config::{ConstellationSection, DetectorSection, DirectionSection, LinesSection, PipelineConfig};
pub use pipeline::{FeatureFrame, FeaturePipeline};
pub use sentience_core::{self, Corner, CornerId, CornerSet, Line};

#[derive(Debug)]
pub enum SentienceError {
    Fast(FastError),
    ThreadPool(rayon::ThreadPoolBuildError),
    Image(image::ImageError),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
    Config(String),
}

impl std::fmt::Display for SentienceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentienceError::Fast(e) => write!(f, "Detector error: {}", e),
            SentienceError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            SentienceError::Image(e) => write!(f, "Image error: {}", e),
            SentienceError::Toml(e) => write!(f, "Config parse error: {}", e),
            SentienceError::Json(e) => write!(f, "JSON error: {}", e),
            SentienceError::Io(e) => write!(f, "I/O error: {}", e),
            SentienceError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for SentienceError {}

impl From<FastError> for SentienceError {
    fn from(err: FastError) -> Self {
        SentienceError::Fast(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for SentienceError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        SentienceError::ThreadPool(err)
    }
}

impl From<image::ImageError> for SentienceError {
    fn from(err: image::ImageError) -> Self {
        SentienceError::Image(err)
    }
}

impl From<toml::de::Error> for SentienceError {
    fn from(err: toml::de::Error) -> Self {
        SentienceError::Toml(err)
    }
}

impl From<serde_json::Error> for SentienceError {
    fn from(err: serde_json::Error) -> Self {
        SentienceError::Json(err)
    }
}

impl From<std::io::Error> for SentienceError {
    fn from(err: std::io::Error) -> Self {
        SentienceError::Io(err)
    }
}

pub type SentienceResult<T> = Result<T, SentienceError>;

/// Reduce a colour image to one channel by averaging R, G and B
pub fn mono_from_rgb(img: &image::RgbImage) -> MonoImage {
    let (w, h) = img.dimensions();
    let mut mono = MonoImage::filled(w as usize, h as usize, 0);
    for (x, y, p) in img.enumerate_pixels() {
        let [r, g, b] = p.0;
        let mean = (r as u16 + g as u16 + b as u16) / 3;
        mono.set(x as usize, y as usize, mean as u8);
    }
    mono
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_from_rgb_averages_channels() {
        let mut rgb = image::RgbImage::new(3, 2);
        rgb.put_pixel(0, 0, image::Rgb([30, 60, 90]));
        rgb.put_pixel(2, 1, image::Rgb([255, 255, 254]));
        let mono = mono_from_rgb(&rgb);
        assert_eq!((mono.width(), mono.height()), (3, 2));
        assert_eq!(mono.at(0, 0), 60);
        assert_eq!(mono.at(2, 1), 254);
        assert_eq!(mono.at(1, 1), 0);
    }

    #[test]
    fn test_error_display_and_conversion() {
        let err: SentienceError = FastError::InvalidBarrier(0).into();
        assert!(err.to_string().starts_with("Detector error"));

        let err: SentienceError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, SentienceError::Io(_)));
    }
}
