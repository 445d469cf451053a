#[derive(Debug, Clone)]
pub enum FastError {
    InvalidImageSize { width: usize, height: usize },
    DimensionMismatch { expected: (usize, usize), actual: (usize, usize) },
    InvalidBarrier(u8),
    ImageTooSmall { width: usize, height: usize, min_size: usize },
}

impl std::fmt::Display for FastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FastError::InvalidImageSize { width, height } => {
                write!(f, "Invalid image dimensions: {}x{} (must be > 0)", width, height)
            }
            FastError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Image dimension mismatch: detector expects {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            FastError::InvalidBarrier(b) => {
                write!(f, "Invalid barrier: {} (must be 1-127)", b)
            }
            FastError::ImageTooSmall { width, height, min_size } => {
                write!(f, "Image {}x{} too small (minimum {}x{})", width, height, min_size, min_size)
            }
        }
    }
}

impl std::error::Error for FastError {}

pub type FastResult<T> = Result<T, FastError>;
