//! Line structure over detected corners: which corner pairs are joined by a
//! line, which of those lines sit on the horizon, and the tilt they imply.

pub mod verifier;
pub mod horizon;
pub mod gravity;

pub use verifier::LineVerifier;
pub use horizon::{classify, horizon_detection, is_on_horizon, HorizonEstimate};
pub use gravity::{gravity_direction, orientation_histogram, smooth_histogram, ORIENTATION_BINS};
