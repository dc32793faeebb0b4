//! Signal conditioning: level smoothing and perceptual LED mapping.

pub mod brightness;
pub mod smoothing;
