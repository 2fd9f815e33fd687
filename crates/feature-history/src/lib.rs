//! Feature History Store
//!
//! Owns every per-metric sliding window for one monitoring session and turns
//! raw landmark frames into the derived motion and facial signals the
//! detectors read.

mod history;
pub mod stats;

pub use history::{BodyFeatures, DerivedFeatures, FaceFeatures, FeatureHistory};
