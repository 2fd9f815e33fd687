//! Landmark Frame Types
//!
//! Per-frame body and face landmark snapshots produced by an external pose
//! estimator, plus the 2D geometry helpers the detectors share.

mod frame;
mod geometry;

pub use frame::{BodyLandmark, BodyPose, FaceMesh, FacePoint, LandmarkError, LandmarkFrame};
pub use geometry::{angle_from_vertical_deg, Point2};
