//! Landmark frame types and validation

use crate::geometry::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Landmark validation errors
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("frame dimensions must be nonzero (got {width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("{which} coordinate out of normalized range: ({x}, {y})")]
    OutOfRange { which: &'static str, x: f32, y: f32 },
}

/// Body landmarks the engine consumes (a subset of the estimator's pose set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLandmark {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
}

/// Facial points the stress scorer reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacePoint {
    LeftEyeTop,
    LeftEyeBottom,
    RightEyeTop,
    RightEyeBottom,
    MouthLeft,
    MouthRight,
    MouthTop,
    MouthBottom,
    NoseTip,
    NoseBridge,
    LeftCheek,
    RightCheek,
}

impl FacePoint {
    /// MediaPipe FaceMesh index for this point
    pub fn mesh_index(self) -> u16 {
        match self {
            FacePoint::LeftEyeTop => 159,
            FacePoint::LeftEyeBottom => 145,
            FacePoint::RightEyeTop => 386,
            FacePoint::RightEyeBottom => 374,
            FacePoint::MouthLeft => 61,
            FacePoint::MouthRight => 291,
            FacePoint::MouthTop => 13,
            FacePoint::MouthBottom => 14,
            FacePoint::NoseTip => 1,
            FacePoint::NoseBridge => 6,
            FacePoint::LeftCheek => 116,
            FacePoint::RightCheek => 345,
        }
    }

    /// Reverse lookup from a MediaPipe FaceMesh index
    pub fn from_mesh_index(index: u16) -> Option<Self> {
        let point = match index {
            159 => FacePoint::LeftEyeTop,
            145 => FacePoint::LeftEyeBottom,
            386 => FacePoint::RightEyeTop,
            374 => FacePoint::RightEyeBottom,
            61 => FacePoint::MouthLeft,
            291 => FacePoint::MouthRight,
            13 => FacePoint::MouthTop,
            14 => FacePoint::MouthBottom,
            1 => FacePoint::NoseTip,
            6 => FacePoint::NoseBridge,
            116 => FacePoint::LeftCheek,
            345 => FacePoint::RightCheek,
            _ => return None,
        };
        Some(point)
    }
}

/// Sparse body-landmark map for one frame; any point may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyPose {
    points: HashMap<BodyLandmark, Point2>,
}

impl BodyPose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, landmark: BodyLandmark, point: Point2) -> &mut Self {
        self.points.insert(landmark, point);
        self
    }

    pub fn get(&self, landmark: BodyLandmark) -> Option<Point2> {
        self.points.get(&landmark).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyLandmark, Point2)> + '_ {
        self.points.iter().map(|(k, v)| (*k, *v))
    }
}

/// Sparse face-landmark map for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceMesh {
    points: HashMap<FacePoint, Point2>,
}

impl FaceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, point: FacePoint, position: Point2) -> &mut Self {
        self.points.insert(point, position);
        self
    }

    pub fn get(&self, point: FacePoint) -> Option<Point2> {
        self.points.get(&point).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FacePoint, Point2)> + '_ {
        self.points.iter().map(|(k, v)| (*k, *v))
    }
}

/// Immutable landmark snapshot for one processed video frame.
///
/// Either sub-map may be absent (no body / no face detected that frame).
/// Coordinates are normalized; `width`/`height` carry the source frame's
/// pixel dimensions for pixel-space velocity math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkFrame {
    pub width: u32,
    pub height: u32,
    pub body: Option<BodyPose>,
    pub face: Option<FaceMesh>,
}

impl LandmarkFrame {
    /// Create an empty frame (no detections)
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: None,
            face: None,
        }
    }

    pub fn with_body(mut self, body: BodyPose) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_face(mut self, face: FaceMesh) -> Self {
        self.face = Some(face);
        self
    }

    /// Validate frame dimensions and normalized coordinate ranges
    pub fn validate(&self) -> Result<(), LandmarkError> {
        if self.width == 0 || self.height == 0 {
            return Err(LandmarkError::EmptyFrame {
                width: self.width,
                height: self.height,
            });
        }

        if let Some(body) = &self.body {
            for (_, p) in body.iter() {
                if !in_unit_range(p) {
                    return Err(LandmarkError::OutOfRange {
                        which: "body",
                        x: p.x,
                        y: p.y,
                    });
                }
            }
        }

        if let Some(face) = &self.face {
            for (_, p) in face.iter() {
                if !in_unit_range(p) {
                    return Err(LandmarkError::OutOfRange {
                        which: "face",
                        x: p.x,
                        y: p.y,
                    });
                }
            }
        }

        Ok(())
    }
}

fn in_unit_range(p: Point2) -> bool {
    p.x.is_finite() && p.y.is_finite() && (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_index_round_trip() {
        for point in [
            FacePoint::LeftEyeTop,
            FacePoint::RightEyeBottom,
            FacePoint::MouthTop,
            FacePoint::NoseBridge,
            FacePoint::RightCheek,
        ] {
            assert_eq!(FacePoint::from_mesh_index(point.mesh_index()), Some(point));
        }
        assert_eq!(FacePoint::from_mesh_index(999), None);
    }

    #[test]
    fn test_validate_accepts_normalized_frame() {
        let mut body = BodyPose::new();
        body.set(BodyLandmark::Nose, Point2::new(0.5, 0.2));
        let frame = LandmarkFrame::new(1280, 720).with_body(body);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let frame = LandmarkFrame::new(0, 720);
        assert!(matches!(
            frame.validate(),
            Err(LandmarkError::EmptyFrame { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_point() {
        let mut body = BodyPose::new();
        body.set(BodyLandmark::LeftWrist, Point2::new(1.5, 0.2));
        let frame = LandmarkFrame::new(1280, 720).with_body(body);
        assert!(matches!(
            frame.validate(),
            Err(LandmarkError::OutOfRange { which: "body", .. })
        ));
    }
}
