//! Sliding-window history store and per-frame feature derivation

use crate::stats;
use landmarks::{BodyLandmark, FacePoint, LandmarkFrame, Point2};
use serde::{Deserialize, Serialize};
use sliding_window::SlidingWindow;
use tracing::debug;

/// Eye openness below this is counted as a blink
const BLINK_OPENNESS_THRESHOLD: f32 = 0.01;

/// Samples of body-center displacement required before an erratic score
/// is produced
const ERRATIC_MIN_SAMPLES: usize = 5;

/// Per-frame motion features derived from body landmarks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyFeatures {
    /// Head (nose) position in pixel space
    pub head_px: Point2,
    /// Head displacement from the previous frame (pixels), if a previous
    /// position exists
    pub velocity: Option<f32>,
    /// Absolute frame-to-frame velocity delta, if two velocities exist
    pub acceleration: Option<f32>,
    /// Mean of shoulder and hip midpoints (normalized)
    pub body_center: Point2,
    /// Shoulder y-separation, the breathing proxy
    pub shoulder_separation: f32,
}

/// Per-frame facial features derived from face landmarks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FaceFeatures {
    /// Mean vertical eyelid gap of both eyes
    pub eye_openness: f32,
    /// Eye openness below the blink threshold this frame
    pub blink: bool,
    /// Mouth height / width ratio (0 when width is degenerate)
    pub mouth_ratio: f32,
    /// Nose-tip displacement from the previous face frame
    pub head_displacement: f32,
    /// Cheek-to-nose-bridge distance difference
    pub asymmetry: f32,
}

/// Features derived from one ingested frame; either side is absent when the
/// corresponding landmarks were not detected
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub body: Option<BodyFeatures>,
    pub face: Option<FaceFeatures>,
}

/// Sliding-window history for every tracked metric of one subject.
///
/// Mutated exactly once per frame via [`ingest`](FeatureHistory::ingest);
/// detectors only read window tails.
#[derive(Debug, Clone)]
pub struct FeatureHistory {
    // Motion (pixel space)
    head_positions: SlidingWindow<Point2>,
    head_velocity: SlidingWindow<f32>,
    head_acceleration: SlidingWindow<f32>,

    // Panic signals (normalized space)
    center_displacement: SlidingWindow<f32>,
    erratic_scores: SlidingWindow<f32>,
    breathing: SlidingWindow<f32>,
    chest_distance: SlidingWindow<f32>,
    throat_distance: SlidingWindow<f32>,

    // Stress signals
    eye_openness: SlidingWindow<f32>,
    blinks: SlidingWindow<bool>,
    mouth_ratio: SlidingWindow<f32>,
    head_movement: SlidingWindow<f32>,
    asymmetry: SlidingWindow<f32>,

    prev_body_center: Option<Point2>,
    prev_nose_tip: Option<Point2>,
}

impl Default for FeatureHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureHistory {
    pub fn new() -> Self {
        Self {
            head_positions: SlidingWindow::new(30),
            head_velocity: SlidingWindow::new(10),
            head_acceleration: SlidingWindow::new(5),
            center_displacement: SlidingWindow::new(30),
            erratic_scores: SlidingWindow::new(20),
            breathing: SlidingWindow::new(60),
            chest_distance: SlidingWindow::new(20),
            throat_distance: SlidingWindow::new(20),
            eye_openness: SlidingWindow::new(30),
            blinks: SlidingWindow::new(30),
            mouth_ratio: SlidingWindow::new(30),
            head_movement: SlidingWindow::new(30),
            asymmetry: SlidingWindow::new(30),
            prev_body_center: None,
            prev_nose_tip: None,
        }
    }

    /// Ingest one frame, appending to every window whose inputs are present.
    ///
    /// Absent body or face landmarks leave the corresponding windows
    /// untouched; there is no padding or interpolation.
    pub fn ingest(&mut self, frame: &LandmarkFrame) -> DerivedFeatures {
        DerivedFeatures {
            body: frame.body.as_ref().and_then(|body| {
                let features = self.ingest_body(frame, body);
                if features.is_none() {
                    debug!("body landmarks incomplete, skipping motion windows");
                }
                features
            }),
            face: frame.face.as_ref().and_then(|face| {
                let features = self.ingest_face(face);
                if features.is_none() {
                    debug!("face landmarks incomplete, skipping facial windows");
                }
                features
            }),
        }
    }

    fn ingest_body(
        &mut self,
        frame: &LandmarkFrame,
        body: &landmarks::BodyPose,
    ) -> Option<BodyFeatures> {
        let nose = body.get(BodyLandmark::Nose)?;
        let left_shoulder = body.get(BodyLandmark::LeftShoulder)?;
        let right_shoulder = body.get(BodyLandmark::RightShoulder)?;
        let left_hip = body.get(BodyLandmark::LeftHip)?;
        let right_hip = body.get(BodyLandmark::RightHip)?;

        // Head position and derivatives, in pixel space
        let head_px = nose.to_pixels(frame.width, frame.height);
        let velocity = self.head_positions.back().map(|prev| head_px.distance(*prev));
        self.head_positions.push(head_px);

        let acceleration = velocity.and_then(|v| {
            let a = self.head_velocity.back().map(|prev| (v - prev).abs());
            self.head_velocity.push(v);
            a
        });
        if let Some(a) = acceleration {
            self.head_acceleration.push(a);
        }

        // Body center and restless-movement displacement
        let shoulder_center = left_shoulder.midpoint(right_shoulder);
        let hip_center = left_hip.midpoint(right_hip);
        let body_center = shoulder_center.midpoint(hip_center);

        let displacement = self
            .prev_body_center
            .map(|prev| body_center.distance(prev))
            .unwrap_or(0.0);
        self.prev_body_center = Some(body_center);
        self.center_displacement.push(displacement);

        if self.center_displacement.len() >= ERRATIC_MIN_SAMPLES {
            let tail: Vec<f32> = self
                .center_displacement
                .recent(ERRATIC_MIN_SAMPLES)
                .copied()
                .collect();
            self.erratic_scores.push(stats::std_dev(&tail));
        }

        // Breathing proxy
        let shoulder_separation = (left_shoulder.y - right_shoulder.y).abs();
        self.breathing.push(shoulder_separation);

        // Hand-to-chest / hand-to-throat distances need both wrists
        if let (Some(left_wrist), Some(right_wrist)) = (
            body.get(BodyLandmark::LeftWrist),
            body.get(BodyLandmark::RightWrist),
        ) {
            let throat_center = nose.midpoint(body_center);
            self.chest_distance.push(
                left_wrist
                    .distance(body_center)
                    .min(right_wrist.distance(body_center)),
            );
            self.throat_distance.push(
                left_wrist
                    .distance(throat_center)
                    .min(right_wrist.distance(throat_center)),
            );
        }

        Some(BodyFeatures {
            head_px,
            velocity,
            acceleration,
            body_center,
            shoulder_separation,
        })
    }

    fn ingest_face(&mut self, face: &landmarks::FaceMesh) -> Option<FaceFeatures> {
        let left_eye_top = face.get(FacePoint::LeftEyeTop)?;
        let left_eye_bottom = face.get(FacePoint::LeftEyeBottom)?;
        let right_eye_top = face.get(FacePoint::RightEyeTop)?;
        let right_eye_bottom = face.get(FacePoint::RightEyeBottom)?;
        let mouth_left = face.get(FacePoint::MouthLeft)?;
        let mouth_right = face.get(FacePoint::MouthRight)?;
        let mouth_top = face.get(FacePoint::MouthTop)?;
        let mouth_bottom = face.get(FacePoint::MouthBottom)?;
        let nose_tip = face.get(FacePoint::NoseTip)?;
        let nose_bridge = face.get(FacePoint::NoseBridge)?;
        let left_cheek = face.get(FacePoint::LeftCheek)?;
        let right_cheek = face.get(FacePoint::RightCheek)?;

        let left_gap = (left_eye_top.y - left_eye_bottom.y).abs();
        let right_gap = (right_eye_top.y - right_eye_bottom.y).abs();
        let eye_openness = (left_gap + right_gap) / 2.0;
        let blink = eye_openness < BLINK_OPENNESS_THRESHOLD;
        self.eye_openness.push(eye_openness);
        self.blinks.push(blink);

        // Zero-width mouth degrades to ratio 0 rather than dividing by zero
        let mouth_width = (mouth_left.x - mouth_right.x).abs();
        let mouth_height = (mouth_top.y - mouth_bottom.y).abs();
        let mouth_ratio = if mouth_width > 0.0 {
            mouth_height / mouth_width
        } else {
            0.0
        };
        self.mouth_ratio.push(mouth_ratio);

        let head_displacement = self
            .prev_nose_tip
            .map(|prev| nose_tip.distance(prev))
            .unwrap_or(0.0);
        self.prev_nose_tip = Some(nose_tip);
        self.head_movement.push(head_displacement);

        let asymmetry =
            (left_cheek.distance(nose_bridge) - right_cheek.distance(nose_bridge)).abs();
        self.asymmetry.push(asymmetry);

        Some(FaceFeatures {
            eye_openness,
            blink,
            mouth_ratio,
            head_displacement,
            asymmetry,
        })
    }

    /// Clear every window and remembered position; the next ingested frame
    /// behaves like the first frame of a new session
    pub fn reset(&mut self) {
        debug!("resetting feature history");
        self.head_positions.clear();
        self.head_velocity.clear();
        self.head_acceleration.clear();
        self.center_displacement.clear();
        self.erratic_scores.clear();
        self.breathing.clear();
        self.chest_distance.clear();
        self.throat_distance.clear();
        self.eye_openness.clear();
        self.blinks.clear();
        self.mouth_ratio.clear();
        self.head_movement.clear();
        self.asymmetry.clear();
        self.prev_body_center = None;
        self.prev_nose_tip = None;
    }

    pub fn head_velocity(&self) -> &SlidingWindow<f32> {
        &self.head_velocity
    }

    pub fn head_acceleration(&self) -> &SlidingWindow<f32> {
        &self.head_acceleration
    }

    pub fn erratic_scores(&self) -> &SlidingWindow<f32> {
        &self.erratic_scores
    }

    pub fn breathing(&self) -> &SlidingWindow<f32> {
        &self.breathing
    }

    pub fn chest_distance(&self) -> &SlidingWindow<f32> {
        &self.chest_distance
    }

    pub fn throat_distance(&self) -> &SlidingWindow<f32> {
        &self.throat_distance
    }

    pub fn eye_openness(&self) -> &SlidingWindow<f32> {
        &self.eye_openness
    }

    pub fn blinks(&self) -> &SlidingWindow<bool> {
        &self.blinks
    }

    pub fn mouth_ratio(&self) -> &SlidingWindow<f32> {
        &self.mouth_ratio
    }

    pub fn head_movement(&self) -> &SlidingWindow<f32> {
        &self.head_movement
    }

    pub fn asymmetry(&self) -> &SlidingWindow<f32> {
        &self.asymmetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::{BodyPose, FaceMesh};

    fn upright_body(nose_y: f32) -> BodyPose {
        let mut body = BodyPose::new();
        body.set(BodyLandmark::Nose, Point2::new(0.5, nose_y))
            .set(BodyLandmark::LeftShoulder, Point2::new(0.4, 0.3))
            .set(BodyLandmark::RightShoulder, Point2::new(0.6, 0.3))
            .set(BodyLandmark::LeftHip, Point2::new(0.45, 0.6))
            .set(BodyLandmark::RightHip, Point2::new(0.55, 0.6))
            .set(BodyLandmark::LeftWrist, Point2::new(0.2, 0.5))
            .set(BodyLandmark::RightWrist, Point2::new(0.8, 0.5));
        body
    }

    fn neutral_face() -> FaceMesh {
        let mut face = FaceMesh::new();
        face.set(FacePoint::LeftEyeTop, Point2::new(0.4, 0.30))
            .set(FacePoint::LeftEyeBottom, Point2::new(0.4, 0.33))
            .set(FacePoint::RightEyeTop, Point2::new(0.6, 0.30))
            .set(FacePoint::RightEyeBottom, Point2::new(0.6, 0.33))
            .set(FacePoint::MouthLeft, Point2::new(0.45, 0.5))
            .set(FacePoint::MouthRight, Point2::new(0.55, 0.5))
            .set(FacePoint::MouthTop, Point2::new(0.5, 0.49))
            .set(FacePoint::MouthBottom, Point2::new(0.5, 0.51))
            .set(FacePoint::NoseTip, Point2::new(0.5, 0.4))
            .set(FacePoint::NoseBridge, Point2::new(0.5, 0.35))
            .set(FacePoint::LeftCheek, Point2::new(0.35, 0.4))
            .set(FacePoint::RightCheek, Point2::new(0.65, 0.4));
        face
    }

    #[test]
    fn test_absent_body_leaves_windows_untouched() {
        let mut history = FeatureHistory::new();
        let frame = LandmarkFrame::new(1280, 720).with_face(neutral_face());
        let features = history.ingest(&frame);
        assert!(features.body.is_none());
        assert!(features.face.is_some());
        assert!(history.head_velocity().is_empty());
        assert!(history.breathing().is_empty());
        assert_eq!(history.blinks().len(), 1);
    }

    #[test]
    fn test_velocity_and_acceleration_derivation() {
        let mut history = FeatureHistory::new();
        // Nose moves 0.1 normalized per frame: 128 px at 1280 width... use y
        for (i, y) in [0.10, 0.20, 0.40].iter().enumerate() {
            let frame = LandmarkFrame::new(1000, 1000).with_body(upright_body(*y));
            let features = history.ingest(&frame);
            let body = features.body.expect("body features");
            match i {
                0 => {
                    assert!(body.velocity.is_none());
                    assert!(body.acceleration.is_none());
                }
                1 => {
                    assert!((body.velocity.unwrap() - 100.0).abs() < 0.5);
                    assert!(body.acceleration.is_none());
                }
                _ => {
                    assert!((body.velocity.unwrap() - 200.0).abs() < 0.5);
                    assert!((body.acceleration.unwrap() - 100.0).abs() < 1.0);
                }
            }
        }
        assert_eq!(history.head_velocity().len(), 2);
        assert_eq!(history.head_acceleration().len(), 1);
    }

    #[test]
    fn test_missing_wrists_skip_contact_windows_only() {
        let mut history = FeatureHistory::new();
        let full = upright_body(0.2);
        let mut body = BodyPose::new();
        for (landmark, point) in full.iter() {
            if !matches!(
                landmark,
                BodyLandmark::LeftWrist | BodyLandmark::RightWrist
            ) {
                body.set(landmark, point);
            }
        }
        let frame = LandmarkFrame::new(1280, 720).with_body(body);
        let features = history.ingest(&frame);
        assert!(features.body.is_some());
        assert!(history.chest_distance().is_empty());
        assert!(history.throat_distance().is_empty());
        assert_eq!(history.breathing().len(), 1);
    }

    #[test]
    fn test_blink_flag_from_closed_eyes() {
        let mut history = FeatureHistory::new();
        let mut face = neutral_face();
        face.set(FacePoint::LeftEyeBottom, Point2::new(0.4, 0.301))
            .set(FacePoint::RightEyeBottom, Point2::new(0.6, 0.301));
        let frame = LandmarkFrame::new(1280, 720).with_face(face);
        let features = history.ingest(&frame);
        assert!(features.face.unwrap().blink);
        assert_eq!(history.blinks().back(), Some(&true));
    }

    #[test]
    fn test_zero_width_mouth_degrades_to_zero_ratio() {
        let mut history = FeatureHistory::new();
        let mut face = neutral_face();
        face.set(FacePoint::MouthLeft, Point2::new(0.5, 0.5))
            .set(FacePoint::MouthRight, Point2::new(0.5, 0.5));
        let frame = LandmarkFrame::new(1280, 720).with_face(face);
        let features = history.ingest(&frame);
        assert_eq!(features.face.unwrap().mouth_ratio, 0.0);
    }

    #[test]
    fn test_erratic_score_needs_five_displacements() {
        let mut history = FeatureHistory::new();
        for _ in 0..4 {
            let frame = LandmarkFrame::new(1280, 720).with_body(upright_body(0.2));
            history.ingest(&frame);
        }
        assert!(history.erratic_scores().is_empty());
        let frame = LandmarkFrame::new(1280, 720).with_body(upright_body(0.2));
        history.ingest(&frame);
        assert_eq!(history.erratic_scores().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut history = FeatureHistory::new();
        for _ in 0..10 {
            let frame = LandmarkFrame::new(1280, 720)
                .with_body(upright_body(0.2))
                .with_face(neutral_face());
            history.ingest(&frame);
        }
        history.reset();
        assert!(history.head_velocity().is_empty());
        assert!(history.blinks().is_empty());
        assert!(history.chest_distance().is_empty());
        assert!(history.erratic_scores().is_empty());

        // First frame after reset behaves like the very first frame
        let frame = LandmarkFrame::new(1280, 720).with_body(upright_body(0.2));
        let features = history.ingest(&frame);
        assert!(features.body.unwrap().velocity.is_none());
    }
}
