//! Panic and distress scoring

use crate::config::PanicConfig;
use feature_history::{stats, FeatureHistory};
use landmarks::LandmarkFrame;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tail sizes for the aggregate rates
const CONTACT_TAIL: usize = 10;
const FREQUENCY_TAIL: usize = 15;
const ERRATIC_TAIL: usize = 3;
const BREATHING_TAIL: usize = 30;

/// Boolean distress indicators, recomputed every frame from window
/// aggregates; never persisted across frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanicIndicatorSet {
    pub chest_clutching: bool,
    pub throat_touching: bool,
    pub frequent_chest_contact: bool,
    pub erratic_movement: bool,
    pub rapid_breathing: bool,
}

impl PanicIndicatorSet {
    /// No indicator set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Either hand-contact indicator set (drives the breathing-difficulty
    /// alert kind)
    pub fn hand_contact(&self) -> bool {
        self.chest_clutching || self.throat_touching
    }
}

/// Result of one panic evaluation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PanicEvaluation {
    /// Composite score in [0,1]
    pub score: f32,
    pub indicators: PanicIndicatorSet,
}

/// Scores panic/distress from hand placement, restless movement, and
/// breathing irregularity.
///
/// The composite score mixes contact rates in [0,1] with two raw-magnitude
/// terms rescaled by large constants (15x erratic, 200x breathing variance);
/// the clamp to [0,1] absorbs the non-normalized weight sum.
#[derive(Debug, Clone, Default)]
pub struct PanicScorer {
    config: PanicConfig,
}

impl PanicScorer {
    pub fn new(config: PanicConfig) -> Self {
        Self { config }
    }

    /// Evaluate the current panic score and indicator set.
    ///
    /// Returns a zero score and empty indicators when the frame has no body
    /// landmarks, and during cold start (fewer than the configured minimum
    /// of chest-distance samples).
    pub fn evaluate(&self, frame: &LandmarkFrame, history: &FeatureHistory) -> PanicEvaluation {
        if frame.body.is_none() {
            return PanicEvaluation::default();
        }
        if history.chest_distance().len() < self.config.min_samples {
            trace!(
                samples = history.chest_distance().len(),
                "panic cold start, insufficient contact history"
            );
            return PanicEvaluation::default();
        }

        let chest_rate = contact_rate(
            history.chest_distance().recent(CONTACT_TAIL),
            self.config.chest_touch_threshold,
        );
        let throat_rate = contact_rate(
            history.throat_distance().recent(CONTACT_TAIL),
            self.config.throat_touch_threshold,
        );

        // Contact of either hand with chest or throat over a longer tail;
        // both windows advance together so zipping keeps frames aligned
        let contact_frames: Vec<f32> = history
            .chest_distance()
            .recent(FREQUENCY_TAIL)
            .zip(history.throat_distance().recent(FREQUENCY_TAIL))
            .map(|(&chest, &throat)| {
                let contact = chest < self.config.chest_touch_threshold
                    || throat < self.config.throat_touch_threshold;
                if contact {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let hand_contact_rate = stats::mean(&contact_frames);

        let avg_erratic = (history.erratic_scores().len() >= ERRATIC_TAIL).then(|| {
            let tail: Vec<f32> = history.erratic_scores().recent(ERRATIC_TAIL).copied().collect();
            stats::mean(&tail)
        });

        let breathing_variance = (history.breathing().len() >= BREATHING_TAIL).then(|| {
            let tail: Vec<f32> = history.breathing().recent(BREATHING_TAIL).copied().collect();
            stats::variance(&tail)
        });

        let indicators = PanicIndicatorSet {
            chest_clutching: chest_rate > self.config.chest_rate_threshold,
            throat_touching: throat_rate > self.config.throat_rate_threshold,
            frequent_chest_contact: hand_contact_rate > self.config.contact_rate_threshold,
            erratic_movement: avg_erratic
                .map(|e| e > self.config.erratic_threshold)
                .unwrap_or(false),
            rapid_breathing: breathing_variance
                .map(|v| v > self.config.breathing_variance_threshold)
                .unwrap_or(false),
        };

        let score = chest_rate * 0.25
            + throat_rate * 0.25
            + hand_contact_rate * 0.2
            + avg_erratic.unwrap_or(0.0) * 15.0
            + breathing_variance.unwrap_or(0.0) * 200.0;

        PanicEvaluation {
            score: score.clamp(0.0, 1.0),
            indicators,
        }
    }
}

/// Fraction of samples below the contact threshold
fn contact_rate<'a>(distances: impl Iterator<Item = &'a f32>, threshold: f32) -> f32 {
    let flags: Vec<f32> = distances
        .map(|&d| if d < threshold { 1.0 } else { 0.0 })
        .collect();
    stats::mean(&flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::{BodyLandmark, BodyPose, Point2};

    /// Body with both wrists at the given point. Shoulders at y=0.3, hips at
    /// y=0.6, so the chest center sits at (0.5, 0.45) and the throat center
    /// at (0.5, 0.325).
    fn body_with_wrists(wrist: Point2) -> BodyPose {
        let mut body = BodyPose::new();
        body.set(BodyLandmark::Nose, Point2::new(0.5, 0.2))
            .set(BodyLandmark::LeftShoulder, Point2::new(0.4, 0.3))
            .set(BodyLandmark::RightShoulder, Point2::new(0.6, 0.3))
            .set(BodyLandmark::LeftHip, Point2::new(0.45, 0.6))
            .set(BodyLandmark::RightHip, Point2::new(0.55, 0.6))
            .set(BodyLandmark::LeftWrist, wrist)
            .set(BodyLandmark::RightWrist, wrist);
        body
    }

    fn frame(body: BodyPose) -> LandmarkFrame {
        LandmarkFrame::new(1280, 720).with_body(body)
    }

    const CHEST: Point2 = Point2 { x: 0.5, y: 0.45 };
    const HANDS_DOWN: Point2 = Point2 { x: 0.1, y: 0.9 };

    #[test]
    fn test_no_body_yields_zero_and_empty() {
        let scorer = PanicScorer::default();
        let history = FeatureHistory::new();
        let evaluation = scorer.evaluate(&LandmarkFrame::new(1280, 720), &history);
        assert_eq!(evaluation.score, 0.0);
        assert!(evaluation.indicators.is_empty());
    }

    #[test]
    fn test_cold_start_below_ten_samples() {
        let scorer = PanicScorer::default();
        let mut history = FeatureHistory::new();
        for _ in 0..9 {
            history.ingest(&frame(body_with_wrists(CHEST)));
        }
        let evaluation = scorer.evaluate(&frame(body_with_wrists(CHEST)), &history);
        assert_eq!(evaluation.score, 0.0);
        assert!(evaluation.indicators.is_empty());
    }

    #[test]
    fn test_sustained_chest_clutching() {
        let scorer = PanicScorer::default();
        let mut history = FeatureHistory::new();
        for _ in 0..10 {
            history.ingest(&frame(body_with_wrists(CHEST)));
        }
        let evaluation = scorer.evaluate(&frame(body_with_wrists(CHEST)), &history);

        assert!(evaluation.indicators.chest_clutching);
        assert!(evaluation.indicators.frequent_chest_contact);
        // Wrists on the chest are 0.125 from the throat center: no throat
        // contact
        assert!(!evaluation.indicators.throat_touching);
        // Static body: no erratic movement, and breathing history is still
        // short of 30 samples
        assert!(!evaluation.indicators.erratic_movement);
        assert!(!evaluation.indicators.rapid_breathing);

        // chest rate 1.0 * 0.25 + contact rate 1.0 * 0.2
        assert!((evaluation.score - 0.45).abs() < 1e-5, "score = {}", evaluation.score);
    }

    #[test]
    fn test_hands_down_scores_zero() {
        let scorer = PanicScorer::default();
        let mut history = FeatureHistory::new();
        for _ in 0..20 {
            history.ingest(&frame(body_with_wrists(HANDS_DOWN)));
        }
        let evaluation = scorer.evaluate(&frame(body_with_wrists(HANDS_DOWN)), &history);
        assert_eq!(evaluation.score, 0.0);
        assert!(evaluation.indicators.is_empty());
    }

    #[test]
    fn test_steady_breathing_is_not_rapid() {
        let scorer = PanicScorer::default();
        let mut history = FeatureHistory::new();
        // 30+ frames: breathing variance becomes computable and is 0 for a
        // constant shoulder separation
        for _ in 0..35 {
            history.ingest(&frame(body_with_wrists(CHEST)));
        }
        let evaluation = scorer.evaluate(&frame(body_with_wrists(CHEST)), &history);
        assert!(!evaluation.indicators.rapid_breathing);
        assert!(evaluation.indicators.chest_clutching);
    }
}
