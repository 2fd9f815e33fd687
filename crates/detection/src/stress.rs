//! Facial stress scoring

use crate::config::StressConfig;
use feature_history::{stats, FeatureHistory};
use landmarks::LandmarkFrame;
use tracing::trace;

/// Window tail sizes used by the aggregate terms
const BLINK_TAIL: usize = 30;
const INDICATOR_TAIL: usize = 10;

/// Blink rate above this (blinks per 30 frames) starts contributing stress
const BLINK_RATE_BASELINE: f32 = 20.0;

/// Scores facial stress in [0,1] from four weighted indicators:
/// blink rate, mouth tension, head movement, and facial asymmetry.
#[derive(Debug, Clone, Default)]
pub struct StressScorer {
    config: StressConfig,
}

impl StressScorer {
    pub fn new(config: StressConfig) -> Self {
        Self { config }
    }

    /// Evaluate the current stress score.
    ///
    /// Returns 0 when the frame has no face landmarks, and 0 during cold
    /// start (fewer than the configured minimum of blink samples).
    pub fn evaluate(&self, frame: &LandmarkFrame, history: &FeatureHistory) -> f32 {
        if frame.face.is_none() {
            return 0.0;
        }
        if history.blinks().len() < self.config.min_samples {
            trace!(
                samples = history.blinks().len(),
                "stress cold start, insufficient blink history"
            );
            return 0.0;
        }

        let blink_flags: Vec<f32> = history
            .blinks()
            .recent(BLINK_TAIL)
            .map(|&b| if b { 1.0 } else { 0.0 })
            .collect();
        let blink_rate = stats::mean(&blink_flags) * 30.0;
        let blink_stress = ((blink_rate - BLINK_RATE_BASELINE) / 10.0).max(0.0);

        let mouth: Vec<f32> = history.mouth_ratio().recent(INDICATOR_TAIL).copied().collect();
        let tension_stress = (stats::mean(&mouth) * 10.0).min(1.0);

        let movement: Vec<f32> = history
            .head_movement()
            .recent(INDICATOR_TAIL)
            .copied()
            .collect();
        let movement_stress = (stats::mean(&movement) * 100.0).min(1.0);

        let asymmetry: Vec<f32> = history.asymmetry().recent(INDICATOR_TAIL).copied().collect();
        let asymmetry_stress = (stats::mean(&asymmetry) * 100.0).min(1.0);

        let score = blink_stress * 0.3
            + tension_stress * 0.3
            + movement_stress * 0.2
            + asymmetry_stress * 0.2;
        score.clamp(0.0, 1.0)
    }
}
