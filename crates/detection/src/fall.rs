//! Fall detection with hysteresis

use crate::config::FallConfig;
use feature_history::FeatureHistory;
use landmarks::{angle_from_vertical_deg, BodyLandmark, LandmarkFrame};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Fall state tracked over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallState {
    #[default]
    NotFallen,
    Fallen {
        /// When the fall was first signaled
        since: Instant,
        /// Last frame the condition quorum held; recovery requires the
        /// configured duration to elapse past this point
        last_signal: Instant,
    },
}

impl FallState {
    pub fn is_fallen(&self) -> bool {
        matches!(self, FallState::Fallen { .. })
    }
}

/// Detects falls from body orientation and head motion.
///
/// Four weak conditions are checked each frame (body tilt, head velocity,
/// inverted posture, head acceleration); a quorum of them signals a fall.
/// The fallen state is sticky: it clears only after the recovery duration
/// passes without the quorum holding.
#[derive(Debug, Clone)]
pub struct FallDetector {
    config: FallConfig,
    state: FallState,
}

impl Default for FallDetector {
    fn default() -> Self {
        Self::new(FallConfig::default())
    }
}

impl FallDetector {
    pub fn new(config: FallConfig) -> Self {
        Self {
            config,
            state: FallState::NotFallen,
        }
    }

    /// Evaluate one frame and return the post-transition fallen flag.
    ///
    /// Any required landmark missing returns `false` without altering the
    /// existing state, so a momentary detection gap cannot cause a spurious
    /// recovery.
    pub fn evaluate(
        &mut self,
        frame: &LandmarkFrame,
        history: &FeatureHistory,
        now: Instant,
    ) -> bool {
        let Some(body) = &frame.body else {
            return false;
        };
        let (Some(nose), Some(ls), Some(rs), Some(lh), Some(rh)) = (
            body.get(BodyLandmark::Nose),
            body.get(BodyLandmark::LeftShoulder),
            body.get(BodyLandmark::RightShoulder),
            body.get(BodyLandmark::LeftHip),
            body.get(BodyLandmark::RightHip),
        ) else {
            return false;
        };

        let shoulder_center = ls.midpoint(rs);
        let hip_center = lh.midpoint(rh);
        let angle = angle_from_vertical_deg(shoulder_center, hip_center);

        let velocity = history.head_velocity().back().copied().unwrap_or(0.0);
        let acceleration = history.head_acceleration().back().copied().unwrap_or(0.0);

        let conditions = [
            angle > self.config.angle_threshold_deg,
            velocity > self.config.velocity_threshold,
            nose.y > hip_center.y,
            acceleration > self.config.acceleration_threshold,
        ];
        let met = conditions.iter().filter(|&&c| c).count();

        if met >= self.config.min_conditions {
            match self.state {
                FallState::NotFallen => {
                    info!(angle, velocity, acceleration, conditions = met, "fall detected");
                    self.state = FallState::Fallen {
                        since: now,
                        last_signal: now,
                    };
                }
                FallState::Fallen { since, .. } => {
                    self.state = FallState::Fallen {
                        since,
                        last_signal: now,
                    };
                }
            }
        } else if let FallState::Fallen { last_signal, .. } = self.state {
            let recovery = Duration::from_millis(self.config.recovery_ms);
            if now.saturating_duration_since(last_signal) >= recovery {
                debug!("fall recovery: condition quorum absent for {:?}", recovery);
                self.state = FallState::NotFallen;
            }
        }

        self.state.is_fallen()
    }

    pub fn state(&self) -> FallState {
        self.state
    }

    pub fn is_fallen(&self) -> bool {
        self.state.is_fallen()
    }

    pub fn reset(&mut self) {
        self.state = FallState::NotFallen;
    }
}
