//! Detector configuration

use serde::{Deserialize, Serialize};

/// Fall detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallConfig {
    /// Body tilt from vertical that counts as a fall condition (degrees)
    pub angle_threshold_deg: f32,

    /// Head velocity that counts as a fall condition (pixels per frame,
    /// frame-size dependent)
    pub velocity_threshold: f32,

    /// Head acceleration that counts as a fall condition (pixels per frame²)
    pub acceleration_threshold: f32,

    /// How many of the four conditions must hold to signal a fall
    pub min_conditions: usize,

    /// Time below the condition quorum before a fallen subject is
    /// considered recovered (milliseconds)
    pub recovery_ms: u64,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            angle_threshold_deg: 45.0,
            velocity_threshold: 150.0,
            acceleration_threshold: 50.0,
            min_conditions: 2,
            recovery_ms: 2000,
        }
    }
}

/// Stress scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressConfig {
    /// Blink-window samples required before a non-zero score is produced
    pub min_samples: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self { min_samples: 10 }
    }
}

/// Panic/distress scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanicConfig {
    /// Chest-distance samples required before aggregate rates are computed
    pub min_samples: usize,

    /// Wrist-to-chest-center distance that counts as chest contact
    /// (normalized units)
    pub chest_touch_threshold: f32,

    /// Wrist-to-throat-center distance that counts as throat contact
    pub throat_touch_threshold: f32,

    /// Chest-contact rate over the last 10 frames flagging chest clutching
    pub chest_rate_threshold: f32,

    /// Throat-contact rate over the last 10 frames flagging throat touching
    pub throat_rate_threshold: f32,

    /// Either-contact rate over the last 15 frames flagging frequent
    /// chest contact
    pub contact_rate_threshold: f32,

    /// Mean erratic-movement score over the last 3 samples flagging
    /// restlessness
    pub erratic_threshold: f32,

    /// Shoulder-separation variance over the last 30 frames flagging
    /// rapid breathing
    pub breathing_variance_threshold: f32,
}

impl Default for PanicConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            chest_touch_threshold: 0.08,
            throat_touch_threshold: 0.06,
            chest_rate_threshold: 0.3,
            throat_rate_threshold: 0.2,
            contact_rate_threshold: 0.4,
            erratic_threshold: 0.03,
            breathing_variance_threshold: 0.0005,
        }
    }
}
