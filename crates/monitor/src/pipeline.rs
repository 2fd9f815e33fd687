//! Per-frame pipeline orchestration

use crate::sink::AlertSink;
use alerting::{ActiveAlert, AlertConfig, AlertCoordinator, AlertEvent, FrameSignals};
use detection::{
    FallConfig, FallDetector, PanicConfig, PanicIndicatorSet, PanicScorer, StressConfig,
    StressScorer,
};
use feature_history::{DerivedFeatures, FeatureHistory};
use landmarks::LandmarkFrame;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Pipeline configuration, bundling every tunable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub fall: FallConfig,
    pub stress: StressConfig,
    pub panic: PanicConfig,
    pub alerts: AlertConfig,
    /// Consecutive body-less frames before the subject is reported absent
    pub absence_threshold_frames: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            fall: FallConfig::default(),
            stress: StressConfig::default(),
            panic: PanicConfig::default(),
            alerts: AlertConfig::default(),
            absence_threshold_frames: 30,
        }
    }
}

/// Everything the pipeline produces for one frame
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Post-hysteresis fall flag
    pub fall: bool,
    /// Facial stress score in [0,1]
    pub stress_score: f32,
    /// Panic/distress score in [0,1]
    pub panic_score: f32,
    pub panic_indicators: PanicIndicatorSet,
    /// The currently visible alert, if any
    pub alert: Option<ActiveAlert>,
    /// The alert raised this frame, if any (also delivered to the sink)
    pub event: Option<AlertEvent>,
    /// Per-frame derived features for downstream overlay/telemetry
    pub features: DerivedFeatures,
}

/// The multi-signal detection and alerting engine for one tracked subject.
///
/// Owns the feature history, the three detectors, and the alert coordinator.
/// Each stream needs its own instance; there is no shared mutable state
/// across subjects.
pub struct SafetyMonitor {
    history: FeatureHistory,
    fall: FallDetector,
    stress: StressScorer,
    panic: PanicScorer,
    alerts: AlertCoordinator,
    sink: Option<Box<dyn AlertSink>>,
    absence_threshold: u32,
    body_absent_frames: u32,
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl SafetyMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        let absence_threshold = config.absence_threshold_frames;
        Self {
            history: FeatureHistory::new(),
            fall: FallDetector::new(config.fall),
            stress: StressScorer::new(config.stress),
            panic: PanicScorer::new(config.panic),
            alerts: AlertCoordinator::new(config.alerts),
            sink: None,
            absence_threshold,
            body_absent_frames: 0,
        }
    }

    /// Attach an alert event sink
    pub fn with_sink(mut self, sink: Box<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Process one frame at the injected instant.
    ///
    /// The history store is mutated exactly once, before any scorer reads
    /// it. An invalid frame degrades to the missing-input path; per-frame
    /// failures never abort the stream.
    pub fn process_frame(&mut self, frame: &LandmarkFrame, now: Instant) -> FrameAnalysis {
        let sanitized;
        let frame = match frame.validate() {
            Ok(()) => frame,
            Err(e) => {
                warn!(error = %e, "invalid landmark frame, treating as no detection");
                sanitized = LandmarkFrame::new(frame.width, frame.height);
                &sanitized
            }
        };

        if frame.body.is_some() {
            self.body_absent_frames = 0;
        } else {
            self.body_absent_frames = self.body_absent_frames.saturating_add(1);
        }

        let features = self.history.ingest(frame);

        let fall = self.fall.evaluate(frame, &self.history, now);
        let stress_score = self.stress.evaluate(frame, &self.history);
        let panic = self.panic.evaluate(frame, &self.history);

        let event = self.alerts.observe(
            FrameSignals {
                fall,
                stress_score,
                panic_score: panic.score,
                panic_indicators: panic.indicators,
            },
            now,
        );
        if let (Some(event), Some(sink)) = (&event, self.sink.as_mut()) {
            sink.deliver(event);
        }

        FrameAnalysis {
            fall,
            stress_score,
            panic_score: panic.score,
            panic_indicators: panic.indicators,
            alert: self.alerts.active(now),
            event,
            features,
        }
    }

    /// Whether the subject has been out of frame for the configured number
    /// of consecutive frames
    pub fn subject_absent(&self) -> bool {
        self.body_absent_frames >= self.absence_threshold
    }

    /// Acknowledge the currently visible alert, if any
    pub fn acknowledge_alert(&mut self) -> bool {
        self.alerts.acknowledge()
    }

    /// Start a new monitoring session: clear all windows and both state
    /// machines. The next frame behaves exactly like the first frame ever
    /// processed.
    pub fn reset(&mut self) {
        info!("resetting monitoring session");
        self.history.reset();
        self.fall.reset();
        self.alerts.reset();
        self.body_absent_frames = 0;
    }
}
