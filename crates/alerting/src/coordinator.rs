//! Alert Coordinator state machine

use crate::event::{ActiveAlert, AlertEvent, AlertKind, Severity};
use detection::PanicIndicatorSet;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Alert coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Minimum interval between raised alerts (milliseconds)
    pub cooldown_ms: u64,
    /// How long a raised alert stays visibly active (milliseconds),
    /// independent of the cooldown
    pub display_ms: u64,
    /// Panic score above which a panic-family alert qualifies
    pub panic_threshold: f32,
    /// Stress score above which a high-stress alert qualifies
    pub stress_threshold: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 3000,
            display_ms: 2000,
            panic_threshold: 0.6,
            stress_threshold: 0.7,
        }
    }
}

/// Alert display state for one tracked subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Idle,
    Active(ActiveAlert),
}

/// The three per-frame signals the coordinator fuses
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSignals {
    pub fall: bool,
    pub stress_score: f32,
    pub panic_score: f32,
    pub panic_indicators: PanicIndicatorSet,
}

/// Fuses fall, panic, and stress signals into at most one alert per frame.
///
/// Cooldown gates raising; display duration gates how long the active flag
/// stays visible. The two timers are independent: expiry never re-arms the
/// cooldown.
#[derive(Debug, Clone)]
pub struct AlertCoordinator {
    config: AlertConfig,
    state: AlertState,
    last_raised: Option<Instant>,
}

impl Default for AlertCoordinator {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

impl AlertCoordinator {
    pub fn new(config: AlertConfig) -> Self {
        debug!(?config, "creating alert coordinator");
        Self {
            config,
            state: AlertState::Idle,
            last_raised: None,
        }
    }

    /// Observe one frame's signals; returns the raised event, if any.
    ///
    /// During cooldown a qualifying candidate is suppressed: no event, no
    /// state change, even though the underlying condition is true.
    pub fn observe(&mut self, signals: FrameSignals, now: Instant) -> Option<AlertEvent> {
        self.expire(now);

        let candidate = self.select_candidate(&signals)?;

        if let Some(last) = self.last_raised {
            let cooldown = Duration::from_millis(self.config.cooldown_ms);
            if now.saturating_duration_since(last) < cooldown {
                debug!(kind = candidate.0.as_str(), "alert suppressed: in cooldown");
                return None;
            }
        }

        let (kind, severity) = candidate;
        self.state = AlertState::Active(ActiveAlert {
            kind,
            severity,
            raised_at: now,
        });
        self.last_raised = Some(now);
        info!(
            kind = kind.as_str(),
            severity = severity.as_str(),
            "alert raised"
        );
        Some(AlertEvent::new(kind, severity))
    }

    /// Candidate selection in strict priority order: fall, then the panic
    /// family (kind disambiguated by indicators), then stress
    fn select_candidate(&self, signals: &FrameSignals) -> Option<(AlertKind, Severity)> {
        if signals.fall {
            return Some((AlertKind::Fall, Severity::High));
        }
        if signals.panic_score > self.config.panic_threshold {
            let kind = if signals.panic_indicators.hand_contact() {
                AlertKind::BreathingDifficulty
            } else if signals.panic_indicators.erratic_movement {
                AlertKind::PanicMovement
            } else {
                AlertKind::PanicDistress
            };
            return Some((kind, Severity::High));
        }
        if signals.stress_score > self.config.stress_threshold {
            return Some((AlertKind::HighStress, Severity::Medium));
        }
        None
    }

    /// Revert an active alert to idle once the display duration has passed
    fn expire(&mut self, now: Instant) {
        if let AlertState::Active(active) = self.state {
            let display = Duration::from_millis(self.config.display_ms);
            if now.saturating_duration_since(active.raised_at) > display {
                debug!(kind = active.kind.as_str(), "alert display expired");
                self.state = AlertState::Idle;
            }
        }
    }

    /// The currently visible alert, with expiry applied read-side
    pub fn active(&self, now: Instant) -> Option<ActiveAlert> {
        match self.state {
            AlertState::Active(active) => {
                let display = Duration::from_millis(self.config.display_ms);
                (now.saturating_duration_since(active.raised_at) <= display).then_some(active)
            }
            AlertState::Idle => None,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Acknowledge the active alert, clearing it ahead of its expiry.
    /// Does not touch the cooldown timer.
    pub fn acknowledge(&mut self) -> bool {
        match self.state {
            AlertState::Active(active) => {
                info!(kind = active.kind.as_str(), "alert acknowledged");
                self.state = AlertState::Idle;
                true
            }
            AlertState::Idle => false,
        }
    }

    /// Reset to the initial state: idle, cooldown disarmed
    pub fn reset(&mut self) {
        self.state = AlertState::Idle;
        self.last_raised = None;
    }
}
