//! Alert kinds, severity, and the externally visible event record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Alert kinds, in descending raise priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Fall,
    BreathingDifficulty,
    PanicMovement,
    PanicDistress,
    HighStress,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Fall => "fall",
            AlertKind::BreathingDifficulty => "breathing_difficulty",
            AlertKind::PanicMovement => "panic_movement",
            AlertKind::PanicDistress => "panic_distress",
            AlertKind::HighStress => "high_stress",
        }
    }

    /// Human-readable message carried by the raised event
    pub fn message(&self) -> &'static str {
        match self {
            AlertKind::Fall => "fall detected",
            AlertKind::BreathingDifficulty => "possible breathing difficulty detected",
            AlertKind::PanicMovement => "erratic panic movement detected",
            AlertKind::PanicDistress => "panic or distress detected",
            AlertKind::HighStress => "sustained high stress detected",
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// One raised alert, handed to the event sink.
///
/// The receiving collaborator owns deduplication, storage, and
/// acknowledgment bookkeeping; `id` gives it a stable handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(kind: AlertKind, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            message: kind.message().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// The currently visible alert, mirrored from `AlertState::Active`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAlert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub raised_at: Instant,
}
