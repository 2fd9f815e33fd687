//! Alerting System
//!
//! Fuses the per-frame fall, stress, and panic signals into at most one
//! alert per frame, with cooldown, display expiry, and acknowledgment.

mod coordinator;
mod event;

pub use coordinator::{AlertConfig, AlertCoordinator, AlertState, FrameSignals};
pub use event::{ActiveAlert, AlertEvent, AlertKind, Severity};
