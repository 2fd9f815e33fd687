//! Multi-Signal Detection
//!
//! Per-frame scoring of three signal families over the shared feature
//! history:
//! - fall detection with hysteresis (majority of weak geometric signals)
//! - facial stress scoring (blink rate, mouth tension, head movement,
//!   asymmetry)
//! - panic/distress scoring (hand-to-chest contact, restless movement,
//!   breathing irregularity)

pub mod config;
mod fall;
mod panic;
mod stress;

pub use config::{FallConfig, PanicConfig, StressConfig};
pub use fall::{FallDetector, FallState};
pub use panic::{PanicEvaluation, PanicIndicatorSet, PanicScorer};
pub use stress::StressScorer;
