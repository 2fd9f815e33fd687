//! Body Safety Monitoring Pipeline
//!
//! Single-subject, single-stream, strictly sequential per-frame processing:
//! one call ingests one landmark frame and returns all three scores, the
//! fall flag, and at most one alert event. Nothing here suspends or blocks;
//! landmark estimation happens upstream, presentation downstream.

mod pipeline;
mod sink;

pub use pipeline::{FrameAnalysis, MonitorConfig, SafetyMonitor};
pub use sink::{AlertSink, TracingSink};
