//! Alert event delivery

use alerting::AlertEvent;
use tracing::warn;

/// Receives raised alert events.
///
/// Delivery is fire-and-forget: the pipeline never blocks on or retries a
/// sink, and the sink owns deduplication and persistence.
pub trait AlertSink {
    fn deliver(&mut self, event: &AlertEvent);
}

/// Default sink that surfaces events through the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn deliver(&mut self, event: &AlertEvent) {
        warn!(
            id = %event.id,
            kind = event.kind.as_str(),
            severity = event.severity.as_str(),
            "{}", event.message
        );
    }
}
