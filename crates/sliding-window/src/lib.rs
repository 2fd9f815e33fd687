//! Sliding Windows
//!
//! Provides a generic fixed-capacity FIFO buffer for per-frame signal history.

mod window;

pub use window::SlidingWindow;
