//! Fixed-Capacity Sliding Window Implementation

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::VecDeque;

/// Fixed-capacity FIFO buffer that drops the oldest element when full.
///
/// Insertion order is temporal order (oldest first); `len() <= capacity()`
/// holds at all times.
#[derive(Debug, Clone, Serialize)]
pub struct SlidingWindow<T> {
    data: VecDeque<T>,
    capacity: usize,
}

// Manual impl so deserialized windows uphold the same invariants `new`
// asserts: nonzero capacity, and no more samples than capacity
impl<'de, T: Deserialize<'de>> Deserialize<'de> for SlidingWindow<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw<T> {
            data: VecDeque<T>,
            capacity: usize,
        }

        let raw = Raw::<T>::deserialize(deserializer)?;
        if raw.capacity == 0 {
            return Err(serde::de::Error::custom("window capacity must be nonzero"));
        }
        if raw.data.len() > raw.capacity {
            return Err(serde::de::Error::custom(
                "window holds more samples than its capacity",
            ));
        }
        Ok(Self {
            data: raw.data,
            capacity: raw.capacity,
        })
    }
}

impl<T> SlidingWindow<T> {
    /// Create a new window with the given capacity
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be nonzero");
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a sample, evicting the oldest if the window is full
    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the window is at capacity
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Window capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed sample
    pub fn back(&self) -> Option<&T> {
        self.data.back()
    }

    /// Iterate all samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Iterate the most recent `n` samples (or fewer), oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.data.len().saturating_sub(n);
        self.data.iter().skip(skip)
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.data.clear();
    }
}
