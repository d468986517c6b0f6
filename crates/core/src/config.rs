//! Config of a chord node.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::consts::*;

/// Tunables of a chord node. All durations are in ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordConfig {
    /// Bit length `m` of the ring; ids live in `[0, 2^m)`.
    pub bits: u8,
    /// Capacity of the successor table.
    pub successor_table_size: usize,
    /// Deadline of every outgoing request.
    pub request_timeout_ms: u64,
    /// Period of stabilize.
    pub stabilize_interval_ms: u64,
    /// Period of fix-finger.
    pub fix_finger_interval_ms: u64,
    /// Period of check-predecessor.
    pub check_predecessor_interval_ms: u64,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            successor_table_size: DEFAULT_SUCCESSOR_TABLE_SIZE,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            stabilize_interval_ms: DEFAULT_STABILIZE_INTERVAL_MS,
            fix_finger_interval_ms: DEFAULT_FIX_FINGER_INTERVAL_MS,
            check_predecessor_interval_ms: DEFAULT_CHECK_PREDECESSOR_INTERVAL_MS,
        }
    }
}

impl ChordConfig {
    /// Set bit length of the ring.
    pub fn bits(mut self, bits: u8) -> Self {
        self.bits = bits;
        self
    }

    /// Set capacity of the successor table.
    pub fn successor_table_size(mut self, size: usize) -> Self {
        self.successor_table_size = size;
        self
    }

    /// Set request deadline in ms.
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = ms;
        self
    }

    /// Set stabilize period in ms.
    pub fn stabilize_interval_ms(mut self, ms: u64) -> Self {
        self.stabilize_interval_ms = ms;
        self
    }

    /// Set fix-finger period in ms.
    pub fn fix_finger_interval_ms(mut self, ms: u64) -> Self {
        self.fix_finger_interval_ms = ms;
        self
    }

    /// Set check-predecessor period in ms.
    pub fn check_predecessor_interval_ms(mut self, ms: u64) -> Self {
        self.check_predecessor_interval_ms = ms;
        self
    }

    /// Deadline of every outgoing request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Period of stabilize.
    pub fn stabilize_interval(&self) -> Duration {
        Duration::from_millis(self.stabilize_interval_ms)
    }

    /// Period of fix-finger.
    pub fn fix_finger_interval(&self) -> Duration {
        Duration::from_millis(self.fix_finger_interval_ms)
    }

    /// Period of check-predecessor.
    pub fn check_predecessor_interval(&self) -> Duration {
        Duration::from_millis(self.check_predecessor_interval_ms)
    }
}
