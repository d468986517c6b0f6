//! Constant variables.

/// Default bit length of ring ids.
pub const DEFAULT_BITS: u8 = 16;
/// Largest supported bit length of ring ids.
pub const MAX_BITS: u8 = 64;
/// Default capacity of the successor table.
pub const DEFAULT_SUCCESSOR_TABLE_SIZE: usize = 3;
/// Default deadline of a single request, in ms.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;
/// Default stabilize period, in ms.
pub const DEFAULT_STABILIZE_INTERVAL_MS: u64 = 1000;
/// Default fix-finger period, in ms.
pub const DEFAULT_FIX_FINGER_INTERVAL_MS: u64 = 2000;
/// Default check-predecessor period, in ms.
pub const DEFAULT_CHECK_PREDECESSOR_INTERVAL_MS: u64 = 2000;
