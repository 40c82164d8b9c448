pub mod tier;
pub mod pricing;
pub mod state;
pub mod ops;
pub mod error;
pub mod logger;
pub mod config;

/// Monetary amount in minor units (fen). Signed so negative input can be rejected.
pub type Money = i64;

/// Convert whole yuan to minor units.
pub const fn yuan(amount: i64) -> Money {
    amount * 100
}

/// Get current Unix timestamp
pub fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Source of "now" for ledger transitions that stamp an expiry date.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        current_timestamp()
    }
}

/// Clock pinned to a fixed instant (tests, replays).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
