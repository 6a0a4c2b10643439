//! Absolute deadlines for bounded waits.
//!
//! Timeouts come straight from configuration and may be arbitrarily large
//! (`u64::MAX` seconds is a valid "wait forever").  `Instant + Duration`
//! panics when the sum is not representable, so every deadline in the crate
//! goes through [`deadline_after`].

use std::time::Duration;

use tokio::time::Instant;

/// Stand-in for "no deadline": roughly thirty years.
pub const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + timeout`, saturating at [`FAR_FUTURE`] instead of overflowing.
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(FAR_FUTURE)).unwrap_or(now)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
