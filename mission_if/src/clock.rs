//! # Ground clock
//!
//! Provides the "milliseconds since an arbitrary epoch" time used to stamp mission items as
//! reached.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::time::Instant;

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

/// Wall clock and monotonic clock readings taken together at first use.
static CLOCK_EPOCH: OnceCell<(DateTime<Utc>, Instant)> = OnceCell::uninit();

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of ground time.
pub trait Clock {
    /// Current time in milliseconds. Must never decrease between calls.
    fn now_ms(&self) -> u64;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The process-wide ground clock.
///
/// Reports the UTC time of the first reading in milliseconds since the Unix epoch, advanced by
/// a monotonic clock from then on, so that system clock adjustments cannot make it go
/// backwards.
#[derive(Debug, Default, Copy, Clone)]
pub struct GroundClock;

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Clock for GroundClock {
    fn now_ms(&self) -> u64 {
        ground_time_ms()
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the current ground time in milliseconds.
pub fn ground_time_ms() -> u64 {
    let (utc, instant) = CLOCK_EPOCH.get_or_init(|| (Utc::now(), Instant::now()));

    // Clamp to 1 so a badly set system clock still gives a "reached" time
    let epoch_ms = utc.timestamp_millis().max(1) as u64;

    epoch_ms + instant.elapsed().as_millis() as u64
}
