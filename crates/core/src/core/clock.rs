// `std::time::SystemTime::now()` panics on `wasm32-unknown-unknown`.
// `web-time` reads the browser clock via `Date.now()` instead.
#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Nanoseconds since the Unix epoch, or 0 if the clock is before it.
pub(crate) fn unix_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
