//! Millisecond tick arithmetic.
//!
//! The controller runs off a free-running `u32` millisecond counter that
//! wraps roughly every 49.7 days.  Every comparison goes through the
//! helpers below so rollover never produces a spurious "deadline passed"
//! or a cool-down that never ends.

/// Monotonic milliseconds since boot (wraps at `u32::MAX`).
pub type Millis = u32;

/// Largest forward distance still treated as "in the past".
/// Anything further ahead is interpreted as a deadline not yet reached.
const HALF_RANGE: u32 = u32::MAX / 2;

/// True once `now` has reached or passed `deadline`.
///
/// Wrap-safe as long as the two instants are less than ~24.8 days apart.
pub fn reached(now: Millis, deadline: Millis) -> bool {
    now.wrapping_sub(deadline) <= HALF_RANGE
}

/// Milliseconds elapsed from `since` to `now`, modulo 2^32.
pub fn elapsed(now: Millis, since: Millis) -> u32 {
    now.wrapping_sub(since)
}

/// Convert whole seconds to milliseconds, saturating.
pub const fn secs_to_ms(secs: u32) -> u32 {
    secs.saturating_mul(1000)
}
