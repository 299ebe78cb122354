//! Slot-based retry delays.
//!
//! The further back in the queue a candidate stands, the less point there
//! is in retrying quickly — someone at slot 80 won't get in within the
//! next two minutes no matter what. The delay is a step function of the
//! slot so that the front of the queue polls often (and fills freed
//! capacity fast) while the back stays quiet.

/// Safety margin, in seconds, added to the delay a client is *told*.
///
/// The stored queue-entry deadline uses the undecorated per-slot delay;
/// the advertised retry hint adds this margin so a client that retries
/// exactly when told still arrives before its entry expires, even with
/// network latency and sloppy client-side timers.
pub const RETRY_ADVICE_MARGIN_SECS: u64 = 15;

/// Base retry delay, in seconds, for a candidate at the given 1-based
/// queue slot.
///
/// Monotonically non-decreasing in `slot`:
///
/// | slot    | seconds |
/// |---------|---------|
/// | 1–4     | 5       |
/// | 5–9     | 10      |
/// | 10–19   | 20      |
/// | 20–49   | 60      |
/// | 50+     | 120     |
pub fn retry_delay_secs(slot: usize) -> u64 {
    if slot < 5 {
        5
    } else if slot < 10 {
        10
    } else if slot < 20 {
        20
    } else if slot < 50 {
        60
    } else {
        120
    }
}

/// The retry delay to *advertise* to a client at the given slot:
/// the base delay plus [`RETRY_ADVICE_MARGIN_SECS`].
pub fn advised_retry_secs(slot: usize) -> u64 {
    retry_delay_secs(slot) + RETRY_ADVICE_MARGIN_SECS
}
