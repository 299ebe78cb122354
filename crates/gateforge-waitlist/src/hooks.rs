//! Collaborator hooks: the narrow seams to the rest of the server.
//!
//! The waitlist doesn't own player records, the online counter, the
//! server config, or the clock — those all live elsewhere in a real
//! server. Instead of reaching into globals (the classic MMO-server way),
//! each collaborator is a small trait the host implements.
//!
//! # Why traits?
//!
//! A trait defines WHAT the waitlist needs without specifying HOW the
//! host provides it. This lets us:
//! - Read the live count from the host's real player registry in production
//! - Use a plain atomic counter in demos
//! - Use fixed values and a hand-advanced clock in tests
//!
//! All without changing any waitlist code.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use gateforge_protocol::{AccountTier, PlayerId};

// ---------------------------------------------------------------------------
// LoginCandidate
// ---------------------------------------------------------------------------

/// The identity data the waitlist reads off a login candidate.
///
/// Implemented by the host's player/character record. The candidate is
/// already identified and authenticated by the time it reaches admission
/// control — the waitlist only decides *when* it may enter.
pub trait LoginCandidate {
    /// The candidate's unique id.
    fn player_id(&self) -> PlayerId;

    /// Whether the account carries the "can always login" override flag.
    /// Candidates with this flag skip the queue entirely.
    fn can_always_login(&self) -> bool;

    /// The account's privilege tier. Gamemaster-or-above skips the queue.
    fn account_tier(&self) -> AccountTier;

    /// Whether the account is premium. Premium candidates wait in the
    /// priority queue, ahead of every standard candidate.
    fn is_premium(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Server environment
// ---------------------------------------------------------------------------

/// How many players are currently online.
///
/// Read exactly once per login attempt. The value only needs to be a
/// consistent snapshot — the host keeps whatever concurrency discipline
/// it already has around its player registry.
pub trait LiveOccupancy {
    /// The number of fully logged-in players right now.
    fn current_player_count(&self) -> u32;
}

/// The configured player capacity.
///
/// Read exactly once per login attempt, so a host that hot-reloads its
/// config takes effect on the very next login.
pub trait CapacityConfig {
    /// Maximum concurrent players. `0` means uncapped.
    fn max_players(&self) -> u32;
}

/// A monotonic millisecond clock.
///
/// Queue-entry deadlines are stored as absolute milliseconds from this
/// clock, so it must never jump backwards. Wall-clock time (which can be
/// adjusted by NTP) is the wrong tool here — see [`SystemClock`].
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch. Monotonic.
    fn now_millis(&self) -> u64;
}

// `Arc<T>` forwarding — the host usually shares its registry, config, and
// clock with other subsystems, so accepting `Arc`s directly keeps call
// sites clean.

impl<T: LiveOccupancy + ?Sized> LiveOccupancy for Arc<T> {
    fn current_player_count(&self) -> u32 {
        (**self).current_player_count()
    }
}

impl<T: CapacityConfig + ?Sized> CapacityConfig for Arc<T> {
    fn max_players(&self) -> u32 {
        (**self).max_players()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

// ---------------------------------------------------------------------------
// Provided implementations
// ---------------------------------------------------------------------------

/// A monotonic [`Clock`] backed by [`Instant`].
///
/// `Instant` is Rust's monotonic clock — it always moves forward and
/// isn't affected by system clock changes. Milliseconds are counted from
/// the moment the `SystemClock` is constructed, which is fine: only
/// differences and comparisons ever matter, never the absolute value.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is "now".
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // Saturating at u64::MAX after ~584 million years of uptime.
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A shared atomic tally of online players, implementing [`LiveOccupancy`].
///
/// Hosts with a real player registry implement [`LiveOccupancy`] on that
/// registry instead; this counter is for demos, tests, and servers that
/// only need the number. Clone it (or wrap it in an `Arc`) and bump it
/// from the session layer as players complete login and log out.
#[derive(Debug, Default)]
pub struct OnlineCounter {
    online: AtomicU32,
}

impl OnlineCounter {
    /// Creates a counter starting at the given occupancy.
    pub fn new(online: u32) -> Self {
        Self { online: AtomicU32::new(online) }
    }

    /// Records a completed login.
    pub fn player_joined(&self) {
        self.online.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a logout. Saturates at zero.
    pub fn player_left(&self) {
        // `fetch_update` retries on contention; the closure refuses to
        // go below zero rather than wrapping.
        let _ = self.online.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |n| n.checked_sub(1),
        );
    }
}

impl LiveOccupancy for OnlineCounter {
    fn current_player_count(&self) -> u32 {
        self.online.load(Ordering::Relaxed)
    }
}
