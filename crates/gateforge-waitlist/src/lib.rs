//! Login admission queue for Gateforge.
//!
//! When a game server is at capacity, new logins shouldn't be dropped on
//! the floor — they should be told *where they stand* and *when to come
//! back*. This crate implements that decision:
//!
//! 1. **Retry delays** ([`retry_delay_secs`]) — how long a candidate at a
//!    given queue slot should wait before retrying
//! 2. **Queue storage** ([`WaitQueues`]) — two ordered queues (priority
//!    and standard) of pending login requests
//! 3. **The manager** ([`WaitingList`]) — one call per login attempt:
//!    admit now, or report a slot and a retry time
//!
//! # How it fits in the stack
//!
//! ```text
//! Host server's login pathway (above)  ← calls client_login before
//!     ↕                                  creating a full session
//! Waitlist core (this crate)           ← decides admission and slots
//!     ↕
//! Protocol layer (below)               ← provides PlayerId, AccountTier
//! ```
//!
//! # Concurrency note
//!
//! [`WaitingList`] is NOT thread-safe by itself — it uses plain
//! `VecDeque`s, not concurrent containers. This is intentional: the
//! waitlist is owned by a single place (the host's login pathway) and
//! wrapped in a mutex at a higher level (see the `gateforge` meta-crate's
//! `LoginGate`). Keeping it plain here avoids hidden locking overhead and
//! makes the whole decision trivially atomic under one lock.

mod delay;
mod hooks;
mod manager;
mod queue;

pub use delay::{advised_retry_secs, retry_delay_secs, RETRY_ADVICE_MARGIN_SECS};
pub use hooks::{
    CapacityConfig, Clock, LiveOccupancy, LoginCandidate, OnlineCounter, SystemClock,
};
pub use manager::{LoginDecision, WaitingList};
pub use queue::{QueueId, QueuePosition, WaitEntry, WaitQueues};
