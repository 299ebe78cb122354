//! # Gateforge
//!
//! Login admission control for multiplayer game servers.
//!
//! When your server is at capacity, Gateforge decides — on every login
//! attempt — whether the candidate may enter now, and if not, which
//! wait-queue slot they hold and when they should retry. Premium accounts
//! wait in a priority queue ahead of standard accounts; gamemasters and
//! override-flagged accounts never wait at all.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gateforge::prelude::*;
//!
//! # async fn demo(candidate: impl LoginCandidate) {
//! let online = Arc::new(OnlineCounter::new(0));
//! let gate = Arc::new(LoginGate::new(
//!     GateConfig { max_players: 900 },
//!     Arc::clone(&online),
//! ));
//!
//! // In the login pathway, before creating a full session:
//! match gate.client_login(&candidate).await {
//!     LoginDecision::Admitted { .. } => {
//!         // proceed with session creation, then:
//!         online.player_joined();
//!     }
//!     LoginDecision::Wait { slot, retry_in_secs } => {
//!         // relay "too many players online, you are at place {slot},
//!         // please retry in {retry_in_secs} seconds" and close.
//!     }
//! }
//! # }
//! ```

mod gate;

pub use gate::{GateConfig, LoginGate};

/// One-stop imports for host servers.
pub mod prelude {
    pub use crate::{GateConfig, LoginGate};
    pub use gateforge_protocol::{AccountTier, PlayerId, WaitAdvice};
    pub use gateforge_waitlist::{
        CapacityConfig, Clock, LiveOccupancy, LoginCandidate, LoginDecision,
        OnlineCounter, SystemClock, WaitingList,
    };
}
