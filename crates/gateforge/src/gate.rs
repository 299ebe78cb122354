//! `LoginGate`: the shared, lock-guarded entry point to the waitlist.
//!
//! The core `WaitingList` is deliberately not thread-safe — the whole
//! admission decision (expiry sweep, lookup, insert/erase/refresh) must
//! be one atomic unit, so the right design is a single exclusive lock
//! around the entire operation, not fine-grained locking inside it.
//! `LoginGate` is that lock: an `Arc<LoginGate>` lives in the host's
//! shared server state, and every connection task calls
//! [`client_login`](LoginGate::client_login) through it.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use gateforge_protocol::PlayerId;
use gateforge_waitlist::{
    CapacityConfig, Clock, LiveOccupancy, LoginCandidate, LoginDecision,
    QueuePosition, SystemClock, WaitingList,
};

// ---------------------------------------------------------------------------
// GateConfig
// ---------------------------------------------------------------------------

/// Configuration for the login gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateConfig {
    /// Maximum concurrent players.
    ///
    /// Default: 0, meaning uncapped — admission control is opt-in, a
    /// fresh server admits everyone until a limit is configured.
    pub max_players: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { max_players: 0 }
    }
}

/// The gate's own config doubles as the capacity collaborator.
impl CapacityConfig for GateConfig {
    fn max_players(&self) -> u32 {
        self.max_players
    }
}

// ---------------------------------------------------------------------------
// LoginGate
// ---------------------------------------------------------------------------

/// An async, shareable wrapper around [`WaitingList`].
///
/// Generic over the occupancy source `O` (the host's player registry, or
/// an [`OnlineCounter`](gateforge_waitlist::OnlineCounter)) and the clock
/// `K` (the monotonic [`SystemClock`] unless a test or simulation swaps
/// in its own).
pub struct LoginGate<O, K = SystemClock>
where
    O: LiveOccupancy + Send,
    K: Clock + Send,
{
    waitlist: Mutex<WaitingList<O, GateConfig, K>>,
}

impl<O> LoginGate<O>
where
    O: LiveOccupancy + Send,
{
    /// Creates a gate on the monotonic system clock.
    pub fn new(config: GateConfig, occupancy: O) -> Self {
        Self::with_clock(config, occupancy, SystemClock::new())
    }
}

impl<O, K> LoginGate<O, K>
where
    O: LiveOccupancy + Send,
    K: Clock + Send,
{
    /// Creates a gate with an explicit clock.
    pub fn with_clock(config: GateConfig, occupancy: O, clock: K) -> Self {
        tracing::info!(
            max_players = config.max_players,
            "login gate initialized"
        );
        Self {
            waitlist: Mutex::new(WaitingList::new(occupancy, config, clock)),
        }
    }

    /// Decides whether `candidate` may log in right now.
    ///
    /// The whole decision runs under the gate's lock, so concurrent
    /// login attempts serialize and the queue invariants (no duplicate
    /// membership, stable ranks) hold no matter how many connection
    /// tasks call in at once.
    pub async fn client_login(
        &self,
        candidate: &impl LoginCandidate,
    ) -> LoginDecision {
        self.waitlist.lock().await.client_login(candidate)
    }

    /// How many candidates are currently waiting.
    pub async fn queued_len(&self) -> usize {
        self.waitlist.lock().await.len()
    }

    /// Where a player currently stands in the queue, if anywhere.
    pub async fn position_of(&self, player_id: PlayerId) -> Option<QueuePosition> {
        self.waitlist.lock().await.position_of(player_id)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use gateforge_protocol::AccountTier;
    use gateforge_waitlist::OnlineCounter;

    use super::*;

    struct Candidate(PlayerId);

    impl LoginCandidate for Candidate {
        fn player_id(&self) -> PlayerId {
            self.0
        }
        fn can_always_login(&self) -> bool {
            false
        }
        fn account_tier(&self) -> AccountTier {
            AccountTier::Normal
        }
        fn is_premium(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_gate_config_default_is_uncapped() {
        assert_eq!(GateConfig::default().max_players, 0);
    }

    #[test]
    fn test_gate_config_serde_round_trip() {
        let config = GateConfig { max_players: 750 };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"max_players":750}"#);

        let back: GateConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_players, 750);
    }

    #[tokio::test]
    async fn test_client_login_under_capacity_admits() {
        let gate = LoginGate::new(
            GateConfig { max_players: 10 },
            OnlineCounter::new(3),
        );

        let decision = gate.client_login(&Candidate(PlayerId(1))).await;

        assert!(decision.is_admitted());
        assert_eq!(gate.queued_len().await, 0);
    }

    #[tokio::test]
    async fn test_client_login_full_server_queues_and_reports_position() {
        let gate = LoginGate::new(
            GateConfig { max_players: 2 },
            OnlineCounter::new(2),
        );

        let decision = gate.client_login(&Candidate(PlayerId(1))).await;

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 1, retry_in_secs: 20 }
        );
        assert_eq!(gate.position_of(PlayerId(1)).await.unwrap().slot, 1);
    }
}
