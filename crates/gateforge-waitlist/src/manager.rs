//! The waitlist manager: one decision per login attempt.
//!
//! This is the central piece of the admission layer. It's responsible for:
//! - Letting privileged and override-flagged accounts straight through
//! - Reclaiming slots from candidates who never retried in time
//! - Admitting immediately while the server has free capacity
//! - Queueing everyone else and telling them when to come back
//!
//! # Per-candidate state machine
//!
//! ```text
//! client_login() ──→ [Admitted]                 (bypass / free capacity)
//!        │
//!        ▼
//!   [Queued] ──(retry, capacity freed)──→ [Admitted, entry removed]
//!        │ ▲
//!        │ └──(retry, still full: deadline refreshed)
//!        ▼
//!   [Expired] ──(never retried in time)──→ entry dropped;
//!                                           next attempt starts fresh
//! ```
//!
//! `Admitted` and `Expired` are terminal for a queue membership; an
//! expired candidate who comes back simply enters at the back again.

use gateforge_protocol::{PlayerId, WaitAdvice};

use crate::delay::{advised_retry_secs, retry_delay_secs};
use crate::hooks::{CapacityConfig, Clock, LiveOccupancy, LoginCandidate};
use crate::queue::{QueueId, QueuePosition, WaitEntry, WaitQueues};

// ---------------------------------------------------------------------------
// LoginDecision
// ---------------------------------------------------------------------------

/// The outcome of one login attempt.
///
/// There is no error variant on purpose: every candidate gets a definite
/// answer. "Not queued yet" isn't a failure, and neither is "still
/// waiting" — retrying is the caller's job, on the advised schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    /// The candidate may proceed to full login now.
    Admitted {
        /// The queue slot the candidate held, if they were admitted out
        /// of the waitlist rather than straight through. Informational —
        /// useful for log lines like "admitted from slot 3".
        queued_slot: Option<usize>,
    },

    /// The server is full; the candidate holds a queue slot.
    Wait {
        /// 1-based rank across both queues (priority entries first).
        slot: usize,
        /// Seconds the client should wait before retrying. Includes the
        /// 15-second safety margin on top of the stored per-slot delay.
        retry_in_secs: u64,
    },
}

impl LoginDecision {
    /// Returns `true` if the candidate may enter now.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    /// The client-facing advice for a refused candidate, ready to embed
    /// in the host's "too many players online" response.
    pub fn advice(&self) -> Option<WaitAdvice> {
        match *self {
            Self::Wait { slot, retry_in_secs } => {
                Some(WaitAdvice { slot, retry_in_secs })
            }
            Self::Admitted { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// WaitingList
// ---------------------------------------------------------------------------

/// The admission queue manager.
///
/// Owns the two wait queues plus the three collaborators it consults on
/// every call: the live occupancy reading, the capacity config, and the
/// clock. Construct one per game world and keep it somewhere with a
/// clear owner (the host's player-management subsystem); the `gateforge`
/// meta-crate's `LoginGate` wraps it in a mutex for concurrent pathways.
///
/// Occupancy and capacity are read once per [`client_login`] call, so
/// both may be live values shared with the rest of the server (an
/// `Arc<OnlineCounter>`, a hot-reloaded config).
///
/// [`client_login`]: WaitingList::client_login
pub struct WaitingList<O, C, K>
where
    O: LiveOccupancy,
    C: CapacityConfig,
    K: Clock,
{
    queues: WaitQueues,
    occupancy: O,
    capacity: C,
    clock: K,
}

impl<O, C, K> WaitingList<O, C, K>
where
    O: LiveOccupancy,
    C: CapacityConfig,
    K: Clock,
{
    /// Creates an empty waitlist reading from the given collaborators.
    pub fn new(occupancy: O, capacity: C, clock: K) -> Self {
        Self {
            queues: WaitQueues::new(),
            occupancy,
            capacity,
            clock,
        }
    }

    /// Decides whether `candidate` may log in right now.
    ///
    /// Safe to call any number of times for the same candidate: each call
    /// either admits them, or refreshes their wait entry and re-reports
    /// their slot. A candidate whose entry expired (they never retried
    /// inside their window) simply starts over at the back.
    ///
    /// The decision, in order:
    /// 1. Override flag or gamemaster-or-above tier → admitted, queues
    ///    untouched.
    /// 2. Expired entries are dropped from both queues.
    /// 3. Uncapped server, or free capacity with nobody waiting →
    ///    admitted.
    /// 4. Already queued → admitted and removed if their slot now fits
    ///    under capacity, otherwise deadline refreshed.
    /// 5. Otherwise → appended to the priority queue (premium) or the
    ///    standard queue, and told when to retry.
    pub fn client_login(
        &mut self,
        candidate: &impl LoginCandidate,
    ) -> LoginDecision {
        let player_id = candidate.player_id();

        // 1. Bypass: these accounts never wait, even on a full server.
        if candidate.can_always_login()
            || candidate.account_tier().is_privileged()
        {
            tracing::debug!(%player_id, "login bypasses admission queue");
            return LoginDecision::Admitted { queued_slot: None };
        }

        // 2. Reclaim slots from candidates who never retried in time.
        let now = self.clock.now_millis();
        let dropped = self.queues.expire(now);
        if dropped > 0 {
            tracing::debug!(dropped, "expired stale wait entries");
        }

        // One snapshot per call; steps 3 and 4 must agree on the count.
        let online = u64::from(self.occupancy.current_player_count());
        let max_players = u64::from(self.capacity.max_players());

        // 3. Fast path: the common unthrottled case.
        if max_players == 0
            || (self.queues.is_empty() && online < max_players)
        {
            return LoginDecision::Admitted { queued_slot: None };
        }

        // 4. Already queued? Re-evaluate their position.
        if let Some(pos) = self.queues.find(player_id) {
            return self.requeue_or_admit(player_id, pos, online, max_players, now);
        }

        // 5. First refusal: join the back of the appropriate queue.
        let queue = if candidate.is_premium() {
            QueueId::Priority
        } else {
            QueueId::Standard
        };
        let slot = self.queues.next_slot(queue);
        self.queues.push(
            queue,
            WaitEntry {
                deadline_ms: now + retry_delay_secs(slot) * 1_000,
                player_id,
            },
        );

        tracing::info!(%player_id, slot, ?queue, "login queued, server full");
        LoginDecision::Wait {
            slot,
            retry_in_secs: advised_retry_secs(slot),
        }
    }

    /// Step 4: an already-queued candidate retried.
    fn requeue_or_admit(
        &mut self,
        player_id: PlayerId,
        pos: QueuePosition,
        online: u64,
        max_players: u64,
        now: u64,
    ) -> LoginDecision {
        let slot = pos.slot;

        // Everyone ahead of this candidate is assumed to claim a seat;
        // if the server can hold them all plus this one, let them in.
        if online + slot as u64 <= max_players {
            self.queues.remove(pos);
            tracing::info!(%player_id, slot, "admitted from waitlist");
            return LoginDecision::Admitted { queued_slot: Some(slot) };
        }

        // Still full: keep their place, extend their window.
        self.queues.refresh(pos, now + retry_delay_secs(slot) * 1_000);
        tracing::debug!(%player_id, slot, "still waiting, deadline refreshed");
        LoginDecision::Wait {
            slot,
            retry_in_secs: advised_retry_secs(slot),
        }
    }

    /// The number of candidates currently waiting, across both queues.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// Returns `true` if nobody is waiting.
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Where a player currently stands, if they are queued.
    pub fn position_of(&self, player_id: PlayerId) -> Option<QueuePosition> {
        self.queues.find(player_id)
    }

    /// The stored expiry deadline (clock milliseconds) for a queued
    /// player. Note this uses the undecorated per-slot delay, so it is
    /// 15 seconds earlier than the advice the client was given.
    pub fn deadline_of(&self, player_id: PlayerId) -> Option<u64> {
        self.queues.deadline_of(player_id)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `WaitingList`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //!
    //! # Testing time-dependent behavior
    //!
    //! Expiry depends on the clock, so the tests drive a hand-advanced
    //! `TestClock` instead of sleeping. Occupancy is likewise a shared
    //! cell the test mutates between calls. This keeps every test fast
    //! and deterministic.

    use std::cell::Cell;
    use std::rc::Rc;

    use gateforge_protocol::{AccountTier, PlayerId};

    use super::*;

    // -- Helpers ----------------------------------------------------------

    struct TestCandidate {
        id: PlayerId,
        premium: bool,
        always_login: bool,
        tier: AccountTier,
    }

    impl TestCandidate {
        fn standard(id: u64) -> Self {
            Self {
                id: PlayerId(id),
                premium: false,
                always_login: false,
                tier: AccountTier::Normal,
            }
        }

        fn premium(id: u64) -> Self {
            Self { premium: true, ..Self::standard(id) }
        }

        fn with_override(id: u64) -> Self {
            Self { always_login: true, ..Self::standard(id) }
        }

        fn with_tier(id: u64, tier: AccountTier) -> Self {
            Self { tier, ..Self::standard(id) }
        }
    }

    impl LoginCandidate for TestCandidate {
        fn player_id(&self) -> PlayerId {
            self.id
        }
        fn can_always_login(&self) -> bool {
            self.always_login
        }
        fn account_tier(&self) -> AccountTier {
            self.tier
        }
        fn is_premium(&self) -> bool {
            self.premium
        }
    }

    /// A clock the test advances by hand.
    #[derive(Clone, Default)]
    struct TestClock(Rc<Cell<u64>>);

    impl TestClock {
        fn advance_secs(&self, secs: u64) {
            self.0.set(self.0.get() + secs * 1_000);
        }
    }

    impl Clock for TestClock {
        fn now_millis(&self) -> u64 {
            self.0.get()
        }
    }

    /// An occupancy reading the test mutates between calls.
    #[derive(Clone)]
    struct TestOccupancy(Rc<Cell<u32>>);

    impl LiveOccupancy for TestOccupancy {
        fn current_player_count(&self) -> u32 {
            self.0.get()
        }
    }

    struct FixedCapacity(u32);

    impl CapacityConfig for FixedCapacity {
        fn max_players(&self) -> u32 {
            self.0
        }
    }

    type TestList = WaitingList<TestOccupancy, FixedCapacity, TestClock>;

    /// A waitlist with the given occupancy and capacity, plus handles to
    /// mutate the online count and the clock mid-test.
    fn waitlist(online: u32, max: u32) -> (TestList, TestOccupancy, TestClock) {
        let occupancy = TestOccupancy(Rc::new(Cell::new(online)));
        let clock = TestClock::default();
        let list =
            WaitingList::new(occupancy.clone(), FixedCapacity(max), clock.clone());
        (list, occupancy, clock)
    }

    // =====================================================================
    // Bypass (step 1)
    // =====================================================================

    #[test]
    fn test_client_login_override_flag_admits_without_queueing() {
        // Server is completely full with a queue — the override flag
        // still walks straight in and leaves the queue untouched.
        let (mut list, _, _) = waitlist(10, 10);
        assert!(!list.client_login(&TestCandidate::standard(1)).is_admitted());
        let queued_before = list.len();

        let decision = list.client_login(&TestCandidate::with_override(2));

        assert_eq!(decision, LoginDecision::Admitted { queued_slot: None });
        assert_eq!(list.len(), queued_before);
        assert!(list.position_of(PlayerId(2)).is_none());
    }

    #[test]
    fn test_client_login_gamemaster_and_god_bypass_queue() {
        let (mut list, _, _) = waitlist(10, 10);

        let gm = TestCandidate::with_tier(1, AccountTier::Gamemaster);
        let god = TestCandidate::with_tier(2, AccountTier::God);

        assert!(list.client_login(&gm).is_admitted());
        assert!(list.client_login(&god).is_admitted());
        assert!(list.is_empty());
    }

    #[test]
    fn test_client_login_tutor_tiers_do_not_bypass() {
        let (mut list, _, _) = waitlist(10, 10);

        let tutor = TestCandidate::with_tier(1, AccountTier::Tutor);
        let senior = TestCandidate::with_tier(2, AccountTier::SeniorTutor);

        assert!(!list.client_login(&tutor).is_admitted());
        assert!(!list.client_login(&senior).is_admitted());
        assert_eq!(list.len(), 2);
    }

    // =====================================================================
    // Fast path (step 3)
    // =====================================================================

    #[test]
    fn test_client_login_uncapped_server_always_admits() {
        // max_players == 0 means no capacity limit at all.
        let (mut list, _, _) = waitlist(50_000, 0);

        let decision = list.client_login(&TestCandidate::standard(1));

        assert_eq!(decision, LoginDecision::Admitted { queued_slot: None });
        assert!(list.is_empty());
    }

    #[test]
    fn test_client_login_below_capacity_with_empty_queues_admits() {
        let (mut list, _, _) = waitlist(4, 10);

        assert!(list.client_login(&TestCandidate::standard(1)).is_admitted());
        assert!(list.is_empty());
    }

    #[test]
    fn test_client_login_newcomer_waits_behind_existing_queue() {
        // Free capacity is NOT a free pass while others are waiting:
        // a newcomer joins the back and gets their check on retry.
        let (mut list, occupancy, _) = waitlist(10, 10);
        assert!(!list.client_login(&TestCandidate::standard(1)).is_admitted());

        // A seat frees up, but player 1 is still queued ahead.
        occupancy.0.set(9);
        let decision = list.client_login(&TestCandidate::standard(2));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 2, retry_in_secs: 20 }
        );
    }

    // =====================================================================
    // New entries (step 5)
    // =====================================================================

    #[test]
    fn test_client_login_full_server_queues_standard_at_slot_one() {
        let (mut list, _, clock) = waitlist(1, 1);
        clock.advance_secs(100);

        let decision = list.client_login(&TestCandidate::standard(1));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 1, retry_in_secs: 20 }
        );
        // Stored deadline uses the undecorated 5-second delay — the
        // 15-second margin only ever appears in the advice.
        assert_eq!(list.deadline_of(PlayerId(1)), Some(100_000 + 5_000));
    }

    #[test]
    fn test_client_login_premium_ranks_ahead_of_waiting_standard() {
        // Standard player A queues first; premium B still takes slot 1.
        let (mut list, _, _) = waitlist(1, 1);
        list.client_login(&TestCandidate::standard(1));

        let decision = list.client_login(&TestCandidate::premium(2));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 1, retry_in_secs: 20 }
        );
        // A has been pushed back to rank 2.
        assert_eq!(list.position_of(PlayerId(1)).unwrap().slot, 2);
        assert_eq!(list.position_of(PlayerId(2)).unwrap().slot, 1);
    }

    #[test]
    fn test_client_login_deep_queue_gets_longer_delays() {
        let (mut list, _, _) = waitlist(100, 100);

        // Fill slots 1..=9, then check the 10th lands in the 20s band.
        for id in 1..=9 {
            list.client_login(&TestCandidate::standard(id));
        }
        let decision = list.client_login(&TestCandidate::standard(10));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 10, retry_in_secs: 35 }
        );
        assert_eq!(list.deadline_of(PlayerId(10)), Some(20_000));
    }

    // =====================================================================
    // Retries (step 4)
    // =====================================================================

    #[test]
    fn test_client_login_retry_while_full_refreshes_deadline() {
        let (mut list, _, clock) = waitlist(2, 2);
        list.client_login(&TestCandidate::standard(1));
        let first_deadline = list.deadline_of(PlayerId(1)).unwrap();

        clock.advance_secs(3);
        let decision = list.client_login(&TestCandidate::standard(1));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 1, retry_in_secs: 20 }
        );
        // Same slot, new window: old deadline + the 3 advanced seconds.
        assert_eq!(
            list.deadline_of(PlayerId(1)),
            Some(first_deadline + 3_000)
        );
        assert_eq!(list.len(), 1, "retry must not duplicate the entry");
    }

    #[test]
    fn test_client_login_retry_admits_when_capacity_frees() {
        let (mut list, occupancy, _) = waitlist(5, 5);
        list.client_login(&TestCandidate::standard(1));

        // Someone logs out; now online(4) + slot(1) <= max(5).
        occupancy.0.set(4);
        let decision = list.client_login(&TestCandidate::standard(1));

        assert_eq!(decision, LoginDecision::Admitted { queued_slot: Some(1) });
        assert!(list.is_empty(), "admitted entry must be removed");
    }

    #[test]
    fn test_client_login_retry_slot_counts_everyone_ahead() {
        // online(4) + slot(2) > max(5): one free seat isn't enough when
        // somebody else is ahead of you.
        let (mut list, occupancy, _) = waitlist(5, 5);
        list.client_login(&TestCandidate::standard(1));
        list.client_login(&TestCandidate::standard(2));

        occupancy.0.set(4);
        let decision = list.client_login(&TestCandidate::standard(2));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 2, retry_in_secs: 20 }
        );
    }

    // =====================================================================
    // Expiry (step 2)
    // =====================================================================

    #[test]
    fn test_client_login_expired_entries_removed_on_any_call() {
        // Player 1 queues, never retries. Once their window passes, any
        // other candidate's login sweeps them out.
        let (mut list, _, clock) = waitlist(1, 1);
        list.client_login(&TestCandidate::standard(1));

        clock.advance_secs(6); // past the 5-second slot-1 window
        list.client_login(&TestCandidate::standard(2));

        assert!(list.position_of(PlayerId(1)).is_none());
        // Player 2 inherits the freed slot 1.
        assert_eq!(list.position_of(PlayerId(2)).unwrap().slot, 1);
    }

    #[test]
    fn test_client_login_expired_candidate_rejoins_at_back() {
        let (mut list, _, clock) = waitlist(1, 1);
        list.client_login(&TestCandidate::standard(1));

        // Player 1's window lapses; player 2 queues; player 1 returns.
        clock.advance_secs(6);
        list.client_login(&TestCandidate::standard(2));
        let decision = list.client_login(&TestCandidate::standard(1));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 2, retry_in_secs: 20 }
        );
    }

    #[test]
    fn test_client_login_retry_within_window_keeps_slot() {
        let (mut list, _, clock) = waitlist(1, 1);
        list.client_login(&TestCandidate::standard(1));

        // 4 seconds in, still inside the 5-second window.
        clock.advance_secs(4);
        let decision = list.client_login(&TestCandidate::standard(1));

        assert_eq!(
            decision,
            LoginDecision::Wait { slot: 1, retry_in_secs: 20 }
        );
    }

    // =====================================================================
    // Invariants across call sequences
    // =====================================================================

    #[test]
    fn test_client_login_never_duplicates_a_player() {
        let (mut list, _, clock) = waitlist(1, 1);

        // Hammer the same candidates in mixed order with time passing.
        for round in 0..10 {
            for id in 1..=4 {
                let candidate = if id % 2 == 0 {
                    TestCandidate::premium(id)
                } else {
                    TestCandidate::standard(id)
                };
                list.client_login(&candidate);
            }
            if round % 3 == 2 {
                clock.advance_secs(7);
            }
        }

        // Every queued player holds exactly one entry: the number of
        // entries equals the number of distinct queued ids, and their
        // slots are a dense 1..=n.
        let mut slots: Vec<usize> = (1..=4)
            .filter_map(|id| list.position_of(PlayerId(id)))
            .map(|pos| pos.slot)
            .collect();
        assert_eq!(list.len(), slots.len());
        slots.sort_unstable();
        assert_eq!(slots, (1..=slots.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_client_login_priority_entries_always_outrank_standard() {
        let (mut list, _, _) = waitlist(1, 1);
        list.client_login(&TestCandidate::standard(1));
        list.client_login(&TestCandidate::premium(2));
        list.client_login(&TestCandidate::standard(3));
        list.client_login(&TestCandidate::premium(4));

        let premium_worst = [2, 4]
            .iter()
            .map(|&id| list.position_of(PlayerId(id)).unwrap().slot)
            .max()
            .unwrap();
        let standard_best = [1, 3]
            .iter()
            .map(|&id| list.position_of(PlayerId(id)).unwrap().slot)
            .min()
            .unwrap();

        assert!(premium_worst < standard_best);
    }

    #[test]
    fn test_advice_matches_wait_decision_fields() {
        let (mut list, _, _) = waitlist(1, 1);

        let decision = list.client_login(&TestCandidate::standard(1));
        let advice = decision.advice().unwrap();

        assert_eq!(advice.slot, 1);
        assert_eq!(advice.retry_in_secs, 20);
        assert!(list
            .client_login(&TestCandidate::with_override(2))
            .advice()
            .is_none());
    }
}
