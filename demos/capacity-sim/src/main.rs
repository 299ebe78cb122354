//! Capacity simulation: a full server, a burst of logins, and the queue
//! draining as players log out.
//!
//! Time is simulated — the clock only moves when the sim advances it, so
//! the whole run finishes instantly while still exercising real retry
//! windows and expiry. Run with:
//!
//! ```text
//! RUST_LOG=info cargo run -p capacity-sim
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gateforge::prelude::*;

// ---------------------------------------------------------------------------
// Simulated world
// ---------------------------------------------------------------------------

/// A clock the simulation advances by hand.
#[derive(Clone, Default)]
struct SimClock(Arc<AtomicU64>);

impl SimClock {
    fn advance_secs(&self, secs: u64) {
        self.0.fetch_add(secs * 1_000, Ordering::Relaxed);
    }
}

impl Clock for SimClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

struct SimPlayer {
    id: PlayerId,
    name: &'static str,
    premium: bool,
    tier: AccountTier,
}

impl LoginCandidate for SimPlayer {
    fn player_id(&self) -> PlayerId {
        self.id
    }
    fn can_always_login(&self) -> bool {
        false
    }
    fn account_tier(&self) -> AccountTier {
        self.tier
    }
    fn is_premium(&self) -> bool {
        self.premium
    }
}

fn roster() -> Vec<SimPlayer> {
    let cast: [(&'static str, bool, AccountTier); 9] = [
        ("Aldor", false, AccountTier::Normal),
        ("Brin", true, AccountTier::Normal),
        ("Cassia", false, AccountTier::Normal),
        ("Dorn", false, AccountTier::Normal),
        ("Elara", true, AccountTier::Normal),
        ("Fenwick", false, AccountTier::Normal),
        ("Grimm", true, AccountTier::Normal),
        ("Hestia", false, AccountTier::Normal),
        ("Morrigan", false, AccountTier::Gamemaster),
    ];
    cast.iter()
        .enumerate()
        .map(|(i, &(name, premium, tier))| SimPlayer {
            id: PlayerId(i as u64 + 1),
            name,
            premium,
            tier,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let online = Arc::new(OnlineCounter::new(3));
    let clock = SimClock::default();
    let gate = LoginGate::with_clock(
        GateConfig { max_players: 3 },
        Arc::clone(&online),
        clock.clone(),
    );

    tracing::info!("server full at 3/3 — a login burst arrives");

    // Every refused player remembers when they were told to come back.
    // (player index, sim-time in seconds at which to retry)
    let mut pending: Vec<(usize, u64)> = Vec::new();
    let players = roster();
    for (i, player) in players.iter().enumerate() {
        match gate.client_login(player).await {
            LoginDecision::Admitted { .. } => {
                tracing::info!(name = player.name, "admitted immediately");
                online.player_joined();
            }
            LoginDecision::Wait { slot, retry_in_secs } => {
                tracing::info!(
                    name = player.name,
                    slot,
                    retry_in_secs,
                    premium = player.premium,
                    "refused, waiting"
                );
                pending.push((i, retry_in_secs));
            }
        }
    }

    // Rounds: one player logs out, time jumps to the earliest advised
    // retry, and everyone due retries in the order they were advised.
    let mut elapsed: u64 = 0;
    for round in 1.. {
        if pending.is_empty() {
            break;
        }

        online.player_left();
        let due = pending.iter().map(|&(_, at)| at).min().unwrap();
        clock.advance_secs(due - elapsed);
        elapsed = due;
        tracing::info!(round, sim_secs = elapsed, "a player logged out");

        let retrying: Vec<(usize, u64)> = std::mem::take(&mut pending);
        for (i, at) in retrying {
            if at > elapsed {
                pending.push((i, at));
                continue;
            }
            let player = &players[i];
            match gate.client_login(player).await {
                LoginDecision::Admitted { queued_slot } => {
                    tracing::info!(
                        name = player.name,
                        from_slot = queued_slot,
                        "admitted from the waitlist"
                    );
                    online.player_joined();
                }
                LoginDecision::Wait { slot, retry_in_secs } => {
                    tracing::info!(
                        name = player.name,
                        slot,
                        retry_in_secs,
                        "still waiting"
                    );
                    pending.push((i, elapsed + retry_in_secs));
                }
            }
        }
    }

    tracing::info!(
        online = online.current_player_count(),
        waiting = gate.queued_len().await,
        "simulation complete — queue drained"
    );
}
