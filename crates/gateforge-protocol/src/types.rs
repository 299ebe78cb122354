//! Core identity and advice types.
//!
//! These are the structures that cross crate boundaries: the waitlist
//! core consumes identities and produces advice, and a host server
//! embeds both in whatever wire protocol it speaks to its clients.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// This is a "newtype wrapper" — a common Rust pattern where you wrap a
/// primitive type (here `u64`) in a named struct. You can't accidentally
/// pass a raw count where a `PlayerId` is expected, and function
/// signatures like `fn position_of(player: PlayerId)` read clearly.
///
/// The `#[serde(transparent)]` attribute tells serde to serialize this as
/// just the inner `u64`, so a `PlayerId(42)` becomes `42` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// Display lets us use `{}` in format strings and logging.
/// `tracing::info!("player {} queued", player_id)` prints "player P-42 queued".
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountTier
// ---------------------------------------------------------------------------

/// The privilege tier of a player's account.
///
/// Tiers form a strict ladder — the derived `Ord` follows declaration
/// order, so `Normal < Tutor < SeniorTutor < Gamemaster < God`. Admission
/// control only ever asks one question of this ladder: is the account
/// gamemaster-or-above? Those accounts skip the login queue entirely.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AccountTier {
    /// A regular player account.
    Normal,

    /// A player trusted to answer help-channel questions.
    Tutor,

    /// A tutor with moderation powers in the help channel.
    SeniorTutor,

    /// Staff account with in-game enforcement powers.
    Gamemaster,

    /// Server-owner account. Outranks everything.
    God,
}

impl AccountTier {
    /// Returns `true` for tiers that bypass admission control
    /// (gamemaster-or-above).
    pub fn is_privileged(self) -> bool {
        self >= Self::Gamemaster
    }
}

impl fmt::Display for AccountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Tutor => write!(f, "Tutor"),
            Self::SeniorTutor => write!(f, "SeniorTutor"),
            Self::Gamemaster => write!(f, "Gamemaster"),
            Self::God => write!(f, "God"),
        }
    }
}

/// Case-insensitive parsing, for tier names read from configuration
/// files or an account database.
impl FromStr for AccountTier {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "tutor" => Ok(Self::Tutor),
            "seniortutor" | "senior_tutor" => Ok(Self::SeniorTutor),
            "gamemaster" => Ok(Self::Gamemaster),
            "god" => Ok(Self::God),
            _ => Err(ProtocolError::UnknownTier(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WaitAdvice
// ---------------------------------------------------------------------------

/// What a refused login candidate should be told.
///
/// When the server is full, the waitlist answers with a queue slot and a
/// retry delay. The host server relays this to the client ("too many
/// players online, you are at place N — please retry in M seconds").
///
/// `retry_in_secs` already includes the 15-second safety margin on top of
/// the per-slot base delay, so clients that retry exactly when told still
/// land inside their reserved window despite network latency and local
/// timer drift. Hosts should relay it as-is, not add their own padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitAdvice {
    /// 1-based position across both queues (priority entries first).
    pub slot: usize,

    /// How long the client should wait before retrying, in seconds.
    pub retry_in_secs: u64,
}

// =========================================================================
// Tests
// =========================================================================
