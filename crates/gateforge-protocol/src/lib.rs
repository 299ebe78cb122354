//! Shared identity and advice types for Gateforge.
//!
//! This crate defines the small vocabulary the rest of the stack speaks:
//!
//! - **Identity** ([`PlayerId`], [`AccountTier`]) — who a login candidate
//!   is and what privilege tier their account holds.
//! - **Advice** ([`WaitAdvice`]) — the "you are slot N, retry in M
//!   seconds" payload a host server relays to a refused client.
//! - **Errors** ([`ProtocolError`]) — what can go wrong when reading
//!   these types from configuration or client input.
//!
//! # Architecture
//!
//! This layer sits below the waitlist core. It doesn't know about queues
//! or capacity — it only knows how candidates and decisions are named and
//! serialized.
//!
//! ```text
//! Host server (embeds advice in its own protocol)
//!     ↕
//! Waitlist core (produces decisions)
//!     ↕
//! Protocol types (this crate)
//! ```

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{AccountTier, PlayerId, WaitAdvice};
