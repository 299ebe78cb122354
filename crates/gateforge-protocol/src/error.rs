//! Error types for the protocol layer.
//!
//! Each crate in Gateforge defines its own error enum where its
//! operations can actually fail. The waitlist core deliberately has
//! none — every login attempt produces a definite decision — so the
//! only fallible surface down here is parsing.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An account tier name wasn't recognized.
    ///
    /// This happens when reading tier names from configuration files or
    /// an account database — e.g. a typo like `"gamemastr"`. The inner
    /// string is the offending input, preserved for the log line.
    #[error("unknown account tier: {0}")]
    UnknownTier(String),
}
