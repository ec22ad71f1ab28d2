//! Error types surfaced by the dial engine.

use thiserror::Error;

/// Smallest list the five-row window can show without repeating an item.
pub const MIN_ITEMS: usize = 5;

/// Configuration errors.  The engine never enters a half-updated state when
/// one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialError {
    #[error("the minimum list size for a dial picker is 5, got {len}")]
    ListTooShort { len: usize },

    #[error("a circular counter needs a non-empty range")]
    EmptyRange,
}

/// Failure to fire a haptic pulse.  Always swallowed by the notifier.
#[derive(Debug, Error)]
pub enum HapticsError {
    #[error("no haptic device available")]
    Unavailable,

    #[error("haptic device i/o: {0}")]
    Io(#[from] std::io::Error),
}
