// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed simulation errors.
//!
//! Every engine raises the same small set of message-carrying errors. The
//! message text is part of the contract: tests assert on exact strings, so
//! `Display` is the carried message and nothing else.

use thiserror::Error;

/// Domain errors raised by simulation engines.
///
/// Failure is always "this call's preconditions were not met" or "this
/// resource was not found" — nothing is retried, recovered, or downgraded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// A required argument is missing, empty, or malformed. Raised before
    /// any store mutation.
    #[error("{0}")]
    InvalidInput(String),

    /// An argument failed schema-level validation.
    #[error("{0}")]
    Validation(String),

    /// The referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The referenced subscription does not exist (appconfig lookups).
    #[error("{0}")]
    SubscriptionNotFound(String),

    /// The operation conflicts with current resource state (e.g. locked).
    #[error("{0}")]
    Conflict(String),

    /// The simulation itself failed in an unexpected way.
    #[error("{0}")]
    Service(String),
}

/// Result alias used throughout the engines.
pub type SimResult<T> = Result<T, SimError>;

/// Reject empty or whitespace-only required string arguments.
pub fn require_nonempty(value: &str, message: &str) -> SimResult<()> {
    if value.trim().is_empty() {
        return Err(SimError::InvalidInput(message.to_string()));
    }
    Ok(())
}
