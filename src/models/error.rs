//! Errors raised by the engine and by the storage collaborator.

use crate::models::entrant::EntrantId;
use crate::models::event::EventId;
use crate::models::game::{MatchId, MatchKey};
use thiserror::Error;

/// Errors surfaced to callers of the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bracket preconditions unmet: missing/duplicate/non-contiguous seeds, too few entrants,
    /// unsupported format.
    #[error("setup error: {0}")]
    Setup(String),

    /// `create_bracket` called for an event that already has matches.
    #[error("a bracket already exists for event {0}")]
    AlreadyExists(EventId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A code, seed or event that does not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("roster import failed: {0}")]
    Roster(#[from] csv::Error),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Bad input on a report or a match code. Messages are meant to be shown to whoever typed it.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid match code `{code}`: {reason} (expected something like W1-02, L3-01 or GF-01)")]
    MalformedCode { code: String, reason: &'static str },

    #[error("unknown match {0}")]
    UnknownMatch(MatchId),

    #[error("match {code} is a BYE and is resolved automatically")]
    ByeMatch { code: String },

    #[error("winner {winner} is not in match {code} (expected one of {valid:?})")]
    WinnerNotInMatch {
        code: String,
        winner: EntrantId,
        valid: Vec<EntrantId>,
    },
}

/// Failures of the storage collaborator.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    /// Unique key `(event, bracket, round, match_number)` already taken.
    #[error("match {0} already exists")]
    Conflict(MatchKey),

    #[error("event {0} does not exist")]
    EventNotFound(EventId),

    #[error("match {0} does not exist")]
    MatchNotFound(MatchId),

    /// Conditional completion lost: the match was already completed.
    #[error("match {0} is already completed")]
    AlreadyCompleted(MatchId),

    #[error("store lock poisoned")]
    Poisoned,
}
