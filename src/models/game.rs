//! Match, its bracket address (bracket / round / match number) and slots.

use crate::models::entrant::EntrantId;
use crate::models::event::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which part of the tournament a match belongs to. Ordering is display order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    Winners,
    Losers,
    GrandFinals,
}

impl Bracket {
    /// Prefix used in match codes.
    pub fn letter(self) -> &'static str {
        match self {
            Bracket::Winners => "W",
            Bracket::Losers => "L",
            Bracket::GrandFinals => "GF",
        }
    }
}

/// A whole round: `(bracket, round)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RoundKey {
    pub bracket: Bracket,
    pub round: u32,
}

impl RoundKey {
    pub fn new(bracket: Bracket, round: u32) -> Self {
        Self { bracket, round }
    }

    pub fn winners(round: u32) -> Self {
        Self::new(Bracket::Winners, round)
    }

    pub fn losers(round: u32) -> Self {
        Self::new(Bracket::Losers, round)
    }

    /// Grand Finals is a single round; the reset match is its match 2.
    pub fn grand_finals() -> Self {
        Self::new(Bracket::GrandFinals, 1)
    }

    pub fn match_key(self, match_number: u32) -> MatchKey {
        MatchKey::new(self.bracket, self.round, match_number)
    }
}

/// Canonical address of a match, unique within an event. Renders as its code (`W1-02`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchKey {
    pub bracket: Bracket,
    pub round: u32,
    pub match_number: u32,
}

impl MatchKey {
    pub fn new(bracket: Bracket, round: u32, match_number: u32) -> Self {
        Self {
            bracket,
            round,
            match_number,
        }
    }
}

/// One side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "entrant")]
pub enum Slot {
    Entrant(EntrantId),
    /// No opponent: the other side advances without playing.
    Bye,
    /// Waiting on a feeder match. Only appears in planned (not yet created) matches.
    Unresolved,
}

impl Slot {
    pub fn entrant(self) -> Option<EntrantId> {
        match self {
            Slot::Entrant(id) => Some(id),
            Slot::Bye | Slot::Unresolved => None,
        }
    }

    pub fn is_bye(self) -> bool {
        self == Slot::Bye
    }
}

impl From<Option<EntrantId>> for Slot {
    fn from(id: Option<EntrantId>) -> Self {
        id.map(Slot::Entrant).unwrap_or(Slot::Bye)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// A persisted match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub event_id: EventId,
    pub key: MatchKey,
    pub slot1: Slot,
    pub slot2: Slot,
    pub status: MatchStatus,
    /// Set only once completed.
    pub winner: Option<EntrantId>,
    /// Set only once completed; stays empty for BYE matches.
    pub loser: Option<EntrantId>,
    pub is_bye: bool,
    /// Round whose results produced this match (None for the opening round).
    pub generated_from: Option<RoundKey>,
    pub reported_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reported_at: Option<DateTime<Utc>>,
}

impl BracketMatch {
    /// Materialize a new, pending match for an event.
    pub fn from_new(event_id: EventId, new: NewMatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            key: new.key,
            slot1: new.slot1,
            slot2: new.slot2,
            status: MatchStatus::Pending,
            winner: None,
            loser: None,
            is_bye: new.slot2.is_bye(),
            generated_from: new.generated_from,
            reported_by: None,
            created_at: Utc::now(),
            reported_at: None,
        }
    }

    pub fn code(&self) -> String {
        self.key.to_string()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Entrants occupying the two slots (BYE / unresolved slots skipped).
    pub fn participants(&self) -> Vec<EntrantId> {
        [self.slot1, self.slot2]
            .into_iter()
            .filter_map(Slot::entrant)
            .collect()
    }

    /// Apply an outcome in place (used by stores once the completion condition holds).
    pub fn complete(&mut self, outcome: MatchOutcome) {
        self.status = MatchStatus::Completed;
        self.winner = Some(outcome.winner);
        self.loser = outcome.loser;
        self.reported_by = outcome.reported_by;
        self.reported_at = Some(outcome.reported_at);
    }
}

/// Insert request for a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewMatch {
    pub key: MatchKey,
    pub slot1: Slot,
    pub slot2: Slot,
    pub generated_from: Option<RoundKey>,
}

/// Result written to a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchOutcome {
    pub winner: EntrantId,
    pub loser: Option<EntrantId>,
    pub reported_by: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl MatchOutcome {
    /// System resolution of a BYE: the occupant wins, nobody loses.
    pub fn bye(winner: EntrantId) -> Self {
        Self {
            winner,
            loser: None,
            reported_by: None,
            reported_at: Utc::now(),
        }
    }

    pub fn reported(winner: EntrantId, loser: EntrantId, reported_by: Option<String>) -> Self {
        Self {
            winner,
            loser: Some(loser),
            reported_by,
            reported_at: Utc::now(),
        }
    }
}
