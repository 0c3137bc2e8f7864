//! Data structures for the bracket engine: entrants, events, matches, errors.

mod entrant;
mod error;
mod event;
mod game;

pub use entrant::{Entrant, EntrantId};
pub use error::{EngineError, StoreError, ValidationError};
pub use event::{Event, EventId, Format};
pub use game::{
    Bracket, BracketMatch, MatchId, MatchKey, MatchOutcome, MatchStatus, NewMatch, RoundKey, Slot,
};
