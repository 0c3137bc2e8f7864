//! Storage collaborator: the only place match rows live between engine calls.

mod memory;

pub use memory::MemoryStore;

use crate::models::{BracketMatch, Entrant, Event, EventId, MatchId, MatchOutcome, NewMatch, StoreError};

/// Row storage for events and their matches.
///
/// Implementations must make `create_match` an atomic insert-if-absent on
/// `(event, bracket, round, match_number)` and `set_match_result` an atomic
/// "complete only if not completed". The engine treats [`StoreError::Conflict`]
/// and [`StoreError::AlreadyCompleted`] as benign races.
pub trait MatchStore {
    fn get_event(&self, event_id: EventId) -> Result<Option<Event>, StoreError>;

    fn list_entrants(&self, event_id: EventId) -> Result<Vec<Entrant>, StoreError>;

    /// All matches of the event, ordered by bracket, round, match number.
    fn list_matches(&self, event_id: EventId) -> Result<Vec<BracketMatch>, StoreError>;

    fn get_match(&self, match_id: MatchId) -> Result<Option<BracketMatch>, StoreError>;

    fn create_match(&self, event_id: EventId, new: NewMatch) -> Result<MatchId, StoreError>;

    fn set_match_result(&self, match_id: MatchId, outcome: MatchOutcome) -> Result<(), StoreError>;
}
