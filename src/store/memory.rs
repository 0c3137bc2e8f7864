//! In-memory store: many events by id, each with its match table.

use crate::models::{
    BracketMatch, EngineError, Entrant, Event, EventId, MatchId, MatchOutcome, NewMatch, StoreError,
};
use crate::store::MatchStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// Per-event entry: event data + its matches.
#[derive(Debug)]
struct EventRecord {
    event: Event,
    matches: Vec<BracketMatch>,
}

/// Thread-safe store backed by a single `RwLock`. Every mutation (insert-if-absent,
/// conditional completion) happens under the write guard, which gives the atomicity
/// the engine relies on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<EventId, EventRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event (roster included). Returns its id.
    pub fn insert_event(&self, event: Event) -> Result<EventId, StoreError> {
        let mut g = self.events.write().map_err(|_| StoreError::Poisoned)?;
        let id = event.id;
        g.insert(
            id,
            EventRecord {
                event,
                matches: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Edit an event in place. The roster is frozen once any match exists.
    pub fn update_event<T>(
        &self,
        event_id: EventId,
        f: impl FnOnce(&mut Event) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut g = self.events.write().map_err(|_| StoreError::Poisoned)?;
        let record = g
            .get_mut(&event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        if !record.matches.is_empty() {
            return Err(EngineError::Setup(
                "the roster is locked once the bracket has been created".into(),
            ));
        }
        f(&mut record.event)
    }

    /// All events, oldest first.
    pub fn events(&self) -> Result<Vec<Event>, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Poisoned)?;
        let mut events: Vec<Event> = g.values().map(|r| r.event.clone()).collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }
}

impl MatchStore for MemoryStore {
    fn get_event(&self, event_id: EventId) -> Result<Option<Event>, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.get(&event_id).map(|r| r.event.clone()))
    }

    fn list_entrants(&self, event_id: EventId) -> Result<Vec<Entrant>, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Poisoned)?;
        g.get(&event_id)
            .map(|r| r.event.entrants.clone())
            .ok_or(StoreError::EventNotFound(event_id))
    }

    fn list_matches(&self, event_id: EventId) -> Result<Vec<BracketMatch>, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Poisoned)?;
        let record = g.get(&event_id).ok_or(StoreError::EventNotFound(event_id))?;
        let mut matches = record.matches.clone();
        matches.sort_by_key(|m| m.key);
        Ok(matches)
    }

    fn get_match(&self, match_id: MatchId) -> Result<Option<BracketMatch>, StoreError> {
        let g = self.events.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.values()
            .flat_map(|r| r.matches.iter())
            .find(|m| m.id == match_id)
            .cloned())
    }

    fn create_match(&self, event_id: EventId, new: NewMatch) -> Result<MatchId, StoreError> {
        let mut g = self.events.write().map_err(|_| StoreError::Poisoned)?;
        let record = g
            .get_mut(&event_id)
            .ok_or(StoreError::EventNotFound(event_id))?;
        if record.matches.iter().any(|m| m.key == new.key) {
            return Err(StoreError::Conflict(new.key));
        }
        let m = BracketMatch::from_new(event_id, new);
        let id = m.id;
        record.matches.push(m);
        Ok(id)
    }

    fn set_match_result(&self, match_id: MatchId, outcome: MatchOutcome) -> Result<(), StoreError> {
        let mut g = self.events.write().map_err(|_| StoreError::Poisoned)?;
        let m = g
            .values_mut()
            .flat_map(|r| r.matches.iter_mut())
            .find(|m| m.id == match_id)
            .ok_or(StoreError::MatchNotFound(match_id))?;
        if m.is_completed() {
            return Err(StoreError::AlreadyCompleted(match_id));
        }
        m.complete(outcome);
        Ok(())
    }
}
