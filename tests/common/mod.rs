//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use bracket_engine_web::{
    open_matches, resolve_by_code, BracketMatch, Entrant, EntrantId, Event, EventId, Format,
    MatchId, MatchKey, MatchOutcome, MatchStore, MemoryStore, NewMatch, StoreError,
};
use std::cell::Cell;

/// Event with `n` entrants named `E1..En`, seeded 1..n. Returns the ids in seed order.
pub fn seeded_event(store: &MemoryStore, format: Format, n: usize) -> (EventId, Vec<EntrantId>) {
    let mut event = Event::new("Test Open", format);
    let ids = (1..=n)
        .map(|s| event.add_entrant(format!("E{s}"), Some(s as u32)).unwrap())
        .collect();
    let id = store.insert_event(event).unwrap();
    (id, ids)
}

/// The match at `code`, panicking if it has not been created.
pub fn match_at(store: &MemoryStore, event_id: EventId, code: &str) -> BracketMatch {
    store
        .list_matches(event_id)
        .unwrap()
        .into_iter()
        .find(|m| m.key.to_string() == code)
        .unwrap_or_else(|| panic!("{code} not created"))
}

pub fn has_match(store: &MemoryStore, event_id: EventId, code: &str) -> bool {
    store
        .list_matches(event_id)
        .unwrap()
        .iter()
        .any(|m| m.key.to_string() == code)
}

pub fn codes(store: &MemoryStore, event_id: EventId) -> Vec<String> {
    store
        .list_matches(event_id)
        .unwrap()
        .iter()
        .map(|m| m.key.to_string())
        .collect()
}

/// Report `code` as won by the entrant holding `seed`.
pub fn report(store: &MemoryStore, event_id: EventId, code: &str, seed: u32) {
    resolve_by_code(store, event_id, code, seed, Some("test")).unwrap();
}

/// Report open matches until none are left, choosing winners with `pick`.
/// Returns the number of results reported.
pub fn play_out(
    store: &MemoryStore,
    event_id: EventId,
    pick: impl Fn(&BracketMatch) -> EntrantId,
) -> usize {
    let mut reported = 0;
    for _ in 0..256 {
        let open = open_matches(store, event_id).unwrap();
        let Some(next) = open.first() else {
            return reported;
        };
        let m = store.get_match(next.id).unwrap().unwrap();
        bracket_engine_web::report_result(store, m.id, pick(&m), None).unwrap();
        reported += 1;
    }
    panic!("bracket did not finish");
}

pub fn slot1_wins(m: &BracketMatch) -> EntrantId {
    m.slot1.entrant().unwrap()
}

pub fn slot2_wins(m: &BracketMatch) -> EntrantId {
    m.slot2.entrant().unwrap()
}

/// Store whose first `list_matches` call leaves out `hidden`, as if another
/// caller inserted those matches right after the snapshot was taken.
pub struct StaleSnapshot<'a> {
    pub inner: &'a MemoryStore,
    pub hidden: Vec<MatchKey>,
    served: Cell<bool>,
}

impl<'a> StaleSnapshot<'a> {
    pub fn new(inner: &'a MemoryStore, hidden: Vec<MatchKey>) -> Self {
        Self {
            inner,
            hidden,
            served: Cell::new(false),
        }
    }
}

impl MatchStore for StaleSnapshot<'_> {
    fn get_event(&self, event_id: EventId) -> Result<Option<Event>, StoreError> {
        self.inner.get_event(event_id)
    }

    fn list_entrants(&self, event_id: EventId) -> Result<Vec<Entrant>, StoreError> {
        self.inner.list_entrants(event_id)
    }

    fn list_matches(&self, event_id: EventId) -> Result<Vec<BracketMatch>, StoreError> {
        let mut matches = self.inner.list_matches(event_id)?;
        if !self.served.replace(true) {
            matches.retain(|m| !self.hidden.contains(&m.key));
        }
        Ok(matches)
    }

    fn get_match(&self, match_id: MatchId) -> Result<Option<BracketMatch>, StoreError> {
        self.inner.get_match(match_id)
    }

    fn create_match(&self, event_id: EventId, new: NewMatch) -> Result<MatchId, StoreError> {
        self.inner.create_match(event_id, new)
    }

    fn set_match_result(&self, match_id: MatchId, outcome: MatchOutcome) -> Result<(), StoreError> {
        self.inner.set_match_result(match_id, outcome)
    }
}
