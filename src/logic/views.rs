//! Read-side views of an event's bracket (for rendering / inspection).

use crate::logic::advance::{champion, plan_for, BracketState};
use crate::logic::bracket::{plan_bracket, BracketPlan};
use crate::models::{
    Bracket, BracketMatch, EngineError, Entrant, EntrantId, Event, EventId, Format, MatchId,
    MatchStatus, RoundKey, Slot,
};
use crate::store::MatchStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One slot with the entrant's name and seed filled in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SlotView {
    pub entrant_id: Option<EntrantId>,
    pub name: Option<String>,
    pub seed: Option<u32>,
    pub is_bye: bool,
}

impl SlotView {
    fn new(slot: Slot, entrants: &[Entrant]) -> Self {
        let entrant = slot
            .entrant()
            .and_then(|id| entrants.iter().find(|e| e.id == id));
        Self {
            entrant_id: slot.entrant(),
            name: entrant.map(|e| e.name.clone()),
            seed: entrant.and_then(|e| e.seed),
            is_bye: slot.is_bye(),
        }
    }
}

/// A match as shown to people: code, names, seeds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub code: String,
    pub bracket: Bracket,
    pub round: u32,
    pub match_number: u32,
    pub slot1: SlotView,
    pub slot2: SlotView,
    pub status: MatchStatus,
    pub winner: Option<EntrantId>,
    pub loser: Option<EntrantId>,
    pub is_bye: bool,
    pub generated_from: Option<RoundKey>,
    pub reported_by: Option<String>,
    pub reported_at: Option<DateTime<Utc>>,
}

impl MatchView {
    pub fn new(m: &BracketMatch, entrants: &[Entrant]) -> Self {
        Self {
            id: m.id,
            code: m.code(),
            bracket: m.key.bracket,
            round: m.key.round,
            match_number: m.key.match_number,
            slot1: SlotView::new(m.slot1, entrants),
            slot2: SlotView::new(m.slot2, entrants),
            status: m.status,
            winner: m.winner,
            loser: m.loser,
            is_bye: m.is_bye,
            generated_from: m.generated_from,
            reported_by: m.reported_by.clone(),
            reported_at: m.reported_at,
        }
    }
}

/// Progress summary of an event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketStatus {
    pub event_id: EventId,
    pub format: Format,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub open_matches: usize,
    pub champion: Option<EntrantId>,
    pub champion_name: Option<String>,
}

impl BracketStatus {
    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }
}

fn load_event<S: MatchStore + ?Sized>(store: &S, event_id: EventId) -> Result<Event, EngineError> {
    store
        .get_event(event_id)?
        .ok_or_else(|| EngineError::NotFound(format!("event {}", event_id)))
}

/// Every match of the event, Winners then Losers then Grand Finals, by round and number.
pub fn list_bracket_matches<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
) -> Result<Vec<MatchView>, EngineError> {
    let event = load_event(store, event_id)?;
    let mut matches = store.list_matches(event_id)?;
    matches.sort_by_key(|m| m.key);
    Ok(matches
        .iter()
        .map(|m| MatchView::new(m, &event.entrants))
        .collect())
}

/// Matches waiting for a result.
pub fn open_matches<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
) -> Result<Vec<MatchView>, EngineError> {
    Ok(list_bracket_matches(store, event_id)?
        .into_iter()
        .filter(|m| m.status == MatchStatus::Pending)
        .collect())
}

pub fn bracket_status<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
) -> Result<BracketStatus, EngineError> {
    let event = load_event(store, event_id)?;
    let matches = store.list_matches(event_id)?;
    let completed_matches = matches.iter().filter(|m| m.is_completed()).count();
    let total_matches = matches.len();
    let state = BracketState::new(matches);

    let champion = if state.is_empty() {
        None
    } else {
        let plan = plan_for(event.format, event.entrants.len(), &state)?;
        champion(&plan, &state)
    };
    Ok(BracketStatus {
        event_id,
        format: event.format,
        total_matches,
        completed_matches,
        open_matches: total_matches - completed_matches,
        champion,
        champion_name: champion
            .and_then(|id| event.entrant(id))
            .map(|e| e.name.clone()),
    })
}

/// Nominal topology for the event's current roster.
pub fn bracket_plan<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
) -> Result<BracketPlan, EngineError> {
    let event = load_event(store, event_id)?;
    plan_bracket(event.format, event.entrants.len())
}
