//! Setup phase: create the bracket for an event (Winners round 1 + BYE resolution).

use crate::logic::advance::{advance, create_match};
use crate::logic::bracket::plan_bracket;
use crate::logic::seeding::seed_map;
use crate::models::{EngineError, EventId};
use crate::store::MatchStore;

/// Create the opening round of an event's bracket, then advance through any BYE chains.
///
/// One-time: fails with `AlreadyExists` if the event has any match. Seeds must be
/// contiguous 1..N and there must be at least two entrants.
pub fn create_bracket<S: MatchStore + ?Sized>(store: &S, event_id: EventId) -> Result<(), EngineError> {
    let event = store
        .get_event(event_id)?
        .ok_or_else(|| EngineError::NotFound(format!("event {}", event_id)))?;
    if !store.list_matches(event_id)?.is_empty() {
        return Err(EngineError::AlreadyExists(event_id));
    }

    let entrants = store.list_entrants(event_id)?;
    let seeds = seed_map(&entrants)?;
    let plan = plan_bracket(event.format, entrants.len())?;

    let mut byes = 0;
    for new in plan.opening_matches(&seeds)? {
        byes += usize::from(new.slot2.is_bye());
        if !create_match(store, event_id, new)? {
            // A concurrent call got there first.
            return Err(EngineError::AlreadyExists(event_id));
        }
    }
    log::info!(
        "event {} ({}): bracket of {} for {} entrants created, {} bye(s)",
        event_id,
        event.format,
        plan.bracket_size,
        entrants.len(),
        byes
    );

    advance(store, event_id)?;
    Ok(())
}
