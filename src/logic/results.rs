//! Result recording: validate one outcome, persist it, advance the bracket.

use crate::logic::advance::advance;
use crate::logic::addressing::decode;
use crate::models::{
    EngineError, EntrantId, EventId, MatchId, MatchOutcome, Slot, StoreError, ValidationError,
};
use crate::store::MatchStore;

/// Record `winner` for a match and advance its event.
///
/// Reporting a match that is already completed changes nothing: the call only
/// re-runs advancement, in case an earlier call stopped before creating successors.
pub fn report_result<S: MatchStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    winner: EntrantId,
    reported_by: Option<&str>,
) -> Result<(), EngineError> {
    let m = store
        .get_match(match_id)?
        .ok_or(ValidationError::UnknownMatch(match_id))?;

    if m.is_bye {
        return Err(ValidationError::ByeMatch { code: m.code() }.into());
    }
    if m.is_completed() {
        log::debug!("{} already completed, report ignored", m.code());
        advance(store, m.event_id)?;
        return Ok(());
    }

    let loser = match (m.slot1, m.slot2) {
        (Slot::Entrant(a), Slot::Entrant(b)) if winner == a => b,
        (Slot::Entrant(a), Slot::Entrant(b)) if winner == b => a,
        _ => {
            return Err(ValidationError::WinnerNotInMatch {
                code: m.code(),
                winner,
                valid: m.participants(),
            }
            .into())
        }
    };

    let outcome = MatchOutcome::reported(winner, loser, reported_by.map(str::to_owned));
    match store.set_match_result(match_id, outcome) {
        Ok(()) => log::info!("event {}: {} won by {}", m.event_id, m.code(), winner),
        Err(StoreError::AlreadyCompleted(_)) => {
            log::debug!("{} completed concurrently, report ignored", m.code())
        }
        Err(e) => return Err(e.into()),
    }

    advance(store, m.event_id)?;
    Ok(())
}

/// Report by match code and winner seed, as typed by a person. Returns the match id.
pub fn resolve_by_code<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
    code: &str,
    winner_seed: u32,
    reported_by: Option<&str>,
) -> Result<MatchId, EngineError> {
    let key = decode(code)?;
    store
        .get_event(event_id)?
        .ok_or_else(|| EngineError::NotFound(format!("event {}", event_id)))?;
    let m = store
        .list_matches(event_id)?
        .into_iter()
        .find(|m| m.key == key)
        .ok_or_else(|| EngineError::NotFound(format!("match {} in event {}", key, event_id)))?;
    let winner = store
        .list_entrants(event_id)?
        .into_iter()
        .find(|e| e.seed == Some(winner_seed))
        .map(|e| e.id)
        .ok_or_else(|| {
            EngineError::NotFound(format!("seed {} in event {}", winner_seed, event_id))
        })?;

    report_result(store, m.id, winner, reported_by)?;
    Ok(m.id)
}
