//! Advancement engine: creates every match whose feeding rounds are complete.
//!
//! Stateless between calls. Each pass loads the event's matches into an arena keyed
//! by `(bracket, round, match_number)`, walks the plan in dependency order and
//! creates what became unlockable. Passes repeat until one makes no progress, so
//! BYE chains resolve within a single call. Running it again without new results
//! is a no-op.

use crate::logic::bracket::{
    pair_consecutive, pair_cross, plan_bracket, BracketPlan, Feed, RoundPlan, RoundSource,
};
use crate::models::{
    Bracket, BracketMatch, EngineError, EntrantId, EventId, Format, MatchId, MatchKey,
    MatchOutcome, NewMatch, RoundKey, Slot, StoreError,
};
use crate::store::MatchStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// What one `advance` call did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AdvanceReport {
    pub passes: u32,
    pub matches_created: usize,
    pub byes_resolved: usize,
}

/// Arena of an event's matches for one pass.
pub(crate) struct BracketState {
    matches: BTreeMap<MatchKey, BracketMatch>,
}

impl BracketState {
    pub(crate) fn new(matches: Vec<BracketMatch>) -> Self {
        Self {
            matches: matches.into_iter().map(|m| (m.key, m)).collect(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub(crate) fn get(&self, key: MatchKey) -> Option<&BracketMatch> {
        self.matches.get(&key)
    }

    pub(crate) fn round(&self, key: RoundKey) -> impl Iterator<Item = &BracketMatch> {
        self.matches
            .range(key.match_key(0)..=key.match_key(u32::MAX))
            .map(|(_, m)| m)
    }

    /// Round exists and every match in it is completed.
    pub(crate) fn round_complete(&self, key: RoundKey) -> bool {
        let mut round = self.round(key).peekable();
        round.peek().is_some() && round.all(BracketMatch::is_completed)
    }

    fn winners(&self, key: RoundKey) -> Vec<EntrantId> {
        self.round(key)
            .filter_map(|m| m.winner.or_else(|| m.slot1.entrant()))
            .collect()
    }

    fn losers(&self, key: RoundKey) -> Vec<EntrantId> {
        self.round(key)
            .filter(|m| !m.is_bye)
            .filter_map(|m| m.loser)
            .collect()
    }

    fn feed(&self, feed: Feed) -> Vec<EntrantId> {
        match feed {
            Feed::Winners(r) => self.winners(r),
            Feed::Losers(r) => self.losers(r),
        }
    }

    /// Pending matches with a BYE in slot 2, left behind by an interrupted creator.
    fn pending_byes(&self) -> Vec<(MatchId, MatchKey, EntrantId)> {
        self.matches
            .values()
            .filter(|m| !m.is_completed() && m.slot2.is_bye())
            .filter_map(|m| m.slot1.entrant().map(|e| (m.id, m.key, e)))
            .collect()
    }

    /// Match count of Winners round 1, times two.
    fn bracket_size(&self) -> usize {
        self.round(RoundKey::winners(1)).count() * 2
    }
}

/// Advance the event's bracket to a fixed point.
pub fn advance<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
) -> Result<AdvanceReport, EngineError> {
    let event = store
        .get_event(event_id)?
        .ok_or_else(|| EngineError::NotFound(format!("event {}", event_id)))?;
    let mut report = AdvanceReport::default();
    let mut state = BracketState::new(store.list_matches(event_id)?);
    if state.is_empty() {
        // No bracket yet.
        return Ok(report);
    }
    let plan = plan_for(event.format, event.entrants.len(), &state)?;

    loop {
        report.passes += 1;

        let mut progressed = false;
        for (id, key, winner) in state.pending_byes() {
            if resolve_bye(store, id, key, winner)? {
                report.byes_resolved += 1;
                progressed = true;
            }
        }

        // Rounds touched in this pass are stale in the snapshot; their dependents wait a pass.
        let mut touched: HashSet<RoundKey> = HashSet::new();
        for round in plan.rounds.iter().filter(|r| r.source != RoundSource::Seeding) {
            let Some(pairs) = unlock(&plan, &state, round, &touched) else {
                continue;
            };
            let mut created = 0;
            let mut stale = false;
            for (new, bye) in planned_new_matches(round, pairs) {
                if state.get(new.key).is_some() {
                    continue;
                }
                if create_match(store, event_id, new)? {
                    created += 1;
                    report.byes_resolved += usize::from(bye);
                } else {
                    stale = true;
                }
            }
            if stale {
                // Another caller created part of this round after the snapshot was taken.
                touched.insert(round.key);
                progressed = true;
            }
            if created > 0 {
                log::info!(
                    "event {}: created {} match(es) in {}",
                    event_id,
                    created,
                    round_label(round.key)
                );
                report.matches_created += created;
                touched.insert(round.key);
                progressed = true;
            }
        }

        if let Some(reset) = reset_match(&plan, &state) {
            if create_match(store, event_id, reset)? {
                log::info!("event {}: bracket reset, GF-02 created", event_id);
                report.matches_created += 1;
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
        state = BracketState::new(store.list_matches(event_id)?);
    }

    log::debug!(
        "event {}: advance finished after {} pass(es): {} created, {} byes resolved",
        event_id,
        report.passes,
        report.matches_created,
        report.byes_resolved
    );
    Ok(report)
}

/// Plan for an event whose bracket already exists; the roster must still match the opening round.
pub(crate) fn plan_for(
    format: Format,
    entrants: usize,
    state: &BracketState,
) -> Result<BracketPlan, EngineError> {
    let plan = plan_bracket(format, entrants)?;
    if plan.bracket_size != state.bracket_size() {
        return Err(EngineError::Setup(format!(
            "roster of {} entrants does not match the existing bracket of size {}",
            entrants,
            state.bracket_size()
        )));
    }
    Ok(plan)
}

/// Pairings for `round` if all of its feeding rounds are complete (and were not
/// modified earlier in this pass), `None` otherwise.
fn unlock(
    plan: &BracketPlan,
    state: &BracketState,
    round: &RoundPlan,
    touched: &HashSet<RoundKey>,
) -> Option<Vec<(Slot, Slot)>> {
    let ready = round
        .source
        .dependencies()
        .into_iter()
        .all(|dep| !touched.contains(&dep) && dependency_ready(plan, state, dep));
    if !ready {
        return None;
    }
    pairings(state, round)
}

/// Every match of `dep` is visible in the snapshot and completed.
fn dependency_ready(plan: &BracketPlan, state: &BracketState, dep: RoundKey) -> bool {
    if !state.round_complete(dep) {
        return false;
    }
    let expected = match plan.round(dep) {
        Some(r) if r.source == RoundSource::Seeding => r.matches.len(),
        Some(r) => pairings(state, r).map_or(0, |p| p.len()),
        None => return false,
    };
    state.round(dep).count() == expected
}

/// Pairings a round gets from the current contents of its feeds.
fn pairings(state: &BracketState, round: &RoundPlan) -> Option<Vec<(Slot, Slot)>> {
    match round.source {
        RoundSource::Seeding => None,
        RoundSource::Pair { feed } => Some(pair_consecutive(&state.feed(feed))),
        RoundSource::Cross { left, right } => {
            Some(pair_cross(&state.feed(left), &state.feed(right)))
        }
    }
}

/// Number the pairings of a round. The flag tells whether the match is a BYE.
fn planned_new_matches(round: &RoundPlan, pairs: Vec<(Slot, Slot)>) -> Vec<(NewMatch, bool)> {
    pairs
        .into_iter()
        .zip(1..)
        .map(|((slot1, slot2), n)| {
            (
                NewMatch {
                    key: round.key.match_key(n),
                    slot1,
                    slot2,
                    generated_from: round.source.generated_from(),
                },
                slot2.is_bye(),
            )
        })
        .collect()
}

/// GF-02 once GF-01 went to the Losers-side entrant.
fn reset_match(plan: &BracketPlan, state: &BracketState) -> Option<NewMatch> {
    let reset = plan.reset.as_ref()?;
    let gf = RoundKey::grand_finals();
    let first = state.get(gf.match_key(1))?;
    if !first.is_completed() || state.get(reset.key).is_some() {
        return None;
    }
    let losers_side = first.slot2.entrant()?;
    if first.winner != Some(losers_side) {
        return None;
    }
    Some(NewMatch {
        key: reset.key,
        slot1: first.slot1,
        slot2: first.slot2,
        generated_from: Some(gf),
    })
}

/// Insert a match, resolving it at once when slot 2 is a BYE. Returns `false` when
/// another caller created the same match first.
pub(crate) fn create_match<S: MatchStore + ?Sized>(
    store: &S,
    event_id: EventId,
    new: NewMatch,
) -> Result<bool, EngineError> {
    let key = new.key;
    let bye_winner = match (new.slot1, new.slot2) {
        (Slot::Entrant(e), Slot::Bye) => Some(e),
        _ => None,
    };
    match store.create_match(event_id, new) {
        Ok(id) => {
            log::debug!("event {}: created {}", event_id, key);
            if let Some(winner) = bye_winner {
                resolve_bye(store, id, key, winner)?;
            }
            Ok(true)
        }
        Err(StoreError::Conflict(_)) => {
            log::debug!("event {}: {} already exists, skipping", event_id, key);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Complete a BYE match for its sole occupant. Returns `false` if it was already completed.
fn resolve_bye<S: MatchStore + ?Sized>(
    store: &S,
    id: MatchId,
    key: MatchKey,
    winner: EntrantId,
) -> Result<bool, EngineError> {
    match store.set_match_result(id, MatchOutcome::bye(winner)) {
        Ok(()) => {
            log::debug!("{} resolved as a BYE", key);
            Ok(true)
        }
        Err(StoreError::AlreadyCompleted(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Winner of the tournament, once its terminal match is decided.
pub(crate) fn champion(plan: &BracketPlan, state: &BracketState) -> Option<EntrantId> {
    match plan.format {
        Format::SingleElim => state
            .get(plan.winners_final().match_key(1))
            .filter(|m| m.is_completed())
            .and_then(|m| m.winner),
        Format::DoubleElim => {
            let gf = RoundKey::grand_finals();
            let first = state.get(gf.match_key(1)).filter(|m| m.is_completed())?;
            if first.winner.is_some() && first.winner == first.slot2.entrant() {
                state
                    .get(gf.match_key(2))
                    .filter(|m| m.is_completed())
                    .and_then(|m| m.winner)
            } else {
                first.winner
            }
        }
    }
}

fn round_label(key: RoundKey) -> String {
    match key.bracket {
        Bracket::GrandFinals => "Grand Finals".to_string(),
        b => format!("{}{}", b.letter(), key.round),
    }
}
