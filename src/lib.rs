//! Elimination bracket engine: library with models, storage seam and bracket logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    advance, bracket_plan, bracket_status, create_bracket, import_roster, list_bracket_matches,
    next_power_of_two, open_matches, parse_roster, plan_bracket, report_result, resolve_by_code,
    seeded_positions, AdvanceReport, BracketPlan, BracketStatus, MatchView, RosterEntry, SlotView,
};
pub use models::{
    Bracket, BracketMatch, EngineError, Entrant, EntrantId, Event, EventId, Format, MatchId,
    MatchKey, MatchOutcome, MatchStatus, NewMatch, RoundKey, Slot, StoreError, ValidationError,
};
pub use store::{MatchStore, MemoryStore};
