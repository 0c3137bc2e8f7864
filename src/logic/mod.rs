//! Bracket business logic: seeding, addressing, topology, advancement, results.

pub mod addressing;
mod advance;
mod bracket;
mod results;
mod roster;
mod seeding;
mod setup;
mod views;

pub use advance::{advance, AdvanceReport};
pub use bracket::{
    pair_consecutive, pair_cross, plan_bracket, BracketPlan, Feed, PlannedMatch, PlannedSlot,
    RoundPlan, RoundSource,
};
pub use results::{report_result, resolve_by_code};
pub use roster::{import_roster, parse_roster, RosterEntry};
pub use seeding::{next_power_of_two, pair_round_one, seed_map, seeded_positions};
pub use setup::create_bracket;
pub use views::{
    bracket_plan, bracket_status, list_bracket_matches, open_matches, BracketStatus, MatchView,
    SlotView,
};
