//! Bracket topology for a format and roster size.
//!
//! The plan lists every round in dependency order together with where its
//! entrants come from. Rounds are only materialized later by the advancement
//! engine, which pairs the *actual* winners/losers of the feeding rounds; the
//! per-match slot sources in the plan are the nominal layout (used for display).

use crate::logic::seeding::{next_power_of_two, pair_round_one};
use crate::models::{
    Bracket, EngineError, EntrantId, Format, MatchKey, NewMatch, RoundKey, Slot,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One list of entrants produced by a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "take", content = "from")]
pub enum Feed {
    /// Winners of the round, in match order.
    Winners(RoundKey),
    /// Losers of the round's non-BYE matches, in match order.
    Losers(RoundKey),
}

impl Feed {
    pub fn round(self) -> RoundKey {
        match self {
            Feed::Winners(r) | Feed::Losers(r) => r,
        }
    }

    fn slot(self, match_number: u32) -> PlannedSlot {
        match self {
            Feed::Winners(r) => PlannedSlot::WinnerOf(r.match_key(match_number)),
            Feed::Losers(r) => PlannedSlot::LoserOf(r.match_key(match_number)),
        }
    }
}

/// How a round's pairings are formed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RoundSource {
    /// Winners round 1, placed by seed.
    Seeding,
    /// Consecutive pairs of a single feed (odd leftover gets a BYE).
    Pair { feed: Feed },
    /// `left[i]` vs `right[i]`; the shorter side is padded with BYEs.
    Cross { left: Feed, right: Feed },
}

impl RoundSource {
    /// Rounds that must be complete before this one can be created.
    pub fn dependencies(&self) -> Vec<RoundKey> {
        match *self {
            RoundSource::Seeding => Vec::new(),
            RoundSource::Pair { feed } => vec![feed.round()],
            RoundSource::Cross { left, right } => vec![left.round(), right.round()],
        }
    }

    /// Round recorded as the provenance of generated matches.
    pub fn generated_from(&self) -> Option<RoundKey> {
        match *self {
            RoundSource::Seeding => None,
            RoundSource::Pair { feed } => Some(feed.round()),
            RoundSource::Cross { right, .. } => Some(right.round()),
        }
    }
}

/// Nominal occupant of a planned slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "of")]
pub enum PlannedSlot {
    Seed(u32),
    Bye,
    WinnerOf(MatchKey),
    LoserOf(MatchKey),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlannedMatch {
    pub key: MatchKey,
    pub slot1: PlannedSlot,
    pub slot2: PlannedSlot,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundPlan {
    pub key: RoundKey,
    pub source: RoundSource,
    pub matches: Vec<PlannedMatch>,
}

/// Complete topology of an event's bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketPlan {
    pub format: Format,
    pub entrants: usize,
    pub bracket_size: usize,
    /// `log2(bracket_size)`; the last one is the Winners Final.
    pub winners_rounds: u32,
    /// Every round in dependency order (Winners, then Losers, then Grand Finals).
    pub rounds: Vec<RoundPlan>,
    /// Grand Finals match 2, played only if the Losers-side entrant wins match 1.
    pub reset: Option<PlannedMatch>,
}

impl BracketPlan {
    pub fn round(&self, key: RoundKey) -> Option<&RoundPlan> {
        self.rounds.iter().find(|r| r.key == key)
    }

    pub fn winners_final(&self) -> RoundKey {
        RoundKey::winners(self.winners_rounds)
    }

    pub fn losers_rounds(&self) -> u32 {
        self.rounds
            .iter()
            .filter(|r| r.key.bracket == Bracket::Losers)
            .count() as u32
    }

    /// Nominal number of matches, reset excluded.
    pub fn total_matches(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }

    /// Opening round with seeds resolved to entrants.
    pub fn opening_matches(
        &self,
        seeds: &BTreeMap<u32, EntrantId>,
    ) -> Result<Vec<NewMatch>, EngineError> {
        let opening = self
            .round(RoundKey::winners(1))
            .ok_or_else(|| EngineError::Setup("bracket has no opening round".into()))?;
        let resolve = |slot: PlannedSlot| -> Result<Slot, EngineError> {
            match slot {
                PlannedSlot::Seed(s) => seeds
                    .get(&s)
                    .map(|id| Slot::Entrant(*id))
                    .ok_or_else(|| EngineError::Setup(format!("no entrant holds seed {}", s))),
                PlannedSlot::Bye => Ok(Slot::Bye),
                _ => Err(EngineError::Setup("opening round must be seeded".into())),
            }
        };
        opening
            .matches
            .iter()
            .map(|m| {
                Ok(NewMatch {
                    key: m.key,
                    slot1: resolve(m.slot1)?,
                    slot2: resolve(m.slot2)?,
                    generated_from: None,
                })
            })
            .collect()
    }
}

/// Build the full plan for `entrants` competitors.
pub fn plan_bracket(format: Format, entrants: usize) -> Result<BracketPlan, EngineError> {
    if entrants < 2 {
        return Err(EngineError::Setup(format!(
            "at least two entrants are needed for a bracket (have {})",
            entrants
        )));
    }
    let bracket_size = next_power_of_two(entrants);
    let k = bracket_size.trailing_zeros();

    let mut builder = PlanBuilder::default();
    let opening: Vec<PlannedMatch> = pair_round_one(entrants)?
        .into_iter()
        .zip(1..)
        .map(|((a, b), n)| PlannedMatch {
            key: RoundKey::winners(1).match_key(n),
            slot1: PlannedSlot::Seed(a),
            slot2: b.map(PlannedSlot::Seed).unwrap_or(PlannedSlot::Bye),
        })
        .collect();
    builder.push(RoundKey::winners(1), RoundSource::Seeding, opening);

    for r in 2..=k {
        builder.pair(RoundKey::winners(r), Feed::Winners(RoundKey::winners(r - 1)));
    }

    let mut reset = None;
    if format == Format::DoubleElim {
        let winners_final = RoundKey::winners(k);
        let losers_champion = if k >= 2 {
            builder.pair(RoundKey::losers(1), Feed::Losers(RoundKey::winners(1)));
            for w in 2..=k {
                let cross = 2 * (w - 1);
                builder.cross(
                    RoundKey::losers(cross),
                    Feed::Winners(RoundKey::losers(cross - 1)),
                    Feed::Losers(RoundKey::winners(w)),
                );
                if w < k {
                    builder.pair(
                        RoundKey::losers(cross + 1),
                        Feed::Winners(RoundKey::losers(cross)),
                    );
                }
            }
            Feed::Winners(RoundKey::losers(2 * (k - 1)))
        } else {
            // Two entrants: no Losers bracket, the opening loser goes straight to Grand Finals.
            Feed::Losers(winners_final)
        };
        builder.cross(
            RoundKey::grand_finals(),
            Feed::Winners(winners_final),
            losers_champion,
        );
        reset = builder.rounds.last().and_then(|gf| {
            gf.matches.first().map(|m| PlannedMatch {
                key: RoundKey::grand_finals().match_key(2),
                ..m.clone()
            })
        });
    }

    Ok(BracketPlan {
        format,
        entrants,
        bracket_size,
        winners_rounds: k,
        rounds: builder.rounds,
        reset,
    })
}

#[derive(Default)]
struct PlanBuilder {
    rounds: Vec<RoundPlan>,
    sizes: HashMap<RoundKey, u32>,
}

impl PlanBuilder {
    fn size(&self, key: RoundKey) -> u32 {
        self.sizes.get(&key).copied().unwrap_or(0)
    }

    fn push(&mut self, key: RoundKey, source: RoundSource, matches: Vec<PlannedMatch>) {
        self.sizes.insert(key, matches.len() as u32);
        self.rounds.push(RoundPlan {
            key,
            source,
            matches,
        });
    }

    fn pair(&mut self, key: RoundKey, feed: Feed) {
        let count = (self.size(feed.round()) / 2).max(1);
        let matches = (1..=count)
            .map(|i| PlannedMatch {
                key: key.match_key(i),
                slot1: feed.slot(2 * i - 1),
                slot2: feed.slot(2 * i),
            })
            .collect();
        self.push(key, RoundSource::Pair { feed }, matches);
    }

    fn cross(&mut self, key: RoundKey, left: Feed, right: Feed) {
        let count = self.size(left.round()).max(1);
        let matches = (1..=count)
            .map(|i| PlannedMatch {
                key: key.match_key(i),
                slot1: left.slot(i),
                slot2: right.slot(i),
            })
            .collect();
        self.push(key, RoundSource::Cross { left, right }, matches);
    }
}

/// Pair entrants two at a time; an odd leftover gets a BYE.
pub fn pair_consecutive(entrants: &[EntrantId]) -> Vec<(Slot, Slot)> {
    entrants
        .chunks(2)
        .map(|pair| (Slot::Entrant(pair[0]), Slot::from(pair.get(1).copied())))
        .collect()
}

/// Pair `left[i]` against `right[i]`. Missing opponents become BYEs and a real
/// entrant is always kept in the first slot.
pub fn pair_cross(left: &[EntrantId], right: &[EntrantId]) -> Vec<(Slot, Slot)> {
    (0..left.len().max(right.len()))
        .filter_map(|i| match (left.get(i), right.get(i)) {
            (Some(&a), Some(&b)) => Some((Slot::Entrant(a), Slot::Entrant(b))),
            (Some(&a), None) | (None, Some(&a)) => Some((Slot::Entrant(a), Slot::Bye)),
            (None, None) => None,
        })
        .collect()
}
