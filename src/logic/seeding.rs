//! Standard tournament seeding: bracket size and seed placement order.

use crate::models::{EngineError, Entrant, EntrantId};
use std::collections::BTreeMap;

/// Smallest power of two that is at least `max(n, 2)`.
pub fn next_power_of_two(n: usize) -> usize {
    n.max(2).next_power_of_two()
}

/// Seed numbers in bracket order for a bracket of size `p` (a power of two).
///
/// Built recursively: each seed `s` of the half-size order is followed by its
/// opponent `p + 1 - s`. Seeds 1 and 2 can only meet in the final, 1 and 3/4
/// only from the semifinal on, and so on.
pub fn seeded_positions(p: usize) -> Vec<u32> {
    if p <= 1 {
        return vec![1];
    }
    if p == 2 {
        return vec![1, 2];
    }
    let top = p as u32 + 1;
    seeded_positions(p / 2)
        .into_iter()
        .flat_map(|s| [s, top - s])
        .collect()
}

/// Validate the roster's seeds (present, unique, contiguous 1..N) and index entrants by seed.
pub fn seed_map(entrants: &[Entrant]) -> Result<BTreeMap<u32, EntrantId>, EngineError> {
    if entrants.is_empty() {
        return Err(EngineError::Setup("the event has no entrants".into()));
    }
    let mut by_seed = BTreeMap::new();
    for e in entrants {
        let seed = e
            .seed
            .ok_or_else(|| EngineError::Setup(format!("entrant `{}` has no seed", e.name)))?;
        if by_seed.insert(seed, e.id).is_some() {
            return Err(EngineError::Setup(format!("seed {} is assigned twice", seed)));
        }
    }
    let n = entrants.len() as u32;
    if let Some(missing) = (1..=n).find(|s| !by_seed.contains_key(s)) {
        return Err(EngineError::Setup(format!(
            "seeds must be contiguous 1..{} (seed {} is missing)",
            n, missing
        )));
    }
    Ok(by_seed)
}

/// Round 1 pairings as `(seed, Option<seed>)`: the second seed is `None` for a BYE.
///
/// Seeds above `n` are BYEs. The real entrant always takes the first slot; a BYE on
/// the left is a seeding error.
pub fn pair_round_one(n: usize) -> Result<Vec<(u32, Option<u32>)>, EngineError> {
    let size = next_power_of_two(n);
    let n = n as u32;
    seeded_positions(size)
        .chunks_exact(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            match (a <= n, b <= n) {
                (true, true) => Ok((a, Some(b))),
                (true, false) => Ok((a, None)),
                (false, _) => Err(EngineError::Setup(format!(
                    "invalid seeding: seed {} (left of seed {}) has no entrant",
                    a, b
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_for_small_brackets() {
        assert_eq!(seeded_positions(1), vec![1]);
        assert_eq!(seeded_positions(2), vec![1, 2]);
        assert_eq!(seeded_positions(4), vec![1, 4, 2, 3]);
        assert_eq!(seeded_positions(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn top_seeds_meet_late() {
        let order = seeded_positions(16);
        let pos = |s: u32| order.iter().position(|&x| x == s).unwrap();
        // 1 and 2 sit in opposite halves.
        assert!(pos(1) < 8 && pos(2) >= 8);
        // 1 and 4 share a half but not a quarter.
        assert!(pos(4) < 8 && pos(4) >= 4);
    }

    #[test]
    fn power_of_two_sizes() {
        assert_eq!(next_power_of_two(0), 2);
        assert_eq!(next_power_of_two(1), 2);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(16), 16);
        assert_eq!(next_power_of_two(17), 32);
    }

    #[test]
    fn byes_go_to_top_seeds() {
        let pairs = pair_round_one(5).unwrap();
        assert_eq!(
            pairs,
            vec![(1, None), (4, Some(5)), (2, None), (3, None)]
        );
    }

    #[test]
    fn seed_map_rejects_gaps_and_duplicates() {
        let gap = vec![Entrant::with_seed("a", 1), Entrant::with_seed("b", 3)];
        assert!(matches!(seed_map(&gap), Err(EngineError::Setup(_))));

        let dup = vec![Entrant::with_seed("a", 1), Entrant::with_seed("b", 1)];
        assert!(matches!(seed_map(&dup), Err(EngineError::Setup(_))));

        let unseeded = vec![Entrant::with_seed("a", 1), Entrant::new("b")];
        assert!(matches!(seed_map(&unseeded), Err(EngineError::Setup(_))));

        assert!(matches!(seed_map(&[]), Err(EngineError::Setup(_))));
    }
}
