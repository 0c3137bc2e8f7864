//! Integration tests for single elimination: opening round, BYEs, advancement to a champion.

mod common;

use bracket_engine_web::{
    bracket_status, create_bracket, MatchStatus, MemoryStore, RoundKey, Slot, Format,
};
use common::{codes, has_match, match_at, play_out, report, seeded_event, slot1_wins};

#[test]
fn four_entrants_play_to_a_champion() {
    let store = MemoryStore::new();
    let (ev, ids) = seeded_event(&store, Format::SingleElim, 4);
    create_bracket(&store, ev).unwrap();
    assert_eq!(codes(&store, ev), vec!["W1-01", "W1-02"]);

    let w1 = match_at(&store, ev, "W1-01");
    assert_eq!((w1.slot1, w1.slot2), (Slot::Entrant(ids[0]), Slot::Entrant(ids[3])));
    let w2 = match_at(&store, ev, "W1-02");
    assert_eq!((w2.slot1, w2.slot2), (Slot::Entrant(ids[1]), Slot::Entrant(ids[2])));

    report(&store, ev, "W1-01", 1);
    assert!(!has_match(&store, ev, "W2-01"), "final waits for the whole round");
    report(&store, ev, "W1-02", 3);

    let fin = match_at(&store, ev, "W2-01");
    assert_eq!((fin.slot1, fin.slot2), (Slot::Entrant(ids[0]), Slot::Entrant(ids[2])));
    assert_eq!(fin.generated_from, Some(RoundKey::winners(1)));

    report(&store, ev, "W2-01", 3);
    let status = bracket_status(&store, ev).unwrap();
    assert!(status.is_complete());
    assert_eq!(status.champion, Some(ids[2]));
    assert_eq!(status.champion_name.as_deref(), Some("E3"));
    assert_eq!(status.total_matches, 3);
    assert_eq!(status.open_matches, 0);
}

#[test]
fn three_entrants_top_seed_gets_a_bye() {
    let store = MemoryStore::new();
    let (ev, ids) = seeded_event(&store, Format::SingleElim, 3);
    create_bracket(&store, ev).unwrap();

    let bye = match_at(&store, ev, "W1-01");
    assert!(bye.is_bye);
    assert_eq!(bye.slot2, Slot::Bye);
    assert_eq!(bye.status, MatchStatus::Completed);
    assert_eq!(bye.winner, Some(ids[0]));
    assert_eq!(bye.loser, None);

    let real = match_at(&store, ev, "W1-02");
    assert!(!real.is_bye);
    assert_eq!(real.status, MatchStatus::Pending);
    assert!(!has_match(&store, ev, "W2-01"));

    report(&store, ev, "W1-02", 2);
    let fin = match_at(&store, ev, "W2-01");
    assert_eq!((fin.slot1, fin.slot2), (Slot::Entrant(ids[0]), Slot::Entrant(ids[1])));
}

#[test]
fn five_entrants_only_four_five_play_round_one() {
    let store = MemoryStore::new();
    let (ev, ids) = seeded_event(&store, Format::SingleElim, 5);
    create_bracket(&store, ev).unwrap();
    assert_eq!(codes(&store, ev), vec!["W1-01", "W1-02", "W1-03", "W1-04"]);

    let byes: Vec<_> = ["W1-01", "W1-03", "W1-04"]
        .iter()
        .map(|c| match_at(&store, ev, c))
        .collect();
    assert!(byes.iter().all(|m| m.is_bye && m.status == MatchStatus::Completed));

    report(&store, ev, "W1-02", 5);
    let a = match_at(&store, ev, "W2-01");
    let b = match_at(&store, ev, "W2-02");
    assert_eq!((a.slot1, a.slot2), (Slot::Entrant(ids[0]), Slot::Entrant(ids[4])));
    assert_eq!((b.slot1, b.slot2), (Slot::Entrant(ids[1]), Slot::Entrant(ids[2])));
}

#[test]
fn eight_entrants_take_seven_matches() {
    let store = MemoryStore::new();
    let (ev, ids) = seeded_event(&store, Format::SingleElim, 8);
    create_bracket(&store, ev).unwrap();

    assert_eq!(play_out(&store, ev, slot1_wins), 7);
    let status = bracket_status(&store, ev).unwrap();
    assert_eq!(status.total_matches, 7);
    assert_eq!(status.champion, Some(ids[0]));
    assert!(!codes(&store, ev).iter().any(|c| c.starts_with('L') || c.starts_with("GF")));
}
