//! Match codes: `W1-02`, `L3-01`, `GF-01` <-> `MatchKey`.
//!
//! Codes are typed by people reporting results, so decoding is strict about shape
//! and reports exactly what was wrong.

use crate::models::{Bracket, MatchKey, ValidationError};
use std::fmt;
use std::str::FromStr;

/// Render a key as its code. Grand Finals codes carry only the match number.
pub fn encode(key: &MatchKey) -> String {
    key.to_string()
}

/// Parse a code (case-insensitive, surrounding whitespace ignored).
pub fn decode(code: &str) -> Result<MatchKey, ValidationError> {
    let raw = code.trim();
    let malformed = |reason: &'static str| ValidationError::MalformedCode {
        code: raw.to_string(),
        reason,
    };
    let upper = raw.to_ascii_uppercase();
    if upper.is_empty() {
        return Err(malformed("code is empty"));
    }

    if let Some(rest) = upper.strip_prefix("GF") {
        let number = rest
            .strip_prefix('-')
            .ok_or_else(|| malformed("missing dash after GF"))?;
        let match_number = parse_number(number).ok_or_else(|| malformed("match number is not numeric"))?;
        if match_number < 1 {
            return Err(malformed("match number must be at least 1"));
        }
        return Ok(MatchKey::new(Bracket::GrandFinals, 1, match_number));
    }

    let bracket = match upper.as_bytes()[0] {
        b'W' => Bracket::Winners,
        b'L' => Bracket::Losers,
        _ => return Err(malformed("unknown bracket (expected W, L or GF)")),
    };
    let (round, number) = upper[1..]
        .split_once('-')
        .ok_or_else(|| malformed("missing dash between round and match number"))?;
    let round = parse_number(round).ok_or_else(|| malformed("round is not numeric"))?;
    let match_number = parse_number(number).ok_or_else(|| malformed("match number is not numeric"))?;
    if round < 1 {
        return Err(malformed("round must be at least 1"));
    }
    if match_number < 1 {
        return Err(malformed("match number must be at least 1"));
    }
    Ok(MatchKey::new(bracket, round, match_number))
}

/// Digits only: `u32::from_str` would also accept a leading `+`.
fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bracket {
            Bracket::GrandFinals => write!(f, "GF-{:02}", self.match_number),
            b => write!(f, "{}{}-{:02}", b.letter(), self.round, self.match_number),
        }
    }
}

impl FromStr for MatchKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
