//! Entrant data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entrant (used in match slots and lookups).
pub type EntrantId = Uuid;

/// A competitor registered for an event (a player or a whole team).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    /// Rank 1..N. Must be assigned (and contiguous) before the bracket is created.
    pub seed: Option<u32>,
}

impl Entrant {
    /// Create an unseeded entrant with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seed: None,
        }
    }

    /// Create an entrant that already holds a seed.
    pub fn with_seed(name: impl Into<String>, seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(name)
        }
    }
}
