//! Event (one tournament) and its elimination format.

use crate::models::entrant::{Entrant, EntrantId};
use crate::models::error::EngineError;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an event.
pub type EventId = Uuid;

/// Elimination format of an event.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    SingleElim,
    #[default]
    DoubleElim,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::SingleElim => "single_elim",
            Format::DoubleElim => "double_elim",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single_elim" | "single" => Ok(Format::SingleElim),
            "double_elim" | "double" => Ok(Format::DoubleElim),
            other => Err(EngineError::Setup(format!(
                "format `{}` is unsupported (expected single_elim or double_elim)",
                other
            ))),
        }
    }
}

/// A tournament: its format and roster. Matches live in the store, keyed by the event id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub format: Format,
    pub entrants: Vec<Entrant>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Create an event with no entrants.
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            entrants: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Look up an entrant by id.
    pub fn entrant(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    /// Register an entrant. Names must be non-empty and unique (case-insensitive).
    pub fn add_entrant(
        &mut self,
        name: impl Into<String>,
        seed: Option<u32>,
    ) -> Result<EntrantId, EngineError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Setup("entrant name must not be empty".into()));
        }
        if self
            .entrants
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name))
        {
            return Err(EngineError::Setup(format!(
                "an entrant named `{}` already exists",
                name
            )));
        }
        let mut entrant = Entrant::new(name);
        entrant.seed = seed;
        let id = entrant.id;
        self.entrants.push(entrant);
        Ok(id)
    }

    /// Remove an entrant by id.
    pub fn remove_entrant(&mut self, id: EntrantId) -> Result<(), EngineError> {
        let idx = self
            .entrants
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EngineError::NotFound(format!("entrant {}", id)))?;
        self.entrants.remove(idx);
        Ok(())
    }

    /// Assign seeds 1..N in random order. With `rng_seed` the order is reproducible.
    pub fn shuffle_seeds(&mut self, rng_seed: Option<u64>) {
        let mut order: Vec<usize> = (0..self.entrants.len()).collect();
        match rng_seed {
            Some(s) => order.shuffle(&mut StdRng::seed_from_u64(s)),
            None => order.shuffle(&mut rand::thread_rng()),
        }
        for (seed, idx) in order.into_iter().enumerate() {
            self.entrants[idx].seed = Some(seed as u32 + 1);
        }
    }
}
