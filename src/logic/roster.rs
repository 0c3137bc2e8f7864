//! Roster import: entrants (and optional seeds) from CSV.

use crate::models::{EngineError, EntrantId, Event};
use serde::Deserialize;
use std::io;

/// One CSV row: `name[,seed]`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Read a roster with a `name,seed` header. The seed column may be empty or absent.
pub fn parse_roster<R: io::Read>(reader: R) -> Result<Vec<RosterEntry>, EngineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();
    for row in rdr.deserialize() {
        let entry: RosterEntry = row?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Add every entry to the event. All or nothing: on the first bad row the event is left as it was.
pub fn import_roster(
    event: &mut Event,
    entries: Vec<RosterEntry>,
) -> Result<Vec<EntrantId>, EngineError> {
    let mut staged = event.clone();
    let ids = entries
        .into_iter()
        .map(|e| staged.add_entrant(e.name, e.seed))
        .collect::<Result<Vec<_>, _>>()?;
    *event = staged;
    Ok(ids)
}
