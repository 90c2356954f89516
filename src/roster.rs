use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;

use crate::models::RosterEntry;

/// Authoritative list of students eligible to be ranked. Loaded once per
/// invocation, deduplicated by index, never mutated afterwards.
pub struct Roster {
    entries: Vec<RosterEntry>,
    by_index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        let mut deduped: Vec<RosterEntry> = Vec::with_capacity(entries.len());
        let mut by_index = HashMap::new();
        for entry in entries {
            if by_index.contains_key(&entry.index) {
                log::warn!("duplicate roster index {}; keeping the first row", entry.index);
                continue;
            }
            by_index.insert(entry.index.clone(), deduped.len());
            deduped.push(entry);
        }
        Self {
            entries: deduped,
            by_index,
        }
    }

    pub fn contains(&self, index: &str) -> bool {
        self.by_index.contains_key(index)
    }

    pub fn name_of(&self, index: &str) -> Option<&str> {
        self.by_index
            .get(index)
            .map(|&i| self.entries[i].name.as_str())
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(serde::Deserialize)]
struct RosterRow {
    #[serde(rename = "Index", alias = "index")]
    index: String,
    #[serde(rename = "Name", alias = "name", default)]
    name: String,
}

pub fn load_roster(path: &Path) -> anyhow::Result<Roster> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open roster {}", path.display()))?;
    read_roster(file).with_context(|| format!("failed to read roster {}", path.display()))
}

pub fn read_roster<R: Read>(reader: R) -> anyhow::Result<Roster> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in reader.deserialize::<RosterRow>() {
        let row = result.context("roster rows need an `Index` column and a header line")?;
        let index = row.index.trim().to_string();
        if index.is_empty() {
            continue;
        }
        entries.push(RosterEntry {
            index,
            name: row.name.trim().to_string(),
        });
    }

    let roster = Roster::new(entries);
    if roster.is_empty() {
        anyhow::bail!("roster contains no students");
    }
    Ok(roster)
}
