use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::DailyLedger;
use crate::models::{HistoryEntry, UserProfile};

/// Days of history retained; archiving a 15th day evicts the oldest.
pub const HISTORY_CAPACITY: usize = 14;

/// Bounded most-recent-first log of archived days. Entries are frozen at
/// archival time and never mutated. Serializes as a plain array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a day snapshot, evicting beyond [`HISTORY_CAPACITY`].
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// End the day: snapshot the ledger's totals against the profile's
/// current targets into history, then clear the ledger.
///
/// Targets are read at archival time, not frozen earlier. If the profile
/// changed mid-day the snapshot reflects the latest profile, not what was
/// active while the meals were logged; this is intentional. Archiving an
/// empty ledger is valid and produces an all-zero snapshot.
pub fn archive_day(
    ledger: &mut DailyLedger,
    profile: &UserProfile,
    history: &mut History,
) -> HistoryEntry {
    let totals = ledger.totals();
    let entry = HistoryEntry {
        date: weekday_label(Local::now().date_naive()),
        consumed: totals.calories,
        protein_consumed: totals.protein,
        carbs_consumed: totals.carbs,
        fat_consumed: totals.fat,
        target: profile.target_calories,
        protein_target: profile.target_protein,
        carbs_target: profile.target_carbs,
        fat_target: profile.target_fat,
    };
    history.push(entry.clone());
    ledger.clear();
    entry
}

/// Uppercase three-letter weekday label, e.g. "MON".
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string().to_uppercase()
}
