use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{MealEntry, MealType, NutritionData};
use crate::profile::MacroTargets;

/// The current day's meal log, in insertion (chronological) order.
///
/// Newest-first display is the presentation layer's concern; the stored
/// order never changes. Serializes as a plain array of entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLedger {
    entries: Vec<MealEntry>,
}

/// Summed consumption over the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub calories: u32,
    pub protein: f64,
    pub carbs: u32,
    pub fat: u32,
}

/// Target minus consumed, per field. Negative means over limit, which is
/// a valid state, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remaining {
    pub calories: i64,
    pub protein: f64,
    pub carbs: i64,
    pub fat: i64,
}

impl DailyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a meal, assigning a unique id and the current timestamp.
    /// Always succeeds. Protein is kept to one decimal place.
    pub fn add(
        &mut self,
        meal_type: MealType,
        food_name: impl Into<String>,
        calories: u32,
        protein: f64,
        carbs: u32,
        fat: u32,
    ) -> &MealEntry {
        let now = Utc::now().timestamp_millis();
        self.push_at(now, meal_type, food_name.into(), calories, protein, carbs, fat)
    }

    /// Log an analyzed dish split across `portions` people, keeping only
    /// this user's share. The other `portions - 1` shares are discarded,
    /// not logged anywhere.
    ///
    /// Calories, carbs and fat are rounded to the nearest integer gram,
    /// protein to one decimal. Carbs and fat come from the model's display
    /// strings ("12g"); an unparsable string counts as zero. The food name
    /// is annotated with the fraction when `portions > 1`. The UI bounds
    /// `portions` to 1..=10; anything below 1 is treated as 1.
    pub fn add_divided(
        &mut self,
        data: &NutritionData,
        meal_type: MealType,
        portions: u32,
    ) -> &MealEntry {
        let portions = portions.max(1);
        let n = portions as f64;

        let food_name = if portions > 1 {
            format!("{} (1/{} portion)", data.food_name, portions)
        } else {
            data.food_name.clone()
        };

        let calories = (data.total_calories as f64 / n).round() as u32;
        let protein = round_tenth(data.total_protein_grams / n);
        let carbs = (parse_grams(&data.total_carbs) as f64 / n).round() as u32;
        let fat = (parse_grams(&data.total_fat) as f64 / n).round() as u32;

        let now = Utc::now().timestamp_millis();
        self.push_at(now, meal_type, food_name, calories, protein, carbs, fat)
    }

    /// Restore a previously persisted entry verbatim, keeping its id and
    /// timestamp.
    pub fn restore(&mut self, entry: MealEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry with the given id. Removal is immediate and
    /// irreversible; any confirmation step belongs to the caller. A
    /// missing id is a no-op and returns false.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Sum the four fields over all entries. O(n), no side effects.
    pub fn totals(&self) -> Totals {
        let mut t = Totals::default();
        for e in &self.entries {
            t.calories += e.calories;
            t.protein += e.protein;
            t.carbs += e.carbs;
            t.fat += e.fat;
        }
        t
    }

    /// Target minus consumed, per field.
    pub fn remaining(&self, targets: &MacroTargets) -> Remaining {
        let t = self.totals();
        Remaining {
            calories: targets.calories as i64 - t.calories as i64,
            protein: targets.protein as f64 - t.protein,
            carbs: targets.carbs as i64 - t.carbs as i64,
            fat: targets.fat as i64 - t.fat as i64,
        }
    }

    pub fn entries(&self) -> &[MealEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push_at(
        &mut self,
        timestamp: i64,
        meal_type: MealType,
        food_name: String,
        calories: u32,
        protein: f64,
        carbs: u32,
        fat: u32,
    ) -> &MealEntry {
        // Timestamp-derived ids collide when two meals land in the same
        // millisecond; bump until unique.
        let mut id = timestamp;
        while self.entries.iter().any(|e| e.id == id.to_string()) {
            id += 1;
        }

        let idx = self.entries.len();
        self.entries.push(MealEntry {
            id: id.to_string(),
            timestamp,
            meal_type,
            food_name,
            calories,
            protein: round_tenth(protein),
            carbs,
            fat,
        });
        &self.entries[idx]
    }
}

/// Coerce a display string like "12g" to integer grams, taking the
/// leading digits. Unparsable input counts as zero.
pub fn parse_grams(s: &str) -> u32 {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_grams_takes_leading_digits() {
        assert_eq!(parse_grams("12g"), 12);
        assert_eq!(parse_grams(" 30 g"), 30);
        assert_eq!(parse_grams("0g"), 0);
        assert_eq!(parse_grams("g12"), 0);
        assert_eq!(parse_grams(""), 0);
        assert_eq!(parse_grams("7.9g"), 7);
    }

    #[test]
    fn ids_are_unique_within_a_ledger() {
        let mut ledger = DailyLedger::new();
        for _ in 0..5 {
            ledger.add(MealType::Snack, "apple", 52, 0.3, 14, 0);
        }
        let mut ids: Vec<_> = ledger.entries().iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
