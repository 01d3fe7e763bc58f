use serde::{Deserialize, Serialize};

/// Biological sex used by the BMR estimate. The model is binary by design;
/// do not extend it silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Weight goal, shifts the calorie target by a flat 500 kcal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// User biometrics plus the calorie/macro targets derived from them.
///
/// The `target_*` fields are always recomputed from the biometric fields
/// (see [`crate::profile::compute_targets`]); they are never edited
/// independently. Serialized field names match the app's saved profile
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Weight in kg
    pub weight: f64,
    /// Height in cm
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    /// Activity multiplier, one of [`crate::profile::ACTIVITY_LEVELS`]
    pub activity_level: f64,
    pub goal: Goal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    pub target_calories: i32,
    /// Grams
    pub target_protein: i32,
    /// Grams
    pub target_carbs: i32,
    /// Grams
    pub target_fat: i32,
}

/// A single logged meal. Immutable once created; a correction is a
/// delete plus re-add.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    /// Opaque unique token, assigned at log time
    pub id: String,
    /// Creation instant, unix milliseconds
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub food_name: String,
    /// kcal
    pub calories: u32,
    /// Grams, one decimal place
    pub protein: f64,
    /// Grams
    pub carbs: u32,
    /// Grams
    pub fat: u32,
}

/// A frozen end-of-day snapshot: what was consumed against what was
/// targeted. Created only by archival, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Weekday label, e.g. "MON"
    pub date: String,
    /// kcal consumed
    pub consumed: u32,
    pub protein_consumed: f64,
    pub carbs_consumed: u32,
    pub fat_consumed: u32,
    /// kcal target at archival time
    pub target: i32,
    pub protein_target: i32,
    pub carbs_target: i32,
    pub fat_target: i32,
}

/// Structured estimate returned by the image-analysis model.
///
/// Carbs and fat arrive as display strings (e.g. "12g"); protein arrives
/// both ways. All fields are required; a response missing any of them is
/// treated as an analysis failure, not coerced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionData {
    pub food_name: String,
    /// 1-10
    pub health_score: u8,
    pub total_calories: u32,
    /// Display string with units, e.g. "15g"
    pub total_protein: String,
    /// Numeric grams, used for tracking
    pub total_protein_grams: f64,
    pub total_carbs: String,
    pub total_fat: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Estimated portion, e.g. "1 cup"
    pub amount: String,
    pub calories: u32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}
