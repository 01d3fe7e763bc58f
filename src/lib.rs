//! Nutrition target and daily ledger engine for an AI food-photo calorie
//! tracker.
//!
//! The engine derives calorie/macro targets from a biometric profile
//! ([`profile`]), keeps the current day's meal ledger ([`ledger`]),
//! archives finished days into a bounded history ([`history`]), and wires
//! it all into a persisted session ([`session`]). The two external
//! boundaries are slot-keyed persistence ([`store`]) and the hosted
//! image-analysis model ([`analysis`]).

pub mod analysis;
pub mod history;
pub mod ledger;
pub mod models;
pub mod profile;
pub mod session;
pub mod store;

pub use analysis::AnalysisClient;
pub use history::{archive_day, History, HISTORY_CAPACITY};
pub use ledger::{DailyLedger, Remaining, Totals};
pub use models::{
    Gender, Goal, HistoryEntry, Ingredient, MealEntry, MealType, NutritionData, UserProfile,
};
pub use profile::{compute_targets, Biometrics, MacroTargets, ACTIVITY_LEVELS};
pub use session::{AnalysisToken, Session};
pub use store::{FileStore, MemoryStore, Slot, StateStore};
